//! Response schema for structured Gemini output.
//!
//! Uses the OpenAPI subset accepted by `generationConfig.responseSchema`.
//! Property names must stay in sync with `core::content::GeneratedContent`.

use serde_json::{json, Value};

pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "twitter": {
                "type": "OBJECT",
                "properties": {
                    "content": {
                        "type": "STRING",
                        "description": "The tweet text, optimized for Twitter (concise, engaging, under 280 chars)."
                    },
                    "hashtags": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "2-3 relevant hashtags."
                    }
                },
                "required": ["content", "hashtags"]
            },
            "xiaohongshu": {
                "type": "OBJECT",
                "properties": {
                    "title": {
                        "type": "STRING",
                        "description": "Catchy, emotional, or intriguing title suitable for Xiaohongshu."
                    },
                    "content": {
                        "type": "STRING",
                        "description": "The main post body. Use emojis liberally, adopt a lifestyle/personal sharing tone, structure with clear line breaks."
                    },
                    "tags": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "5-10 relevant tags for discovery."
                    }
                },
                "required": ["title", "content", "tags"]
            }
        },
        "required": ["twitter", "xiaohongshu"]
    })
}
