//! Generated post content for the supported target platforms.

use serde::{Deserialize, Serialize};

/// Twitter's hard character limit, used for the preview counter.
pub const TWITTER_CHAR_LIMIT: usize = 280;

/// The structured two-platform result of one generation.
///
/// Field names match the response schema sent to the model, so the reply
/// text deserializes directly into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub twitter: TwitterPost,
    pub xiaohongshu: XiaohongshuPost,
}

/// Short-form post with a handful of hashtags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterPost {
    pub content: String,
    pub hashtags: Vec<String>,
}

impl TwitterPost {
    /// Character count as Twitter would see it (Unicode scalar values).
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn exceeds_limit(&self) -> bool {
        self.char_count() > TWITTER_CHAR_LIMIT
    }
}

/// Long-form Xiaohongshu note: title, body and discovery tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XiaohongshuPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Target platform shown in the preview pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    Twitter,
    Xiaohongshu,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Twitter, Platform::Xiaohongshu];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Xiaohongshu => "Xiaohongshu",
        }
    }

    pub fn toggle(self) -> Platform {
        match self {
            Platform::Twitter => Platform::Xiaohongshu,
            Platform::Xiaohongshu => Platform::Twitter,
        }
    }
}

/// Render a tag the way both platforms display it: a single leading `#`.
///
/// Only the first `#` in the tag is stripped before prefixing, so `"#coffee"`
/// and `"coffee"` both become `"#coffee"`.
pub fn display_tag(tag: &str) -> String {
    format!("#{}", tag.replacen('#', "", 1))
}

/// Join tags into one display line separated by spaces.
pub fn display_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| display_tag(t))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GeneratedContent {
        GeneratedContent {
            twitter: TwitterPost {
                content: "New studio, who dis".to_string(),
                hashtags: vec!["#studio".to_string(), "setup".to_string()],
            },
            xiaohongshu: XiaohongshuPost {
                title: "我的新工作室".to_string(),
                content: "终于布置好了✨".to_string(),
                tags: vec!["工作室".to_string(), "#桌面改造".to_string()],
            },
        }
    }

    #[test]
    fn test_deserialize_schema_shape() {
        let json = r#"{
            "twitter": {"content": "hello", "hashtags": ["a", "b"]},
            "xiaohongshu": {"title": "t", "content": "c", "tags": ["x"]}
        }"#;
        let parsed: GeneratedContent = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.twitter.content, "hello");
        assert_eq!(parsed.twitter.hashtags, vec!["a", "b"]);
        assert_eq!(parsed.xiaohongshu.title, "t");
        assert_eq!(parsed.xiaohongshu.tags, vec!["x"]);
    }

    #[test]
    fn test_missing_branch_is_rejected() {
        let json = r#"{"twitter": {"content": "hello", "hashtags": []}}"#;
        assert!(serde_json::from_str::<GeneratedContent>(json).is_err());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{
            "twitter": {"content": "hello"},
            "xiaohongshu": {"title": "t", "content": "c", "tags": []}
        }"#;
        assert!(serde_json::from_str::<GeneratedContent>(json).is_err());
    }

    #[test]
    fn test_display_tag_strips_first_hash_only() {
        assert_eq!(display_tag("coffee"), "#coffee");
        assert_eq!(display_tag("#coffee"), "#coffee");
        assert_eq!(display_tag("##double"), "##double");
    }

    #[test]
    fn test_display_tags_joins() {
        let content = sample();
        assert_eq!(display_tags(&content.twitter.hashtags), "#studio #setup");
        assert_eq!(display_tags(&content.xiaohongshu.tags), "#工作室 #桌面改造");
        assert_eq!(display_tags(&[]), "");
    }

    #[test]
    fn test_char_count_is_unicode_aware() {
        let content = sample();
        assert_eq!(content.xiaohongshu.content.chars().count(), 7);
        assert_eq!(content.twitter.char_count(), 19);
        assert!(!content.twitter.exceeds_limit());

        let long = TwitterPost {
            content: "x".repeat(TWITTER_CHAR_LIMIT + 1),
            hashtags: vec![],
        };
        assert!(long.exceeds_limit());
    }

    #[test]
    fn test_platform_default_and_toggle() {
        assert_eq!(Platform::default(), Platform::Twitter);
        assert_eq!(Platform::Twitter.toggle(), Platform::Xiaohongshu);
        assert_eq!(Platform::Xiaohongshu.toggle(), Platform::Twitter);
        for p in Platform::ALL {
            assert!(!p.label().is_empty());
        }
    }
}
