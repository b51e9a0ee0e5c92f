//! Prompt text for cross-platform adaptation requests.

/// System instruction sent alongside every adaptation request.
pub const SYSTEM_INSTRUCTION: &str = "Always return valid JSON adhering strictly to the schema.";

/// Role and task description shared by every request.
const ADAPTATION_TASK: &str = r#"
You are an expert social media manager specializing in cross-platform content adaptation.

TASK:
Adapt the following user draft into two distinct social media posts:
1. Twitter (X): Concise, witty, professional or casual (depending on context), under 280 characters.
2. Xiaohongshu (Little Red Book): Lifestyle-oriented, emotional, emoji-rich, longer form, helpful, persuasive.
"#;

const IMAGE_NOTE: &str =
    "If images are provided, analyze them to add relevant descriptive details or mood to the posts.";

/// Build the user prompt for one request.
///
/// The draft is always embedded in full. A refinement instruction, when
/// present and non-empty, is appended as its own section; it modifies the
/// adaptation of the original draft rather than any earlier output.
pub fn build_prompt(draft_text: &str, refinement: Option<&str>) -> String {
    let mut prompt = format!(
        "{ADAPTATION_TASK}\nUSER DRAFT:\n\"{draft_text}\"\n\n{IMAGE_NOTE}\n"
    );

    if let Some(instruction) = refinement.filter(|i| !i.is_empty()) {
        prompt.push_str(&format!(
            "\nREFINEMENT INSTRUCTION:\n\
             The user wants to improve or modify the generated content with the following instruction:\n\
             \"{instruction}\"\n\n\
             Please regenerate the content for both platforms, applying this instruction strictly \
             while maintaining the platform-specific formats (Twitter length limits, Xiaohongshu tone).\n"
        ));
    }

    prompt
}
