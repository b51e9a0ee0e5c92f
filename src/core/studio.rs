//! Draft studio: the single state record behind the UI.
//!
//! Owns the draft, the last generated content, the request phase and the
//! current error message. Only the UI loop mutates it, one discrete event at
//! a time.
//!
//! Requests go through an explicit two-state machine. `begin_*` moves
//! `Idle -> Pending` and hands back an owned request snapshot; `finish`
//! moves back to `Idle`. While `Pending`, new triggers are rejected rather
//! than queued.

use thiserror::Error;

use super::content::GeneratedContent;
use super::draft::{Draft, UploadedImage};
use super::llm::{ContentGenerator, GenerationError, GenerationRequest};

pub const GENERATE_FAILED_MESSAGE: &str =
    "Failed to generate content. Please check your API Key or try again.";
pub const REFINE_FAILED_MESSAGE: &str = "Failed to refine content. Please try again.";

/// One-click refinements offered once content exists: (label, instruction).
pub const QUICK_REFINEMENTS: [(&str, &str); 3] = [
    ("Shorter", "Make it shorter"),
    ("Professional", "Make it more professional"),
    ("More Emojis", "Add more emojis"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Generate,
    Refine,
}

impl RequestKind {
    pub fn failure_message(self) -> &'static str {
        match self {
            RequestKind::Generate => GENERATE_FAILED_MESSAGE,
            RequestKind::Refine => REFINE_FAILED_MESSAGE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequestKind::Generate => "generate",
            RequestKind::Refine => "refine",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending(RequestKind),
}

/// Why a trigger did not issue a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TriggerRejected {
    #[error("Add some text or an image first")]
    EmptyDraft,
    #[error("A request is already in flight")]
    Busy,
    #[error("Type a refinement instruction first")]
    BlankInstruction,
}

#[derive(Debug, Default)]
pub struct Studio {
    draft: Draft,
    generated: Option<GeneratedContent>,
    phase: Phase,
    error: Option<String>,
}

impl Studio {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Direct edits to the draft. Allowed while pending: the in-flight
    /// request already owns its snapshot.
    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn append_images(&mut self, batch: Vec<UploadedImage>) {
        self.draft.append_images(batch);
    }

    pub fn remove_image(&mut self, index: usize) -> Option<UploadedImage> {
        self.draft.remove_image(index)
    }

    pub fn generated(&self) -> Option<&GeneratedContent> {
        self.generated.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Pending(_))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Whether the refine controls should accept input.
    pub fn can_refine(&self) -> bool {
        self.generated.is_some() && !self.is_busy()
    }

    // ── State machine ───────────────────────────────────────────────────

    /// Start a fresh generation from the current draft.
    pub fn begin_generate(&mut self) -> Result<GenerationRequest, TriggerRejected> {
        if self.is_busy() {
            return Err(TriggerRejected::Busy);
        }
        if !self.draft.is_meaningful() {
            return Err(TriggerRejected::EmptyDraft);
        }

        self.error = None;
        self.phase = Phase::Pending(RequestKind::Generate);
        Ok(GenerationRequest::from_draft(&self.draft, None))
    }

    /// Start a refinement. The request re-derives from the original draft
    /// plus the instruction; earlier generated content is not sent.
    pub fn begin_refine(&mut self, instruction: &str) -> Result<GenerationRequest, TriggerRejected> {
        if self.is_busy() {
            return Err(TriggerRejected::Busy);
        }
        if instruction.trim().is_empty() {
            return Err(TriggerRejected::BlankInstruction);
        }
        if !self.draft.is_meaningful() {
            return Err(TriggerRejected::EmptyDraft);
        }

        self.error = None;
        self.phase = Phase::Pending(RequestKind::Refine);
        Ok(GenerationRequest::from_draft(
            &self.draft,
            Some(instruction.to_string()),
        ))
    }

    /// Apply the outcome of a pending request and return to `Idle`.
    ///
    /// Success replaces the generated content wholesale. Failure keeps the
    /// previous content and sets the action-specific message.
    pub fn finish(
        &mut self,
        kind: RequestKind,
        result: Result<GeneratedContent, GenerationError>,
    ) {
        if self.phase != Phase::Pending(kind) {
            log::warn!(
                "Ignoring {} completion while in phase {:?}",
                kind.label(),
                self.phase
            );
            return;
        }

        match result {
            Ok(content) => {
                self.generated = Some(content);
            }
            Err(e) => {
                log::error!("{} failed: {e}", kind.label());
                self.error = Some(kind.failure_message().to_string());
            }
        }
        self.phase = Phase::Idle;
    }

    // ── One-shot helpers ────────────────────────────────────────────────

    /// Run a full generate cycle against `generator`.
    ///
    /// `Ok(true)` on success, `Ok(false)` when the request was issued but
    /// failed, `Err` when nothing was issued.
    pub async fn generate(
        &mut self,
        generator: &dyn ContentGenerator,
    ) -> Result<bool, TriggerRejected> {
        let request = self.begin_generate()?;
        let result = generator.generate(request).await;
        let ok = result.is_ok();
        self.finish(RequestKind::Generate, result);
        Ok(ok)
    }

    /// Run a full refine cycle against `generator`.
    pub async fn refine(
        &mut self,
        generator: &dyn ContentGenerator,
        instruction: &str,
    ) -> Result<bool, TriggerRejected> {
        let request = self.begin_refine(instruction)?;
        let result = generator.generate(request).await;
        let ok = result.is_ok();
        self.finish(RequestKind::Refine, result);
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::{TwitterPost, XiaohongshuPost};
    use crate::core::llm::MockContentGenerator;
    use mockall::predicate::function;
    use std::path::PathBuf;

    fn content(tweet: &str) -> GeneratedContent {
        GeneratedContent {
            twitter: TwitterPost {
                content: tweet.to_string(),
                hashtags: vec!["studio".to_string(), "music".to_string()],
            },
            xiaohongshu: XiaohongshuPost {
                title: "新工作室".to_string(),
                content: "分享一下✨".to_string(),
                tags: vec!["工作室".to_string(); 5],
            },
        }
    }

    fn image() -> UploadedImage {
        UploadedImage {
            source: PathBuf::from("/tmp/desk.jpg"),
            preview_url: "file:///tmp/desk.jpg".to_string(),
            base64_data: Some("ZGVzaw==".to_string()),
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn studio_with_draft() -> Studio {
        let mut studio = Studio::new();
        studio.set_text("Check out my new studio setup");
        studio.append_images(vec![image()]);
        studio
    }

    #[test]
    fn test_begin_generate_rejects_empty_draft() {
        let mut studio = Studio::new();
        studio.set_text("   ");
        assert_eq!(studio.begin_generate(), Err(TriggerRejected::EmptyDraft));
        assert_eq!(studio.phase(), Phase::Idle);
    }

    #[test]
    fn test_begin_generate_snapshot() {
        let mut studio = studio_with_draft();
        let request = studio.begin_generate().unwrap();
        assert_eq!(request.text, "Check out my new studio setup");
        assert_eq!(request.images.len(), 1);
        assert_eq!(request.images[0].data, "ZGVzaw==");
        assert_eq!(request.images[0].mime_type, "image/jpeg");
        assert!(request.refinement.is_none());
        assert_eq!(studio.phase(), Phase::Pending(RequestKind::Generate));
    }

    #[test]
    fn test_pending_rejects_new_triggers() {
        let mut studio = studio_with_draft();
        studio.begin_generate().unwrap();
        assert_eq!(studio.begin_generate(), Err(TriggerRejected::Busy));
        assert_eq!(studio.begin_refine("Make it shorter"), Err(TriggerRejected::Busy));
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let mut studio = studio_with_draft();
        studio.begin_generate().unwrap();
        studio.finish(RequestKind::Generate, Err(GenerationError::EmptyResponse));
        assert!(studio.error().is_some());

        studio.begin_generate().unwrap();
        assert!(studio.error().is_none());
    }

    #[test]
    fn test_finish_success_replaces_content() {
        let mut studio = studio_with_draft();
        studio.begin_generate().unwrap();
        studio.finish(RequestKind::Generate, Ok(content("first")));
        assert_eq!(studio.generated().unwrap().twitter.content, "first");

        studio.begin_refine("Make it shorter").unwrap();
        studio.finish(RequestKind::Refine, Ok(content("second")));
        assert_eq!(studio.generated().unwrap().twitter.content, "second");
        assert_eq!(studio.phase(), Phase::Idle);
    }

    #[test]
    fn test_finish_failure_keeps_content_and_draft() {
        let mut studio = studio_with_draft();
        studio.begin_generate().unwrap();
        studio.finish(RequestKind::Generate, Ok(content("kept")));

        studio.begin_refine("Make it shorter").unwrap();
        studio.finish(
            RequestKind::Refine,
            Err(GenerationError::Api {
                status: 503,
                message: "unavailable".to_string(),
            }),
        );

        assert_eq!(studio.error(), Some(REFINE_FAILED_MESSAGE));
        assert_eq!(studio.generated().unwrap().twitter.content, "kept");
        assert_eq!(studio.draft().text, "Check out my new studio setup");
        assert_eq!(studio.draft().images.len(), 1);
        assert!(!studio.is_busy());
    }

    #[test]
    fn test_generate_failure_message() {
        let mut studio = studio_with_draft();
        studio.begin_generate().unwrap();
        studio.finish(
            RequestKind::Generate,
            Err(GenerationError::NotConfigured {
                env_var: "API_KEY".to_string(),
            }),
        );
        assert_eq!(studio.error(), Some(GENERATE_FAILED_MESSAGE));
        assert!(studio.generated().is_none());
    }

    #[test]
    fn test_finish_for_wrong_kind_is_ignored() {
        let mut studio = studio_with_draft();
        studio.finish(RequestKind::Generate, Ok(content("stray")));
        assert!(studio.generated().is_none());

        studio.begin_generate().unwrap();
        studio.finish(RequestKind::Refine, Ok(content("stray")));
        assert!(studio.generated().is_none());
        assert!(studio.is_busy());
    }

    #[test]
    fn test_refine_rejects_blank_instruction() {
        let mut studio = studio_with_draft();
        assert_eq!(
            studio.begin_refine("  "),
            Err(TriggerRejected::BlankInstruction)
        );
        assert_eq!(studio.phase(), Phase::Idle);
    }

    #[test]
    fn test_dismiss_error() {
        let mut studio = studio_with_draft();
        studio.begin_generate().unwrap();
        studio.finish(RequestKind::Generate, Err(GenerationError::EmptyResponse));
        studio.dismiss_error();
        assert!(studio.error().is_none());
    }

    #[test]
    fn test_can_refine() {
        let mut studio = studio_with_draft();
        assert!(!studio.can_refine());
        studio.begin_generate().unwrap();
        assert!(!studio.can_refine());
        studio.finish(RequestKind::Generate, Ok(content("x")));
        assert!(studio.can_refine());
    }

    #[tokio::test]
    async fn test_generate_issues_exactly_one_request() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .with(function(|r: &GenerationRequest| {
                r.text == "Check out my new studio setup"
                    && r.images.len() == 1
                    && r.refinement.is_none()
            }))
            .times(1)
            .returning(|_| Ok(content("Studio ready")));

        let mut studio = studio_with_draft();
        assert_eq!(studio.generate(&generator).await, Ok(true));
        assert_eq!(studio.generated().unwrap().twitter.content, "Studio ready");
    }

    #[tokio::test]
    async fn test_empty_draft_issues_no_request() {
        let mut generator = MockContentGenerator::new();
        generator.expect_generate().times(0);

        let mut studio = Studio::new();
        assert_eq!(
            studio.generate(&generator).await,
            Err(TriggerRejected::EmptyDraft)
        );
    }

    #[tokio::test]
    async fn test_refine_resends_original_draft() {
        let mut generator = MockContentGenerator::new();
        let mut seq = mockall::Sequence::new();
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(content("A long first tweet")));
        generator
            .expect_generate()
            .with(function(|r: &GenerationRequest| {
                r.text == "Check out my new studio setup"
                    && r.images.len() == 1
                    && r.refinement.as_deref() == Some("Make it shorter")
            }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(content("Short")));

        let mut studio = studio_with_draft();
        studio.generate(&generator).await.unwrap();
        assert_eq!(studio.refine(&generator, "Make it shorter").await, Ok(true));
        assert_eq!(studio.generated().unwrap().twitter.content, "Short");
    }

    #[tokio::test]
    async fn test_failed_generate_reports_false() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Err(GenerationError::EmptyResponse));

        let mut studio = studio_with_draft();
        assert_eq!(studio.generate(&generator).await, Ok(false));
        assert_eq!(studio.error(), Some(GENERATE_FAILED_MESSAGE));
        assert!(!studio.is_busy());
    }

    #[test]
    fn test_quick_refinements() {
        assert_eq!(QUICK_REFINEMENTS.len(), 3);
        assert!(QUICK_REFINEMENTS.iter().all(|(label, instr)| {
            !label.is_empty() && !instr.trim().is_empty()
        }));
    }
}
