//! Generation Client Module
//!
//! Turns a draft (text, images, optional refinement instruction) into
//! platform-specific post content via Gemini structured output.
//!
//! # Module Structure
//!
//! - `gemini`: REST client implementing `ContentGenerator`
//! - `prompt`: prompt and system instruction text
//! - `schema`: response schema sent with each request
//! - `error`: `GenerationError`

pub mod error;
pub mod gemini;
pub mod prompt;
pub mod schema;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::content::GeneratedContent;
use super::draft::Draft;

pub use error::{GenerationError, Result};
pub use gemini::GeminiClient;

/// An image payload sent inline with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// A self-contained adaptation request.
///
/// Every request carries the full original draft; no conversation state is
/// kept between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub text: String,
    pub images: Vec<InlineImage>,
    pub refinement: Option<String>,
}

impl GenerationRequest {
    /// Snapshot a draft into a request.
    ///
    /// Images without an encoded payload are skipped; the rest keep their
    /// draft order.
    pub fn from_draft(draft: &Draft, refinement: Option<String>) -> Self {
        let images = draft
            .images
            .iter()
            .filter_map(|img| {
                img.base64_data
                    .as_ref()
                    .filter(|d| !d.is_empty())
                    .map(|data| InlineImage {
                        mime_type: img.mime_type.clone(),
                        data: data.clone(),
                    })
            })
            .collect();

        Self {
            text: draft.text.clone(),
            images,
            refinement: refinement.filter(|r| !r.is_empty()),
        }
    }

    pub fn is_refinement(&self) -> bool {
        self.refinement.is_some()
    }
}

/// Anything that can adapt a draft into platform posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Model identifier, for logging and the status bar.
    fn model(&self) -> &str;

    /// Whether a credential is available. Unconfigured generators fail
    /// every request without touching the network.
    fn is_configured(&self) -> bool;

    /// Issue one request and parse the structured result.
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent>;
}
