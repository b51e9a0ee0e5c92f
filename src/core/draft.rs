//! The user's source draft: free text plus ordered image attachments.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An image attached to the draft.
///
/// `base64_data` is `None` until the bytes have been encoded; such images
/// still preview but are skipped when building a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// File the image was read from.
    pub source: PathBuf,
    /// Locally resolvable `file://` URL for previews.
    pub preview_url: String,
    /// Standard base64 encoding of the file bytes.
    pub base64_data: Option<String>,
    pub mime_type: String,
}

impl UploadedImage {
    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    pub fn is_encoded(&self) -> bool {
        self.base64_data.as_deref().is_some_and(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub text: String,
    pub images: Vec<UploadedImage>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft is worth sending when it has non-blank text or any image.
    pub fn is_meaningful(&self) -> bool {
        !self.text.trim().is_empty() || !self.images.is_empty()
    }

    /// Append a batch of images, keeping the batch's order.
    pub fn append_images(&mut self, batch: Vec<UploadedImage>) {
        self.images.extend(batch);
    }

    /// Remove the image at `index`. Out-of-range indices are ignored.
    pub fn remove_image(&mut self, index: usize) -> Option<UploadedImage> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }
}
