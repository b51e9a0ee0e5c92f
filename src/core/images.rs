//! Image ingestion: turn selected files into `UploadedImage`s.
//!
//! Every file in a batch is read and encoded concurrently; the batch only
//! resolves once all of them have finished, so callers append the whole
//! batch at once in selection order.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::try_join_all;
use image::ImageFormat;
use thiserror::Error;
use url::Url;

use super::draft::UploadedImage;

/// MIME type used when the extension is not a known image format.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot build a preview URL for {}", .0.display())]
    PreviewUrl(PathBuf),
}

impl IngestError {
    pub fn path(&self) -> &Path {
        match self {
            IngestError::Read { path, .. } => path,
            IngestError::PreviewUrl(path) => path,
        }
    }
}

/// Ingest a batch of files, preserving input order.
///
/// Fails as a whole if any single file cannot be ingested.
pub async fn ingest_batch(paths: &[PathBuf]) -> Result<Vec<UploadedImage>, IngestError> {
    log::debug!("Ingesting batch of {} image(s)", paths.len());
    let images = try_join_all(paths.iter().map(|p| ingest_file(p))).await?;
    log::info!("Ingested {} image(s)", images.len());
    Ok(images)
}

/// Read, encode and describe a single file.
pub async fn ingest_file(path: &Path) -> Result<UploadedImage, IngestError> {
    let canonical = tokio::fs::canonicalize(path)
        .await
        .map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let bytes = tokio::fs::read(&canonical)
        .await
        .map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let preview_url = Url::from_file_path(&canonical)
        .map_err(|_| IngestError::PreviewUrl(canonical.clone()))?
        .to_string();

    Ok(UploadedImage {
        source: canonical.clone(),
        preview_url,
        base64_data: Some(STANDARD.encode(&bytes)),
        mime_type: mime_type_for(&canonical).to_string(),
    })
}

/// MIME type derived from the file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}

/// Split user-entered text into paths.
///
/// Paths are separated by whitespace; a double-quoted segment keeps its
/// spaces. A leading `~/` expands to the home directory.
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    paths.push(expand_home(&std::mem::take(&mut current)));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(expand_home(&current));
    }

    paths
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}
