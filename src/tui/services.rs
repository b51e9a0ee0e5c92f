use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::images::ingest_batch;
use crate::core::llm::{ContentGenerator, GeminiClient, GenerationError, GenerationRequest};
use crate::core::studio::RequestKind;

use super::events::AppEvent;

/// Centralized handle to the backend services.
///
/// Created once at startup. Background work is spawned onto the tokio
/// runtime and reports back through `event_tx`; the UI loop is the only
/// place state is mutated.
pub struct Services {
    pub generator: Arc<dyn ContentGenerator>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Initialize services from config.
    ///
    /// A missing API key is not fatal: the client is built unconfigured and
    /// every request fails with a configuration error.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, GenerationError> {
        let client = GeminiClient::from_config(&config.gemini)?;
        if client.is_configured() {
            log::info!("Gemini client ready (model {})", client.model());
        } else {
            log::warn!(
                "{} environment variable is missing. Generation will fail.",
                config.gemini.api_key_env
            );
        }

        Ok(Self::with_generator(Arc::new(client), event_tx))
    }

    pub fn with_generator(
        generator: Arc<dyn ContentGenerator>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            generator,
            event_tx,
        }
    }

    /// Run one generation request in the background.
    pub fn spawn_generation(&self, kind: RequestKind, request: GenerationRequest) {
        let generator = Arc::clone(&self.generator);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = generator.generate(request).await;
            let _ = tx.send(AppEvent::GenerationFinished { kind, result });
        });
    }

    /// Read and encode an image batch in the background.
    pub fn spawn_ingest(&self, paths: Vec<PathBuf>) {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = ingest_batch(&paths).await;
            let _ = tx.send(AppEvent::ImagesIngested(result));
        });
    }
}
