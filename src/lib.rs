/// SocialSync - AI-Powered Cross-Platform Post Adapter (TUI Edition)
///
/// Core library providing draft management, image ingestion, Gemini-backed
/// post adaptation for Twitter and Xiaohongshu, and the terminal UI.

pub mod config;
pub mod core;
pub mod tui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
