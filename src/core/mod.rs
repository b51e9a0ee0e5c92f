pub mod content;
pub mod draft;
pub mod images;
pub mod llm;
pub mod logging;
pub mod studio;
