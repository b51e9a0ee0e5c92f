pub mod attach;
pub mod editor;
pub mod preview;
