use crate::core::content::GeneratedContent;
use crate::core::draft::UploadedImage;
use crate::core::images::IngestError;
use crate::core::llm::GenerationError;
use crate::core::studio::RequestKind;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A generate or refine request completed.
    GenerationFinished {
        kind: RequestKind,
        result: Result<GeneratedContent, GenerationError>,
    },
    /// An image batch finished reading and encoding.
    ImagesIngested(Result<Vec<UploadedImage>, IngestError>),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusNext,
    FocusPrev,
    TogglePlatform,

    // Draft
    Generate,
    OpenAttach,
    CloseAttach,
    AttachPaths(String),
    RemoveSelectedImage,

    // Refinement
    Refine(String),
    QuickRefine(usize),

    // Modals
    ShowHelp,
    CloseHelp,
    DismissError,

    // Application
    Quit,
}

/// Which pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Editor,
    Refine,
}

impl Focus {
    pub const ALL: [Focus; 2] = [Focus::Editor, Focus::Refine];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Editor => "Draft",
            Focus::Refine => "Refine",
        }
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::Editor.next(), Focus::Refine);
        assert_eq!(Focus::Refine.next(), Focus::Editor);
        assert_eq!(Focus::Editor.prev(), Focus::Refine);

        let mut f = Focus::Editor;
        for _ in 0..Focus::ALL.len() {
            f = f.next();
        }
        assert_eq!(f, Focus::Editor);
    }

    #[test]
    fn test_focus_labels() {
        for f in Focus::ALL {
            assert!(!f.label().is_empty());
        }
    }
}
