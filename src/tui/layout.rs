//! Root layout computation for editor + preview + error line + status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Below this width the editor stacks above the preview.
pub const STACK_THRESHOLD: u16 = 90;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Draft editor pane.
    pub editor: Rect,
    /// Preview pane (cards + refine input).
    pub preview: Rect,
    /// Error line (zero height when there is no error).
    pub error: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

/// How the two panes are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneArrangement {
    SideBySide,
    Stacked,
}

impl AppLayout {
    /// Compute layout regions from the terminal area.
    ///
    /// Wide terminals split 5:7 like a two-column page; narrow ones stack.
    pub fn compute(area: Rect, has_error: bool) -> (Self, PaneArrangement) {
        let rows = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(u16::from(has_error)),
            Constraint::Length(1),
        ])
        .split(area);

        let content = rows[0];
        let arrangement = if area.width < STACK_THRESHOLD {
            PaneArrangement::Stacked
        } else {
            PaneArrangement::SideBySide
        };

        let panes = match arrangement {
            PaneArrangement::SideBySide => {
                Layout::horizontal([Constraint::Ratio(5, 12), Constraint::Ratio(7, 12)])
                    .split(content)
            }
            PaneArrangement::Stacked => {
                Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .split(content)
            }
        };

        (
            AppLayout {
                editor: panes[0],
                preview: panes[1],
                error: rows[1],
                status: rows[2],
            },
            arrangement,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_by_side_wide() {
        let area = Rect::new(0, 0, 120, 40);
        let (layout, arrangement) = AppLayout::compute(area, false);
        assert_eq!(arrangement, PaneArrangement::SideBySide);
        assert_eq!(layout.editor.width + layout.preview.width, area.width);
        assert!(layout.preview.width > layout.editor.width);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.error.height, 0);
    }

    #[test]
    fn test_stacked_narrow() {
        let area = Rect::new(0, 0, 60, 40);
        let (layout, arrangement) = AppLayout::compute(area, false);
        assert_eq!(arrangement, PaneArrangement::Stacked);
        assert_eq!(layout.editor.width, 60);
        assert!(layout.preview.y > layout.editor.y);
    }

    #[test]
    fn test_error_line_reserved() {
        let area = Rect::new(0, 0, 120, 40);
        let (layout, _) = AppLayout::compute(area, true);
        assert_eq!(layout.error.height, 1);
        assert_eq!(layout.error.y + 1, layout.status.y);
    }
}
