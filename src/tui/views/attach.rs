//! Attach-images modal: a single-line path prompt.
//!
//! Paths are whitespace separated; double quotes keep a path with spaces
//! together and `~/` expands to the home directory.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

#[derive(Debug, PartialEq, Eq)]
pub enum AttachInput {
    Consumed,
    Submit(String),
    Cancel,
}

#[derive(Debug, Default)]
pub struct AttachState {
    input: InputBuffer,
}

impl AttachState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        self.input.text()
    }

    /// The modal swallows every key while open.
    pub fn handle_input(&mut self, event: &Event) -> AttachInput {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            // Bracketed paste delivers a whole path list at once.
            if let Event::Paste(text) = event {
                self.input.insert_str(&text.replace(['\r', '\n'], " "));
            }
            return AttachInput::Consumed;
        };

        match (*modifiers, *code) {
            (_, KeyCode::Esc) => AttachInput::Cancel,
            (_, KeyCode::Enter) => {
                if self.input.is_empty() {
                    AttachInput::Cancel
                } else {
                    AttachInput::Submit(self.input.take())
                }
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.input.insert_char(c);
                AttachInput::Consumed
            }
            (_, KeyCode::Backspace) => {
                self.input.backspace();
                AttachInput::Consumed
            }
            (_, KeyCode::Delete) => {
                self.input.delete();
                AttachInput::Consumed
            }
            (_, KeyCode::Left) => {
                self.input.move_left();
                AttachInput::Consumed
            }
            (_, KeyCode::Right) => {
                self.input.move_right();
                AttachInput::Consumed
            }
            (_, KeyCode::Home) => {
                self.input.move_home();
                AttachInput::Consumed
            }
            (_, KeyCode::End) => {
                self.input.move_end();
                AttachInput::Consumed
            }
            _ => AttachInput::Consumed,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 70.min(area.width.saturating_sub(4));
        let height = 7.min(area.height);
        let modal = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );

        let block = Block::default()
            .title(" Attach Images ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));
        let inner = block.inner(modal);

        let input_line = if self.input.text().is_empty() {
            Line::from(Span::styled(
                "~/Pictures/desk.jpg \"/tmp/with space.png\"",
                theme::placeholder(),
            ))
        } else {
            Line::from(Span::styled(
                self.input.text().to_string(),
                Style::default().fg(theme::TEXT),
            ))
        };

        let lines = vec![
            Line::from(Span::styled("Image paths (space separated):", theme::muted())),
            input_line,
            Line::raw(""),
            Line::from(vec![
                Span::styled("Enter", theme::key_hint()),
                Span::raw(":attach  "),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(":cancel"),
            ]),
        ];

        frame.render_widget(Clear, modal);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            modal,
        );

        let col = self.input.text()[..self.input.cursor_position()]
            .chars()
            .count() as u16;
        if inner.height > 1 {
            frame.set_cursor_position(Position::new(
                inner.x + col.min(inner.width.saturating_sub(1)),
                inner.y + 1,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_typing_then_submit() {
        let mut attach = AttachState::new();
        for c in "a.png b.jpg".chars() {
            assert_eq!(attach.handle_input(&key(KeyCode::Char(c))), AttachInput::Consumed);
        }
        assert_eq!(
            attach.handle_input(&key(KeyCode::Enter)),
            AttachInput::Submit("a.png b.jpg".to_string())
        );
        assert!(attach.text().is_empty());
    }

    #[test]
    fn test_empty_enter_cancels() {
        let mut attach = AttachState::new();
        assert_eq!(attach.handle_input(&key(KeyCode::Enter)), AttachInput::Cancel);
    }

    #[test]
    fn test_esc_cancels() {
        let mut attach = AttachState::new();
        attach.handle_input(&key(KeyCode::Char('x')));
        assert_eq!(attach.handle_input(&key(KeyCode::Esc)), AttachInput::Cancel);
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut attach = AttachState::new();
        attach.handle_input(&Event::Paste("a.png\nb.png".to_string()));
        assert_eq!(attach.text(), "a.png b.png");
    }

    #[test]
    fn test_ctrl_keys_swallowed() {
        let mut attach = AttachState::new();
        let ctrl_g = Event::Key(KeyEvent {
            code: KeyCode::Char('g'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
        assert_eq!(attach.handle_input(&ctrl_g), AttachInput::Consumed);
        assert!(attach.text().is_empty());
    }
}
