//! Draft editor: multi-line text input plus the attached image list.
//!
//! Typing edits the draft text directly. Alt+Left/Right moves the image
//! selection; removal and attaching are global actions handled by the app.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::core::draft::UploadedImage;
use crate::core::studio::Studio;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

const PLACEHOLDER: &str = "What's on your mind? Write your core message here...";
/// Image rows shown before the list scrolls.
const MAX_IMAGE_ROWS: usize = 6;

pub struct EditorState {
    input: InputBuffer,
    selected_image: usize,
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            input: InputBuffer::new(),
            selected_image: 0,
        }
    }

    pub fn selected_image(&self) -> usize {
        self.selected_image
    }

    /// Keep the selection inside the image list after it changes.
    pub fn clamp_selection(&mut self, image_count: usize) {
        self.selected_image = self.selected_image.min(image_count.saturating_sub(1));
    }

    // ── Input handling ──────────────────────────────────────────────────

    /// Route a key to the editor. Returns whether it was consumed.
    pub fn handle_input(&mut self, event: &Event, studio: &mut Studio) -> bool {
        if let Event::Paste(text) = event {
            self.input.insert_str(&text.replace("\r\n", "\n"));
            studio.set_text(self.input.text());
            return true;
        }

        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        let image_count = studio.draft().images.len();
        let edited = match (*modifiers, *code) {
            (KeyModifiers::ALT, KeyCode::Left) => {
                self.selected_image = self.selected_image.saturating_sub(1);
                return true;
            }
            (KeyModifiers::ALT, KeyCode::Right) => {
                if image_count > 0 {
                    self.selected_image = (self.selected_image + 1).min(image_count - 1);
                }
                return true;
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.input.insert_char(c);
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                self.input.insert_char('\n');
                true
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => {
                self.input.backspace();
                true
            }
            (KeyModifiers::NONE, KeyCode::Delete) => {
                self.input.delete();
                true
            }
            (KeyModifiers::NONE, KeyCode::Left) => {
                self.input.move_left();
                false
            }
            (KeyModifiers::NONE, KeyCode::Right) => {
                self.input.move_right();
                false
            }
            (KeyModifiers::NONE, KeyCode::Home) => {
                self.input.move_home();
                false
            }
            (KeyModifiers::NONE, KeyCode::End) => {
                self.input.move_end();
                false
            }
            _ => return false,
        };

        if edited {
            studio.set_text(self.input.text());
        }
        true
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        studio: &Studio,
        focused: bool,
        spinner: &str,
    ) {
        let block = theme::block("Create Draft", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let images = &studio.draft().images;
        let image_rows = if images.is_empty() {
            0
        } else {
            images.len().min(MAX_IMAGE_ROWS) as u16 + 1
        };

        let chunks = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(image_rows),
            Constraint::Length(1),
        ])
        .split(inner);

        self.render_text(frame, chunks[0], focused);
        if !images.is_empty() {
            frame.render_widget(
                Paragraph::new(image_list_lines(images, self.selected_image)),
                chunks[1],
            );
        }
        frame.render_widget(
            Paragraph::new(generate_button_line(studio, spinner)),
            chunks[2],
        );
    }

    fn render_text(&self, frame: &mut Frame, area: Rect, focused: bool) {
        if self.input.text().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(PLACEHOLDER, theme::placeholder())),
                area,
            );
            if focused {
                frame.set_cursor_position(Position::new(area.x, area.y));
            }
            return;
        }

        let (line, col) = self.input.cursor_line_col();
        let scroll_y = (line as u16).saturating_sub(area.height.saturating_sub(1));
        let scroll_x = (col as u16).saturating_sub(area.width.saturating_sub(1));

        let lines: Vec<Line> = self
            .input
            .text()
            .split('\n')
            .map(|l| Line::styled(l.to_string(), Style::default().fg(theme::TEXT)))
            .collect();
        frame.render_widget(Paragraph::new(lines).scroll((scroll_y, scroll_x)), area);

        if focused {
            frame.set_cursor_position(Position::new(
                area.x + col as u16 - scroll_x,
                area.y + line as u16 - scroll_y,
            ));
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

/// One row per attached image, the selected one highlighted.
pub fn image_list_lines(images: &[UploadedImage], selected: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("Images ({})", images.len()),
        theme::heading(),
    ))];

    let start = selected.saturating_sub(MAX_IMAGE_ROWS - 1);
    for (idx, img) in images.iter().enumerate().skip(start).take(MAX_IMAGE_ROWS) {
        let marker = if idx == selected { "▸" } else { " " };
        let style = if idx == selected {
            theme::highlight()
        } else {
            Style::default().fg(theme::TEXT)
        };
        let mut spans = vec![
            Span::styled(format!("{marker} {}. ", idx + 1), style),
            Span::styled(img.display_name(), style),
            Span::styled(format!("  {}", img.mime_type), theme::dim()),
        ];
        if !img.is_encoded() {
            spans.push(Span::styled("  (encoding…)", theme::muted()));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// The "Adapt with AI" trigger line, disabled when there is nothing to send.
pub fn generate_button_line(studio: &Studio, spinner: &str) -> Line<'static> {
    if studio.is_busy() {
        return Line::from(vec![
            Span::styled(format!(" {spinner} "), theme::busy_badge()),
            Span::styled(" Adaptifying...", Style::default().fg(theme::PRIMARY_LIGHT)),
        ]);
    }

    let enabled = studio.draft().is_meaningful();
    let badge = if enabled {
        theme::brand_badge()
    } else {
        Style::default().fg(theme::TEXT_DIM).add_modifier(Modifier::DIM)
    };
    Line::from(vec![
        Span::styled(" ✦ Adapt with AI ", badge),
        Span::raw(" "),
        Span::styled("Ctrl+G", theme::key_hint()),
        Span::raw("  "),
        Span::styled("Ctrl+O", theme::key_hint()),
        Span::styled(":add images ", theme::muted()),
        Span::styled("Ctrl+D", theme::key_hint()),
        Span::styled(":remove", theme::muted()),
    ])
}
