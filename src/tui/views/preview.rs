//! Preview pane: platform-styled mock posts plus the refinement input.
//!
//! Cards are derived purely from the studio state. The card builders are
//! free functions returning `Line`s so they can be tested without a
//! terminal.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs, Wrap},
    Frame,
};

use crate::core::content::{display_tag, Platform, TwitterPost, XiaohongshuPost, TWITTER_CHAR_LIMIT};
use crate::core::draft::UploadedImage;
use crate::core::studio::{Studio, QUICK_REFINEMENTS};
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

pub const TWEET_PLACEHOLDER: &str = "Your generated tweet will appear here...";
pub const XHS_TITLE_PLACEHOLDER: &str = "Your engaging title goes here...";
pub const XHS_CONTENT_PLACEHOLDER: &str =
    "The AI generated content optimized for lifestyle and storytelling will appear in this section.";
const REFINE_PLACEHOLDER: &str = "Suggest changes (e.g., 'Add more emojis', 'Make it shorter')...";
const REFINE_DISABLED_PLACEHOLDER: &str = "Generate content first to refine...";
/// Twitter shows at most four attachments.
const TWITTER_MAX_IMAGES: usize = 4;

/// Outcome of routing a key to the refine input.
#[derive(Debug, PartialEq, Eq)]
pub enum PreviewInput {
    Ignored,
    Consumed,
    Submit(String),
}

pub struct PreviewState {
    platform: Platform,
    refine: InputBuffer,
    scroll: u16,
}

impl PreviewState {
    pub fn new() -> Self {
        Self {
            platform: Platform::default(),
            refine: InputBuffer::new(),
            scroll: 0,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn toggle_platform(&mut self) {
        self.platform = self.platform.toggle();
        self.scroll = 0;
    }

    pub fn refine_text(&self) -> &str {
        self.refine.text()
    }

    // ── Input handling ──────────────────────────────────────────────────

    /// Route a key to the refine input.
    ///
    /// While refinement is unavailable the input is disabled: edits are
    /// swallowed and Enter does nothing. A submitted instruction clears the
    /// input.
    pub fn handle_input(&mut self, event: &Event, can_refine: bool) -> PreviewInput {
        if let Event::Paste(text) = event {
            if can_refine {
                self.refine.insert_str(&text.replace(['\r', '\n'], " "));
            }
            return PreviewInput::Consumed;
        }

        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return PreviewInput::Ignored;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::PageDown) => {
                self.scroll = self.scroll.saturating_add(5);
                PreviewInput::Consumed
            }
            (KeyModifiers::NONE, KeyCode::PageUp) => {
                self.scroll = self.scroll.saturating_sub(5);
                PreviewInput::Consumed
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                if can_refine && !self.refine.is_empty() {
                    PreviewInput::Submit(self.refine.take())
                } else {
                    PreviewInput::Consumed
                }
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                if can_refine {
                    self.refine.insert_char(c);
                }
                PreviewInput::Consumed
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => {
                self.refine.backspace();
                PreviewInput::Consumed
            }
            (KeyModifiers::NONE, KeyCode::Delete) => {
                self.refine.delete();
                PreviewInput::Consumed
            }
            (KeyModifiers::NONE, KeyCode::Left) => {
                self.refine.move_left();
                PreviewInput::Consumed
            }
            (KeyModifiers::NONE, KeyCode::Right) => {
                self.refine.move_right();
                PreviewInput::Consumed
            }
            (KeyModifiers::NONE, KeyCode::Home) => {
                self.refine.move_home();
                PreviewInput::Consumed
            }
            (KeyModifiers::NONE, KeyCode::End) => {
                self.refine.move_end();
                PreviewInput::Consumed
            }
            _ => PreviewInput::Ignored,
        }
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
        let block = theme::block("Preview", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let has_content = studio.generated().is_some();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(u16::from(has_content)),
        ])
        .split(inner);

        self.render_tabs(frame, chunks[0]);

        let images = &studio.draft().images;
        let lines = match self.platform {
            Platform::Twitter => {
                twitter_card_lines(studio.generated().map(|c| &c.twitter), images)
            }
            Platform::Xiaohongshu => {
                xiaohongshu_card_lines(studio.generated().map(|c| &c.xiaohongshu), images)
            }
        };
        let card_block = theme::block_default(self.platform.label())
            .border_style(Style::default().fg(theme::platform_color(self.platform)));
        frame.render_widget(
            Paragraph::new(lines)
                .block(card_block)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            chunks[1],
        );

        self.render_refine_input(frame, chunks[2], studio, focused, spinner);

        if has_content {
            frame.render_widget(Paragraph::new(quick_refine_line()), chunks[3]);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Platform::ALL
            .iter()
            .map(|p| Line::from(format!(" {} ", p.label())))
            .collect();
        let selected = Platform::ALL
            .iter()
            .position(|&p| p == self.platform)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(theme::muted())
            .highlight_style(
                Style::default()
                    .fg(theme::platform_color(self.platform))
                    .add_modifier(Modifier::BOLD),
            )
            .divider(Span::styled("│", theme::dim()));
        frame.render_widget(tabs, area);
    }

    fn render_refine_input(
        &self,
        frame: &mut Frame,
        area: Rect,
        studio: &Studio,
        focused: bool,
        spinner: &str,
    ) {
        let title = if studio.is_busy() {
            format!("Refine {spinner}")
        } else {
            "Refine (Enter to send)".to_string()
        };
        let block = theme::block(&title, focused);
        let inner = block.inner(area);

        let paragraph = if self.refine.text().is_empty() {
            let hint = if studio.generated().is_some() {
                REFINE_PLACEHOLDER
            } else {
                REFINE_DISABLED_PLACEHOLDER
            };
            Paragraph::new(Span::styled(hint, theme::placeholder()))
        } else {
            let style = if studio.can_refine() {
                Style::default().fg(theme::TEXT)
            } else {
                theme::dim()
            };
            Paragraph::new(Span::styled(self.refine.text().to_string(), style))
        };

        frame.render_widget(paragraph.block(block), area);

        if focused {
            let col = self.refine.text()[..self.refine.cursor_position()]
                .chars()
                .count() as u16;
            frame.set_cursor_position(Position::new(
                inner.x + col.min(inner.width.saturating_sub(1)),
                inner.y,
            ));
        }
    }
}

impl Default for PreviewState {
    fn default() -> Self {
        Self::new()
    }
}

fn tags_line(tags: &[String], color: ratatui::style::Color) -> Line<'static> {
    let spans: Vec<Span> = tags
        .iter()
        .map(|t| Span::styled(format!("{} ", display_tag(t)), Style::default().fg(color)))
        .collect();
    Line::from(spans)
}

fn body_lines(text: &str, style: Style) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|l| Line::styled(l.to_string(), style))
        .collect()
}

/// Twitter-style card: header, text, hashtags, attachments, action bar.
pub fn twitter_card_lines(
    post: Option<&TwitterPost>,
    images: &[UploadedImage],
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                "SocialSync User",
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ✓", Style::default().fg(theme::TWITTER)),
            Span::styled(" @socialsync_ai · 1m", theme::muted()),
        ]),
        Line::raw(""),
    ];

    match post.filter(|p| !p.content.is_empty()) {
        Some(p) => lines.extend(body_lines(&p.content, Style::default().fg(theme::TEXT))),
        None => lines.push(Line::styled(TWEET_PLACEHOLDER, theme::placeholder())),
    }

    if let Some(p) = post.filter(|p| !p.hashtags.is_empty()) {
        lines.push(tags_line(&p.hashtags, theme::TWITTER));
    }

    if !images.is_empty() {
        lines.push(Line::raw(""));
        let spans: Vec<Span> = images
            .iter()
            .take(TWITTER_MAX_IMAGES)
            .map(|img| {
                Span::styled(
                    format!("[🖼 {}] ", img.display_name()),
                    Style::default().fg(theme::TEXT_MUTED),
                )
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled("💬 12   🔁 5   ♡ 48   📊 1.2k   ⇪", theme::muted()));

    if let Some(p) = post {
        let count = p.char_count();
        let style = if p.exceeds_limit() {
            Style::default().fg(theme::ERROR)
        } else {
            theme::dim()
        };
        lines.push(Line::styled(format!("{count}/{TWITTER_CHAR_LIMIT}"), style));
    }

    lines
}

/// Xiaohongshu-style note: cover strip, title, body, tags, comments.
pub fn xiaohongshu_card_lines(
    post: Option<&XiaohongshuPost>,
    images: &[UploadedImage],
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    match images.first() {
        Some(first) => {
            let mut spans = vec![Span::styled(
                format!("[🖼 {}]", first.display_name()),
                Style::default().fg(theme::TEXT_MUTED),
            )];
            if images.len() > 1 {
                spans.push(Span::styled(format!("  1/{}", images.len()), theme::dim()));
            }
            lines.push(Line::from(spans));
        }
        None => lines.push(Line::styled("[ No Image ]", theme::dim())),
    }
    lines.push(Line::raw(""));

    match post.filter(|p| !p.title.is_empty()) {
        Some(p) => lines.push(Line::styled(
            p.title.clone(),
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
        )),
        None => lines.push(Line::styled(XHS_TITLE_PLACEHOLDER, theme::placeholder())),
    }
    lines.push(Line::raw(""));

    match post.filter(|p| !p.content.is_empty()) {
        Some(p) => lines.extend(body_lines(&p.content, Style::default().fg(theme::TEXT))),
        None => lines.push(Line::styled(XHS_CONTENT_PLACEHOLDER, theme::placeholder())),
    }

    if let Some(p) = post.filter(|p| !p.tags.is_empty()) {
        lines.push(Line::raw(""));
        lines.push(tags_line(&p.tags, theme::XHS_TAG));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled("09-15 · Edited", theme::dim()));
    lines.push(Line::from(vec![
        Span::styled("User123: ", theme::muted()),
        Span::raw("Love this vibe! 😍"),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Say something...", theme::dim()),
        Span::styled("   ♡ 1.2k   ☆ 540   💬 89", theme::muted()),
    ]));

    lines
}

/// Hint row listing the one-key refinements.
pub fn quick_refine_line() -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (label, _)) in QUICK_REFINEMENTS.iter().enumerate() {
        spans.push(Span::styled(format!("F{}", i + 1), theme::key_hint()));
        spans.push(Span::styled(format!(" ✦ {label}  "), theme::muted()));
    }
    Line::from(spans)
}
