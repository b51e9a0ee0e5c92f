use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::core::images::parse_path_list;
use crate::core::studio::{RequestKind, Studio, QUICK_REFINEMENTS};

use super::events::{Action, AppEvent, Focus, Notification, NotificationLevel};
use super::layout::AppLayout;
use super::services::Services;
use super::theme;
use super::views::attach::{AttachInput, AttachState};
use super::views::editor::EditorState;
use super::views::preview::{PreviewInput, PreviewState};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const MAX_NOTIFICATIONS: usize = 3;
const NOTIFICATION_TTL_TICKS: u32 = 100;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Pane with keyboard focus.
    pub focus: Focus,
    /// Draft, generated content, request phase and error.
    pub studio: Studio,
    pub editor: EditorState,
    pub preview: PreviewState,
    /// Attach modal (Some when open).
    pub attach: Option<AttachState>,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Whether the help modal is open.
    pub show_help: bool,
    tick_count: u64,
    /// When content was last replaced, for the status bar.
    last_generated: Option<DateTime<Local>>,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender for pushing events from within the app.
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        services: Services,
    ) -> Self {
        Self {
            running: true,
            focus: Focus::Editor,
            studio: Studio::new(),
            editor: EditorState::new(),
            preview: PreviewState::new(),
            attach: None,
            notifications: Vec::new(),
            show_help: false,
            tick_count: 0,
            last_generated: None,
            event_rx,
            event_tx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        if !self.services.generator.is_configured() {
            self.push_notification(
                "No API key configured. Generation will fail.".to_string(),
                NotificationLevel::Warning,
            );
        }

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => self.handle_input(crossterm_event),
            AppEvent::GenerationFinished { kind, result } => {
                let ok = result.is_ok();
                self.studio.finish(kind, result);
                if ok {
                    self.last_generated = Some(Local::now());
                    let message = match kind {
                        RequestKind::Generate => "Content generated",
                        RequestKind::Refine => "Content refined",
                    };
                    self.push_notification(message.to_string(), NotificationLevel::Success);
                }
            }
            AppEvent::ImagesIngested(result) => match result {
                Ok(batch) => {
                    let count = batch.len();
                    self.studio.append_images(batch);
                    self.editor.clamp_selection(self.studio.draft().images.len());
                    log::info!("Attached {count} image(s)");
                    self.push_notification(
                        format!("Attached {count} image(s)"),
                        NotificationLevel::Info,
                    );
                }
                Err(e) => {
                    log::error!("Image ingest failed: {e}");
                    self.push_notification(e.to_string(), NotificationLevel::Error);
                }
            },
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    fn handle_input(&mut self, event: Event) {
        // Priority 1: quit works everywhere
        if is_quit_key(&event) {
            self.handle_action(Action::Quit);
            return;
        }

        // Priority 2: attach modal consumes all input when open
        if let Some(ref mut attach) = self.attach {
            match attach.handle_input(&event) {
                AttachInput::Consumed => {}
                AttachInput::Submit(paths) => self.handle_action(Action::AttachPaths(paths)),
                AttachInput::Cancel => self.handle_action(Action::CloseAttach),
            }
            return;
        }

        // Priority 3: help modal
        if self.show_help {
            if let Some(action) = map_help_input(&event) {
                self.handle_action(action);
            }
            return;
        }

        // Priority 4: global keybindings
        if let Some(action) = map_global_input(&event) {
            self.handle_action(action);
            return;
        }

        // Priority 5: focused pane
        match self.focus {
            Focus::Editor => {
                self.editor.handle_input(&event, &mut self.studio);
            }
            Focus::Refine => {
                let can_refine = self.studio.can_refine();
                if let PreviewInput::Submit(instruction) =
                    self.preview.handle_input(&event, can_refine)
                {
                    self.handle_action(Action::Refine(instruction));
                }
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
            Action::TogglePlatform => self.preview.toggle_platform(),
            Action::Generate => match self.studio.begin_generate() {
                Ok(request) => {
                    log::info!(
                        "Generating from draft ({} chars, {} image(s))",
                        request.text.chars().count(),
                        request.images.len()
                    );
                    self.services.spawn_generation(RequestKind::Generate, request);
                }
                Err(rejected) => {
                    self.push_notification(rejected.to_string(), NotificationLevel::Warning);
                }
            },
            Action::Refine(instruction) => self.start_refine(&instruction),
            Action::QuickRefine(idx) => {
                if let Some((_, instruction)) = QUICK_REFINEMENTS.get(idx) {
                    if self.studio.generated().is_some() {
                        self.start_refine(instruction);
                    }
                }
            }
            Action::OpenAttach => self.attach = Some(AttachState::new()),
            Action::CloseAttach => self.attach = None,
            Action::AttachPaths(input) => {
                self.attach = None;
                let paths = parse_path_list(&input);
                if paths.is_empty() {
                    return;
                }
                log::debug!("Ingesting {} path(s)", paths.len());
                self.services.spawn_ingest(paths);
            }
            Action::RemoveSelectedImage => {
                let idx = self.editor.selected_image();
                if let Some(removed) = self.studio.remove_image(idx) {
                    log::debug!("Removed image {}", removed.display_name());
                    self.editor.clamp_selection(self.studio.draft().images.len());
                }
            }
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::DismissError => self.studio.dismiss_error(),
            Action::Quit => {
                let _ = self.event_tx.send(AppEvent::Quit);
                self.running = false;
            }
        }
    }

    fn start_refine(&mut self, instruction: &str) {
        match self.studio.begin_refine(instruction) {
            Ok(request) => {
                log::info!("Refining with instruction: {instruction}");
                self.services.spawn_generation(RequestKind::Refine, request);
            }
            Err(rejected) => {
                self.push_notification(rejected.to_string(), NotificationLevel::Warning);
            }
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notifications.push(Notification {
            message,
            level,
            ttl_ticks: NOTIFICATION_TTL_TICKS,
        });

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: advance the spinner, expire notifications.
    fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[(self.tick_count / 2) as usize % SPINNER_FRAMES.len()]
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let error = self.studio.error();
        let (layout, _) = AppLayout::compute(area, error.is_some());
        let spinner = self.spinner();

        let modal_open = self.attach.is_some() || self.show_help;
        self.editor.render(
            frame,
            layout.editor,
            &self.studio,
            !modal_open && self.focus == Focus::Editor,
            spinner,
        );
        self.preview.render(
            frame,
            layout.preview,
            &self.studio,
            !modal_open && self.focus == Focus::Refine,
            spinner,
        );

        if let Some(message) = error {
            frame.render_widget(Paragraph::new(error_line(message)), layout.error);
        }

        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }

        if let Some(ref attach) = self.attach {
            attach.render(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let generator = &self.services.generator;
        let llm_status = if self.studio.is_busy() {
            Span::styled(
                format!("{} working", self.spinner()),
                Style::default().fg(theme::PRIMARY_LIGHT),
            )
        } else if generator.is_configured() {
            Span::styled("ready", Style::default().fg(theme::TEXT_MUTED))
        } else {
            Span::styled("no API key", Style::default().fg(theme::WARNING))
        };

        let last_generated = match self.last_generated {
            Some(at) => Span::styled(format!(" · updated {}", at.format("%H:%M")), theme::dim()),
            None => Span::raw(""),
        };

        let status = Line::from(vec![
            Span::styled(" SocialSync ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled(generator.model().to_string(), theme::key_hint()),
            Span::raw(" "),
            llm_status,
            last_generated,
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":focus "),
            Span::styled("Ctrl+T", theme::key_hint()),
            Span::raw(":platform "),
            Span::styled("F12", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("Ctrl+Q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let notification_area = Rect::new(x, 1, max_width, height.min(area.height));

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 70, area);

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", theme::title())),
            Line::raw(""),
        ];

        for (key, desc) in KEYBINDINGS {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), theme::title())));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{key:<20}"),
                        Style::default()
                            .fg(theme::PRIMARY_LIGHT)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ]));
            }
        }

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

const KEYBINDINGS: &[(&str, &str)] = &[
    ("Global:", ""),
    ("Ctrl+G", "Adapt draft with AI"),
    ("Ctrl+O", "Attach images"),
    ("Ctrl+D", "Remove selected image"),
    ("Ctrl+T", "Switch preview platform"),
    ("Tab / Shift+Tab", "Switch focus"),
    ("F1 / F2 / F3", "Shorter / Professional / More Emojis"),
    ("Esc", "Dismiss error"),
    ("F12", "Toggle this help"),
    ("Ctrl+Q", "Quit"),
    ("", ""),
    ("Draft:", ""),
    ("Enter", "New line"),
    ("Alt+Left / Alt+Right", "Select image"),
    ("", ""),
    ("Refine:", ""),
    ("Enter", "Send refinement"),
    ("PgUp / PgDn", "Scroll preview"),
];

fn press(event: &Event) -> Option<(KeyModifiers, KeyCode)> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => Some((*modifiers, *code)),
        _ => None,
    }
}

fn is_quit_key(event: &Event) -> bool {
    matches!(
        press(event),
        Some((KeyModifiers::CONTROL, KeyCode::Char('q' | 'c')))
    )
}

fn map_help_input(event: &Event) -> Option<Action> {
    match press(event)? {
        (_, KeyCode::Esc | KeyCode::F(12)) => Some(Action::CloseHelp),
        _ => None,
    }
}

fn map_global_input(event: &Event) -> Option<Action> {
    let action = match press(event)? {
        (KeyModifiers::CONTROL, KeyCode::Char('g')) => Action::Generate,
        (KeyModifiers::CONTROL, KeyCode::Char('o')) => Action::OpenAttach,
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => Action::RemoveSelectedImage,
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => Action::TogglePlatform,
        (KeyModifiers::NONE, KeyCode::Tab) => Action::FocusNext,
        (_, KeyCode::BackTab) => Action::FocusPrev,
        (KeyModifiers::NONE, KeyCode::Esc) => Action::DismissError,
        (KeyModifiers::NONE, KeyCode::F(n @ 1..=3)) => Action::QuickRefine(usize::from(n - 1)),
        (_, KeyCode::F(12)) => Action::ShowHelp,
        _ => return None,
    };
    Some(action)
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" Error: {message} "),
            Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Esc", theme::key_hint()),
        Span::styled(":dismiss", theme::muted()),
    ])
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
