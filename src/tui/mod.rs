// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Draws one [`Session`] with ratatui + crossterm and feeds it keys, mouse events and the clock.
//! Calls leave through an outbox and come back as completions from the [`RequestPipeline`].

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::client::HttpTokenizerClient;
use crate::config::Settings;
use crate::interaction::{Effect, Highlight, View};
use crate::model::{Mode, ModelId, StatusKind};
use crate::request::{ApiCall, Completion, RequestPipeline};
use crate::session::Session;

mod layout;
mod theme;

use layout::{char_grid, chip_grid, input_rows, tooltip_label, Cell, Grid};
use theme::{TuiTheme, ACTIVE, HOVER};

/// Input panel height including its border.
const INPUT_HEIGHT: u16 = 5;
const IDLE_POLL: Duration = Duration::from_millis(50);
const TOAST_TTL: Duration = Duration::from_secs(2);
const WHEEL_STEP: isize = 3;
const FOOTER_HINTS: &str = "Tab mode  ^L model  ^R rerun  Esc quit ";

/// Runs the interactive terminal UI until the user quits.
pub fn run(settings: &Settings, initial_text: Option<String>) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    // One worker is plenty: calls are small and mostly waiting on the network.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let client = HttpTokenizerClient::new(settings.endpoint.clone())?;
    let mut pipeline =
        RequestPipeline::new(Arc::new(client), settings.request_timeout(), runtime.handle().clone());

    let mut app = App::new(Session::new(settings.session_options()), theme);
    if let Some(text) = initial_text {
        app.session.set_input(text, Instant::now());
    }

    tracing::info!(
        endpoint = %settings.endpoint,
        mode = %app.session.mode(),
        model = %app.session.model_id(),
        "starting terminal ui"
    );

    let mut terminal = TerminalSession::new()?;
    while !app.should_quit {
        app.tick(Instant::now());
        for call in app.take_outbox() {
            pipeline.dispatch(call);
        }
        while let Some(completion) = pipeline.try_next() {
            app.apply_completion(completion);
        }

        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now());
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    frame.render_widget(Block::default().style(app.theme.base_style()), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let views = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(rows[1]);

    draw_input(frame, app, rows[0]);
    draw_chars(frame, app, views[0]);
    draw_tokens(frame, app, views[1]);
    draw_footer(frame, app, rows[2]);
    draw_tooltip(frame, app, area);
}

fn draw_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (title, text, placeholder) = match &app.focus {
        Focus::Model { buffer } => {
            (" Model (Enter apply, Esc cancel) ".to_string(), buffer.as_str(), "model id")
        }
        Focus::Input => match app.session.mode() {
            Mode::Tokenize => (" Text ".to_string(), app.session.raw_input(), "Type text to tokenize"),
            Mode::Decode => (
                " Token IDs ".to_string(),
                app.session.raw_input(),
                "Comma-separated ids, e.g. 101, 7592, 102",
            ),
        },
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_style(true))
        .title(title);
    let inner = block.inner(area);
    if inner.width == 0 || inner.height == 0 {
        frame.render_widget(block, area);
        return;
    }

    if text.is_empty() {
        let hint = Paragraph::new(Span::styled(placeholder, app.theme.muted_style())).block(block);
        frame.render_widget(hint, area);
        frame.set_cursor(inner.x, inner.y);
        return;
    }

    let rows = input_rows(text, inner.width);
    let skip = rows.len().saturating_sub(usize::from(inner.height));
    let lines: Vec<Line<'_>> = rows.iter().skip(skip).map(|row| Line::raw(row.clone())).collect();
    frame.render_widget(Paragraph::new(lines).style(app.theme.base_style()).block(block), area);

    let last = rows.last().map(|row| row.width()).unwrap_or(0);
    let cursor_x = inner.x.saturating_add(u16::try_from(last).unwrap_or(u16::MAX));
    let cursor_y = inner.y.saturating_add(u16::try_from(rows.len() - 1 - skip).unwrap_or(0));
    frame.set_cursor(cursor_x.min(inner.right().saturating_sub(1)), cursor_y);
}

fn draw_chars(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let session = &app.session;
    let theme = &app.theme;
    let text = session.visualized_text();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border_style(false))
        .title(format!(" Characters ({}) ", text.chars().count()));
    let inner = block.inner(area);
    app.char_view.place(area, inner);

    let grid = char_grid(text, inner.width);
    app.char_view.clamp(grid.row_count());

    let lines = if grid.rows().is_empty() {
        let placeholder = match session.mode() {
            Mode::Tokenize => "Characters appear here",
            Mode::Decode => "Decoded text appears here",
        };
        vec![Line::styled(placeholder, theme.muted_style())]
    } else {
        let selection = session.selection();
        visible_lines(&grid, &app.char_view, text, |cell, ch| {
            let flag = highlight_flag(session.char_highlight(cell.index));
            let mut style = if flag != 0 {
                theme.highlight_style(flag)
            } else if ch.is_whitespace() {
                theme.muted_style()
            } else {
                theme.base_style()
            };
            if selection.hovered_char == Some(cell.index) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            style
        })
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_tokens(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let session = &app.session;
    let theme = &app.theme;
    let tokens = session.tokens();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border_style(false))
        .title(format!(" Tokens ({}) ", tokens.len()));
    let inner = block.inner(area);
    app.token_view.place(area, inner);

    let grid = chip_grid(tokens, inner.width);
    app.token_view.clamp(grid.row_count());

    let lines = if grid.rows().is_empty() {
        vec![Line::styled("No tokens", theme.muted_style())]
    } else {
        let mut lines = Vec::new();
        for row in grid.rows().iter().skip(app.token_view.scroll).take(usize::from(inner.height)) {
            let mut spans = Vec::with_capacity(row.len() * 2);
            let mut col = 0u16;
            for cell in row {
                if cell.col > col {
                    spans.push(Span::raw(" ".repeat(usize::from(cell.col - col))));
                }
                let flag = highlight_flag(session.token_highlight(cell.index));
                let style = if flag != 0 { theme.highlight_style(flag) } else { theme.base_style() };
                spans.push(Span::styled(cell.glyph.clone(), style));
                col = cell.col.saturating_add(cell.width);
            }
            lines.push(Line::from(spans));
        }
        lines
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let status = app.session.status();
    let status_style = match status.kind() {
        StatusKind::Ready => theme.base_style(),
        StatusKind::Progress => theme.progress_style(),
        StatusKind::Error => theme.error_style(),
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", app.session.mode().as_str().to_uppercase()), theme.highlight_style(ACTIVE)),
        Span::raw(" "),
        Span::styled(app.session.model_id().to_string(), theme.key_style()),
        Span::styled(" | ", theme.muted_style()),
        Span::styled(status.message().to_string(), status_style),
    ];
    if let Some(toast) = &app.toast {
        spans.push(Span::styled(" | ", theme.muted_style()));
        spans.push(Span::raw(toast.message.clone()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.base_style()), area);
    if app.footer_width() + FOOTER_HINTS.width() < usize::from(area.width) {
        let hints = Paragraph::new(Span::styled(FOOTER_HINTS, theme.muted_style()))
            .alignment(Alignment::Right);
        frame.render_widget(hints, area);
    }
}

fn draw_tooltip(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(tooltip) = app.session.tooltip() else {
        return;
    };

    let content = format!(" {} ", tooltip_label(&tooltip.content));
    let width = u16::try_from(content.width()).unwrap_or(u16::MAX).min(area.width);
    if width == 0 || area.height == 0 {
        return;
    }

    let mut x = tooltip.x.saturating_add(2);
    if x.saturating_add(width) > area.right() {
        x = area.right().saturating_sub(width);
    }
    let y = if tooltip.y.saturating_add(1) < area.bottom() {
        tooltip.y.saturating_add(1)
    } else {
        tooltip.y.saturating_sub(1)
    };

    let rect = Rect::new(x, y, width, 1).intersection(area);
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(content).style(app.theme.tooltip_style()), rect);
}

/// Renders the visible rows of the character grid.
fn visible_lines<'a>(
    grid: &'a Grid,
    view: &ViewArea,
    text: &str,
    style_for: impl Fn(&Cell, char) -> Style,
) -> Vec<Line<'a>> {
    let chars: Vec<char> = text.chars().collect();
    grid.rows()
        .iter()
        .skip(view.scroll)
        .take(usize::from(view.inner.height))
        .map(|row| {
            let spans: Vec<Span<'a>> = row
                .iter()
                .map(|cell| {
                    let ch = chars.get(cell.index).copied().unwrap_or(' ');
                    Span::styled(cell.glyph.as_str(), style_for(cell, ch))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn highlight_flag(highlight: Highlight) -> u8 {
    let mut flag = 0;
    if highlight.hovered {
        flag |= HOVER;
    }
    if highlight.active {
        flag |= ACTIVE;
    }
    flag
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Focus {
    Input,
    /// Editing the model id; the session keeps the old one until Enter.
    Model { buffer: String },
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Char(usize),
    Token(usize),
    /// Inside the character view, but not on a character.
    CharView,
    /// Inside the token view, but not on a chip.
    TokenView,
    Background,
}

/// Where a scrollable view was last drawn and how far it is scrolled.
#[derive(Debug, Clone, Copy, Default)]
struct ViewArea {
    outer: Rect,
    inner: Rect,
    scroll: usize,
}

impl ViewArea {
    fn place(&mut self, outer: Rect, inner: Rect) {
        self.outer = outer;
        self.inner = inner;
    }

    fn height(&self) -> usize {
        usize::from(self.inner.height)
    }

    fn clamp(&mut self, row_count: usize) {
        self.scroll = self.scroll.min(row_count.saturating_sub(self.height()));
    }

    fn scroll_by(&mut self, delta: isize, row_count: usize) {
        self.scroll = self.scroll.saturating_add_signed(delta);
        self.clamp(row_count);
    }

    /// Scrolls the least amount that puts `row` on screen.
    fn reveal(&mut self, row: usize) {
        let height = self.height();
        if height == 0 {
            return;
        }
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + height {
            self.scroll = row + 1 - height;
        }
    }

    fn contains(&self, x: u16, y: u16) -> bool {
        rect_contains(self.outer, x, y)
    }

    /// Grid row and column under a terminal position, if it lies in the content area.
    fn cell_at(&self, x: u16, y: u16) -> Option<(usize, u16)> {
        if !rect_contains(self.inner, x, y) {
            return None;
        }
        Some((self.scroll + usize::from(y - self.inner.y), x - self.inner.x))
    }
}

fn rect_contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

struct App {
    session: Session,
    theme: TuiTheme,
    focus: Focus,
    outbox: Vec<ApiCall>,
    char_view: ViewArea,
    token_view: ViewArea,
    hovered: Hit,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(session: Session, theme: TuiTheme) -> Self {
        Self {
            session,
            theme,
            focus: Focus::Input,
            outbox: Vec::new(),
            char_view: ViewArea::default(),
            token_view: ViewArea::default(),
            hovered: Hit::Background,
            toast: None,
            should_quit: false,
        }
    }

    /// Advances the clock: fires the debounce and expires the toast.
    fn tick(&mut self, now: Instant) {
        if let Some(call) = self.session.poll(now) {
            self.outbox.push(call);
        }
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    fn take_outbox(&mut self) -> Vec<ApiCall> {
        std::mem::take(&mut self.outbox)
    }

    fn apply_completion(&mut self, completion: Completion) -> bool {
        self.session.apply_completion(completion)
    }

    /// How long the event loop may block before the next tick is due.
    fn poll_timeout(&self, now: Instant) -> Duration {
        match self.session.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    fn set_toast(&mut self, now: Instant, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), expires_at: now + TOAST_TTL });
    }

    fn footer_width(&self) -> usize {
        let mode = self.session.mode().as_str().width() + 3;
        let model = self.session.model_id().as_str().width();
        let status = self.session.status().message().width() + 3;
        let toast = self.toast.as_ref().map_or(0, |toast| toast.message.width() + 3);
        mode + model + status + toast
    }

    fn char_layout(&self) -> Grid {
        char_grid(self.session.visualized_text(), self.char_view.inner.width)
    }

    fn chip_layout(&self) -> Grid {
        chip_grid(self.session.tokens(), self.token_view.inner.width)
    }

    // --- keys ---------------------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.focus {
            Focus::Input => self.handle_input_key(key, now),
            Focus::Model { .. } => self.handle_model_key(key, now),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.toggle_mode(now),
            KeyCode::Char('l') if ctrl => {
                self.focus = Focus::Model { buffer: self.session.model_id().to_string() };
            }
            KeyCode::Char('u') if ctrl => self.edit_input(now, String::clear),
            KeyCode::Char('r') if ctrl => self.session.refresh(now),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(ch) => self.edit_input(now, |text| text.push(ch)),
            KeyCode::Enter => self.edit_input(now, |text| text.push('\n')),
            KeyCode::Backspace => self.edit_input(now, |text| {
                text.pop();
            }),
            KeyCode::PageUp | KeyCode::PageDown => {
                let direction = if key.code == KeyCode::PageUp { -1 } else { 1 };
                if shift {
                    self.scroll_page(View::Tokens, direction);
                } else {
                    self.scroll_page(View::Chars, direction);
                }
            }
            _ => {}
        }
    }

    fn handle_model_key(&mut self, key: KeyEvent, now: Instant) {
        let Focus::Model { buffer } = &mut self.focus else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.focus = Focus::Input,
            KeyCode::Enter => {
                let raw = std::mem::take(buffer);
                self.focus = Focus::Input;
                self.commit_model(&raw, now);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => buffer.push(ch),
            _ => {}
        }
    }

    fn commit_model(&mut self, raw: &str, now: Instant) {
        match ModelId::new(raw) {
            Ok(model_id) if model_id == *self.session.model_id() => {}
            Ok(model_id) => self.session.set_model_id(model_id, now),
            Err(err) => {
                tracing::debug!(input = raw, error = %err, "rejected model id");
                self.set_toast(now, format!("Model unchanged: {err}"));
            }
        }
    }

    fn edit_input(&mut self, now: Instant, edit: impl FnOnce(&mut String)) {
        let mut text = self.session.raw_input().to_owned();
        edit(&mut text);
        self.session.set_input(text, now);
    }

    fn toggle_mode(&mut self, now: Instant) {
        self.session.set_mode(self.session.mode().toggled(), now);
        self.char_view.scroll = 0;
        self.token_view.scroll = 0;
        self.hovered = Hit::Background;
    }

    fn scroll_page(&mut self, view: View, direction: isize) {
        match view {
            View::Chars => {
                let rows = self.char_layout().row_count();
                let page = self.char_view.height().max(1) as isize;
                self.char_view.scroll_by(direction * page, rows);
            }
            View::Tokens => {
                let rows = self.chip_layout().row_count();
                let page = self.token_view.height().max(1) as isize;
                self.token_view.scroll_by(direction * page, rows);
            }
        }
    }

    // --- mouse --------------------------------------------------------------------------------

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => self.pointer_moved(x, y),
            MouseEventKind::Down(MouseButton::Left) => self.pointer_clicked(x, y),
            MouseEventKind::ScrollUp => self.wheel(x, y, -WHEEL_STEP),
            MouseEventKind::ScrollDown => self.wheel(x, y, WHEEL_STEP),
            _ => {}
        }
    }

    fn hit_test(&self, x: u16, y: u16) -> Hit {
        if self.char_view.contains(x, y) {
            return self
                .char_view
                .cell_at(x, y)
                .and_then(|(row, col)| self.char_layout().hit(row, col))
                .map_or(Hit::CharView, Hit::Char);
        }
        if self.token_view.contains(x, y) {
            return self
                .token_view
                .cell_at(x, y)
                .and_then(|(row, col)| self.chip_layout().hit(row, col))
                .map_or(Hit::TokenView, Hit::Token);
        }
        Hit::Background
    }

    fn pointer_moved(&mut self, x: u16, y: u16) {
        let hit = self.hit_test(x, y);
        match (self.hovered, hit) {
            (Hit::Char(_), Hit::Char(_)) | (Hit::Token(_), Hit::Token(_)) => {}
            (Hit::Char(_), _) => self.session.pointer_leave(View::Chars),
            (Hit::Token(_), _) => self.session.pointer_leave(View::Tokens),
            _ => {}
        }
        match hit {
            Hit::Char(char_index) => self.session.pointer_enter_char(char_index, x, y),
            Hit::Token(token_index) => self.session.pointer_enter_token(token_index, x, y),
            Hit::CharView | Hit::TokenView | Hit::Background => {}
        }
        self.hovered = hit;
    }

    fn pointer_clicked(&mut self, x: u16, y: u16) {
        let effect = match self.hit_test(x, y) {
            Hit::Char(char_index) => self.session.click_char(char_index),
            Hit::Token(token_index) => self.session.click_token(token_index),
            // Clicks inside a view never reach the background.
            Hit::CharView | Hit::TokenView => None,
            Hit::Background => {
                self.session.click_background();
                None
            }
        };
        if let Some(effect) = effect {
            self.apply_effect(effect);
        }
    }

    fn wheel(&mut self, x: u16, y: u16, delta: isize) {
        if self.char_view.contains(x, y) {
            let rows = self.char_layout().row_count();
            self.char_view.scroll_by(delta, rows);
        } else if self.token_view.contains(x, y) {
            let rows = self.chip_layout().row_count();
            self.token_view.scroll_by(delta, rows);
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScrollChars { char_index } => {
                if let Some(row) = self.char_layout().row_of(char_index) {
                    self.char_view.reveal(row);
                }
            }
            Effect::ScrollTokens { token_index } => {
                if let Some(row) = self.chip_layout().row_of(token_index) {
                    self.token_view.reveal(row);
                }
            }
        }
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
