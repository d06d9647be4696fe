//! Main application logic and TUI event loop.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::cli::AppConfig;
use crate::data::{Entry, KeyValueStore, SqliteStorage, TrackerId, TrackerStore};
use crate::form::{parse_entry_value, FormField, TextInput, TrackerForm};
use crate::ui::{
    card::{CardLayout, CardView},
    forms::{AlertView, ConfirmView, EntryInputView, TrackerFormView},
    theme::Theme,
    widgets::{StatusBar, TrackerList},
    HelpOverlay,
};
use crate::view::{
    cols_to_px,
    scroll::{ArrowSide, DragGesture, TrackPress},
    FrameQueue, TrackerContext, CELL_WIDTH_PX,
};

const DELETE_PROMPT: &str = "Delete this tracker and its history?";

/// Poll interval while a scroll animation or arrow hold is running
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_POLL: Duration = Duration::from_millis(250);

/// What the keyboard is currently driving
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    NewTracker,
    AddEntry(TrackerId),
    ConfirmDelete(TrackerId),
    /// Blocking message; dismissing it returns to `previous` with its inputs
    Alert { message: String, previous: Box<Mode> },
}

/// The single app-wide pointer capture of an in-progress gesture
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerCapture {
    Thumb { id: TrackerId, gesture: DragGesture },
    ChartPan { id: TrackerId, start_x: f64, start_scroll: f64 },
    Arrow { id: TrackerId, area: Rect },
}

impl PointerCapture {
    fn tracker(&self) -> TrackerId {
        match *self {
            PointerCapture::Thumb { id, .. }
            | PointerCapture::ChartPan { id, .. }
            | PointerCapture::Arrow { id, .. } => id,
        }
    }
}

/// Application state
pub struct App {
    // Configuration
    config: AppConfig,
    theme: Theme,

    // Data
    store: TrackerStore,

    // Per-tracker view state and the after-paint queue
    contexts: HashMap<TrackerId, TrackerContext>,
    frames: FrameQueue,

    // UI State
    mode: Mode,
    form: TrackerForm,
    entry_input: TextInput,
    selected: usize,
    show_help: bool,
    card: Option<CardLayout>,
    capture: Option<PointerCapture>,

    // Exit flag
    should_quit: bool,

    // Error message to display (non-fatal)
    error_message: Option<String>,
}

impl App {
    /// Create a new App over a storage backend
    pub fn new(config: AppConfig, storage: Box<dyn KeyValueStore>) -> Result<Self> {
        let store = TrackerStore::load(storage)?;

        Ok(App {
            config,
            theme: Theme::default(),
            store,
            contexts: HashMap::new(),
            frames: FrameQueue::new(),
            mode: Mode::Browse,
            form: TrackerForm::new(),
            entry_input: TextInput::new(),
            selected: 0,
            show_help: false,
            card: None,
            capture: None,
            should_quit: false,
            error_message: None,
        })
    }

    fn selected_id(&self) -> Option<TrackerId> {
        self.store.trackers().get(self.selected).map(|t| t.id)
    }

    fn selected_context(&mut self) -> Option<&mut TrackerContext> {
        let id = self.selected_id()?;
        self.contexts.get_mut(&id)
    }

    fn select_id(&mut self, id: TrackerId) {
        if let Some(idx) = self.store.trackers().iter().position(|t| t.id == id) {
            self.release_pointer();
            self.selected = idx;
        }
    }

    /// Show a storage failure without ending the session
    fn report(&mut self, error: anyhow::Error) {
        tracing::error!(error = %format!("{error:#}"), "storage write failed");
        self.error_message = Some(format!("{error:#}"));
    }

    fn alert(&mut self, message: String) {
        let previous = std::mem::replace(&mut self.mode, Mode::Browse);
        self.mode = Mode::Alert {
            message,
            previous: Box::new(previous),
        };
    }

    fn dismiss_alert(&mut self) {
        if let Mode::Alert { previous, .. } = std::mem::replace(&mut self.mode, Mode::Browse) {
            self.mode = *previous;
        }
    }

    /// Rebuild a tracker's card after its data changed
    fn rerender(&mut self, id: TrackerId) {
        if let (Some(tracker), Some(ctx)) = (self.store.get(id), self.contexts.get_mut(&id)) {
            ctx.render(tracker, &mut self.frames);
        }
    }

    fn submit_form(&mut self) {
        let new = match self.form.validate() {
            Ok(new) => new,
            Err(e) => {
                tracing::info!(error = %e, "rejected tracker form");
                self.alert(e.to_string());
                return;
            }
        };

        self.mode = Mode::Browse;
        match self
            .store
            .create(new.description, new.unit, Utc::now().timestamp_millis())
        {
            Ok(id) => {
                self.form.reset();
                self.error_message = None;
                self.select_id(id);
            }
            Err(e) => self.report(e),
        }
    }

    fn submit_entry(&mut self, id: TrackerId) {
        let value = match parse_entry_value(&self.entry_input.value) {
            Ok(value) => value,
            Err(e) => {
                tracing::info!(error = %e, input = %self.entry_input.value, "rejected entry");
                self.alert(e.to_string());
                return;
            }
        };

        self.mode = Mode::Browse;
        match self.store.add_entry(id, Entry::new(Local::now().date_naive(), value)) {
            Ok(_) => {
                self.entry_input.clear();
                self.error_message = None;
            }
            Err(e) => self.report(e),
        }
        self.rerender(id);
    }

    fn delete_tracker(&mut self, id: TrackerId) {
        self.mode = Mode::Browse;
        if self.capture.map(|c| c.tracker()) == Some(id) {
            self.capture = None;
        }
        if let Err(e) = self.store.delete(id) {
            self.report(e);
        }
        if let Some(mut ctx) = self.contexts.remove(&id) {
            ctx.teardown();
        }
        self.frames.cancel(id);
        if self.card.map(|c| c.id) == Some(id) {
            self.card = None;
        }
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
    }

    /// End the current gesture, stopping any arrow repeat
    fn release_pointer(&mut self) {
        if let Some(PointerCapture::Arrow { id, .. }) = self.capture.take() {
            if let Some(ctx) = self.contexts.get_mut(&id) {
                ctx.scroll_mut().release_arrow();
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_input(key.code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::FocusLost => self.release_pointer(),
            // Geometry is re-measured on the next draw
            Event::Resize(width, height) => tracing::debug!(width, height, "terminal resized"),
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode) {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::NewTracker => self.handle_form_key(key),
            Mode::AddEntry(id) => self.handle_entry_key(id, key),
            Mode::ConfirmDelete(id) => match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.delete_tracker(id),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.mode = Mode::Browse,
                _ => {}
            },
            Mode::Alert { .. } => self.dismiss_alert(),
        }
    }

    fn handle_browse_key(&mut self, key: KeyCode) {
        // Global shortcuts
        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return;
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return;
            }
            _ => {}
        }

        // If help is shown, don't process other keys
        if self.show_help {
            return;
        }

        let page = self.config.settings.table.visible_rows as isize;
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.store.is_empty() {
                    self.release_pointer();
                    self.selected = (self.selected + 1) % self.store.len();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if !self.store.is_empty() {
                    self.release_pointer();
                    self.selected = self
                        .selected
                        .checked_sub(1)
                        .unwrap_or(self.store.len() - 1);
                }
            }
            KeyCode::Char('n') => self.mode = Mode::NewTracker,
            KeyCode::Char('a') => {
                if let Some(id) = self.selected_id() {
                    self.mode = Mode::AddEntry(id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.mode = Mode::ConfirmDelete(id);
                }
            }
            KeyCode::Left => {
                if let Some(ctx) = self.selected_context() {
                    ctx.scroll_mut().tap_arrow(ArrowSide::Left);
                }
            }
            KeyCode::Right => {
                if let Some(ctx) = self.selected_context() {
                    ctx.scroll_mut().tap_arrow(ArrowSide::Right);
                }
            }
            KeyCode::End => {
                if let Some(ctx) = self.selected_context() {
                    ctx.scroll_mut().jump_to_end();
                }
            }
            KeyCode::PageUp => {
                if let Some(ctx) = self.selected_context() {
                    ctx.table_mut().scroll_by(-page);
                }
            }
            KeyCode::PageDown => {
                if let Some(ctx) = self.selected_context() {
                    ctx.table_mut().scroll_by(page);
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Left | KeyCode::Right if self.form.focus == FormField::Unit => {
                self.form.cycle_unit(key == KeyCode::Right);
            }
            _ => {
                if let Some(input) = self.form.focused_input() {
                    edit_input(input, key);
                }
            }
        }
    }

    fn handle_entry_key(&mut self, id: TrackerId, key: KeyCode) {
        match key {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => self.submit_entry(id),
            _ => edit_input(&mut self.entry_input, key),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        // Releases always land, whatever is on screen
        if mouse.kind == MouseEventKind::Up(MouseButton::Left) {
            self.release_pointer();
            return;
        }
        if self.mode != Mode::Browse || self.show_help {
            return;
        }
        let Some(card) = self.card else {
            return;
        };

        let pos = Position::new(mouse.column, mouse.row);
        // Ctrl/Alt + wheel belongs to the terminal (zoom and friends)
        let plain_wheel = !mouse
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(card, pos),
            MouseEventKind::Drag(MouseButton::Left) => self.pointer_move(card, pos),
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight if plain_wheel => {
                self.wheel(card, pos, 1.0)
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft if plain_wheel => {
                self.wheel(card, pos, -1.0)
            }
            _ => {}
        }
    }

    fn pointer_down(&mut self, card: CardLayout, pos: Position) {
        let Some(ctx) = self.contexts.get_mut(&card.id) else {
            return;
        };
        let bar = card.scrollbar;

        for (area, side) in [
            (bar.left_arrow, ArrowSide::Left),
            (bar.right_arrow, ArrowSide::Right),
        ] {
            if area.contains(pos) {
                ctx.scroll_mut().press_arrow(side, Instant::now());
                self.capture = Some(PointerCapture::Arrow { id: card.id, area });
                return;
            }
        }

        if bar.track.contains(pos) {
            if !ctx.scroll().track_visible() {
                return;
            }
            if let TrackPress::Thumb(gesture) = ctx.scroll_mut().press_track(track_x(bar.track, pos.x)) {
                self.capture = Some(PointerCapture::Thumb { id: card.id, gesture });
            }
        } else if card.chart.contains(pos) {
            ctx.scroll_mut().cancel_animation();
            self.capture = Some(PointerCapture::ChartPan {
                id: card.id,
                start_x: cols_to_px(pos.x),
                start_scroll: ctx.scroll().viewport().scroll_left(),
            });
        }
    }

    fn pointer_move(&mut self, card: CardLayout, pos: Position) {
        let Some(capture) = self.capture else {
            return;
        };
        let Some(ctx) = self.contexts.get_mut(&capture.tracker()) else {
            self.capture = None;
            return;
        };

        match capture {
            PointerCapture::Thumb { gesture, .. } => {
                ctx.scroll_mut().drag(gesture, track_x(card.scrollbar.track, pos.x));
            }
            PointerCapture::ChartPan {
                start_x,
                start_scroll,
                ..
            } => {
                ctx.scroll_mut()
                    .pan_to(start_scroll - (cols_to_px(pos.x) - start_x));
            }
            // Leaving the button stops the repeat
            PointerCapture::Arrow { area, .. } => {
                if !area.contains(pos) {
                    self.release_pointer();
                }
            }
        }
    }

    fn wheel(&mut self, card: CardLayout, pos: Position, direction: f64) {
        let Some(ctx) = self.contexts.get_mut(&card.id) else {
            return;
        };
        if card.chart.contains(pos) || card.scrollbar.track.contains(pos) {
            ctx.scroll_mut()
                .scroll_by_smooth(direction * self.config.settings.scrollbar.wheel_step_px);
        } else if card.history.contains(pos) {
            ctx.table_mut().scroll_by(direction as isize);
        }
    }

    /// Advance arrow repeats and smooth scrolls
    fn tick(&mut self, now: Instant) {
        for ctx in self.contexts.values_mut() {
            ctx.scroll_mut().tick(now);
        }
    }

    fn is_animating(&self) -> bool {
        self.contexts.values().any(|c| c.scroll().is_animating())
    }

    /// Run the tasks queued while drawing the last frame. Returns whether the
    /// next frame will look different.
    fn after_paint(&mut self) -> bool {
        let mut changed = false;
        for task in self.frames.take() {
            // Tasks for a tracker torn down in the meantime are dropped
            if let Some(ctx) = self.contexts.get_mut(&task.tracker()) {
                changed |= ctx.apply(task, &mut self.frames);
            }
        }
        changed
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Main layout: body, footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Body
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        // Body layout: sidebar (left) and card (right)
        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(28), // Sidebar
                Constraint::Min(40),    // Card
            ])
            .split(main_chunks[0]);

        TrackerList::new(self.store.trackers(), self.selected, &self.theme).render(
            frame,
            body_chunks[0],
            self.mode == Mode::Browse,
        );

        let dragging = matches!(self.capture, Some(PointerCapture::Thumb { .. }));
        self.card = match self.store.trackers().get(self.selected) {
            Some(tracker) => {
                let ctx = self.contexts.entry(tracker.id).or_insert_with(|| {
                    TrackerContext::new(tracker, &self.config.settings, &mut self.frames)
                });
                let title = tracker.title();
                let card = CardView::new(
                    &title,
                    self.config.settings.chart.max_visible_ticks,
                    dragging,
                    &self.theme,
                );
                Some(card.render(frame, body_chunks[1], ctx, &mut self.frames))
            }
            None => {
                let empty = Paragraph::new("No trackers yet. Press [n] to create one.")
                    .style(self.theme.muted_style())
                    .alignment(Alignment::Center);
                frame.render_widget(empty, body_chunks[1]);
                None
            }
        };

        // Render status bar
        let title = self.store.trackers().get(self.selected).map(|t| t.title());
        let status_bar = StatusBar::new(title.as_deref(), self.error_message.as_deref(), &self.theme);
        status_bar.render(frame, main_chunks[1]);

        self.render_modal(frame, &self.mode, size);

        // Render help overlay if active
        if self.show_help {
            let help = HelpOverlay::new(&self.theme);
            help.render(frame, size);
        }
    }

    fn render_modal(&self, frame: &mut Frame, mode: &Mode, area: Rect) {
        match mode {
            Mode::Browse => {}
            Mode::NewTracker => TrackerFormView::new(&self.form, &self.theme).render(frame, area),
            Mode::AddEntry(id) => {
                let unit = self.store.get(*id).map_or("", |t| t.unit.as_str());
                EntryInputView::new(&self.entry_input, unit, &self.theme).render(frame, area);
            }
            Mode::ConfirmDelete(_) => ConfirmView::new(DELETE_PROMPT, &self.theme).render(frame, area),
            Mode::Alert { message, previous } => {
                self.render_modal(frame, previous, area);
                AlertView::new(message, &self.theme).render(frame, area);
            }
        }
    }
}

fn edit_input(input: &mut TextInput, key: KeyCode) {
    match key {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        _ => {}
    }
}

/// Logical x of a column's center relative to the track start; negative
/// left of the track
fn track_x(track: Rect, column: u16) -> f64 {
    (f64::from(column) - f64::from(track.x)) * CELL_WIDTH_PX + CELL_WIDTH_PX / 2.0
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    );
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    // Open storage before taking over the terminal so failures print normally
    let db_path = config.database_path();
    let storage = SqliteStorage::open(&db_path)
        .with_context(|| format!("Failed to open tracker database at {db_path:?}"))?;
    tracing::info!(path = %storage.path().display(), "opened storage");
    let mut app = App::new(config, Box::new(storage)).context("Failed to initialize application")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    // Main loop - wrap in a closure to ensure cleanup
    let result = run_main_loop(&mut terminal, &mut app);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    result
}

/// Main application loop
fn run_main_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Render - if this fails, we should exit
        terminal.draw(|f| app.render(f))?;

        // Measure-then-resize work for the frame just painted
        let changed = app.after_paint();

        let timeout = if changed || !app.frames.is_empty() {
            Duration::ZERO
        } else if app.is_animating() {
            FRAME_INTERVAL
        } else {
            IDLE_POLL
        };
        if event::poll(timeout)? {
            app.handle_event(event::read()?);
        }
        app.tick(Instant::now());

        if app.should_quit {
            tracing::info!("quitting");
            return Ok(());
        }
    }
}
