//! TUI rendering and terminal management (impure shell)

pub mod constants;
mod helpers;
pub mod layout;
mod sidebar;
pub mod state;
mod styles;
mod timeline;

pub use helpers::truncate;
pub use layout::{calculate_areas, render_layout, status_text, Screen, ScreenAreas};
pub use sidebar::NeedsEraSidebar;
pub use state::ViewState;
pub use styles::{ColorConfig, TimelineStyles};
pub use timeline::{visible_card_rows, TimelineView};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::Book;
use crate::timeline::{row_count, RowStacker};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Timeline viewer.
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    books: Vec<Book>,
    stacker: RowStacker,
    state: ViewState,
    key_bindings: KeyBindings,
    styles: TimelineStyles,
    /// Card rows in the last drawn layout
    rows: usize,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize the viewer
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(books: Vec<Book>, config: &ResolvedConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Self::with_terminal(terminal, books, config)
    }

    /// Run the event loop until the reader quits.
    pub fn run(&mut self) -> Result<(), TuiError> {
        const POLL_INTERVAL: Duration = Duration::from_millis(250);

        self.draw()?;

        loop {
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if self.handle_key(key) {
                        return Ok(());
                    }
                    self.draw()?;
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "Terminal resized");
                    self.draw()?;
                }
                _ => {}
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Viewer over an existing terminal.
    pub fn with_terminal(
        terminal: Terminal<B>,
        books: Vec<Book>,
        config: &ResolvedConfig,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        let stacker = RowStacker {
            bounds: config.bounds,
            min_card_width: config.min_card_width,
            card_gap: config.card_gap,
        };
        // Open on the present as seen in the first frame's timeline area.
        let show_sidebar = books.iter().any(|book| !book.has_historical_era);
        let areas = calculate_areas(Rect::new(0, 0, size.width, size.height), show_sidebar);
        let state = ViewState::new(config.bounds, config.zoom, areas.timeline.width);

        Ok(Self {
            terminal,
            books,
            stacker,
            state,
            key_bindings: KeyBindings::default(),
            styles: TimelineStyles::new(),
            rows: 0,
        })
    }

    /// Current viewer state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Mutable viewer state.
    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    /// The terminal being drawn to.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if the viewer should close
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.key_bindings.get(key) {
            Some(action) => {
                debug!(?action, "Key action");
                self.state.apply(action, self.rows)
            }
            None => false,
        }
    }

    /// Render the current frame.
    ///
    /// The viewport is resized to the timeline area first so scroll limits
    /// follow the terminal width and the sidebar toggle.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let needs_era: Vec<&Book> = self
            .books
            .iter()
            .filter(|book| !book.has_historical_era)
            .collect();

        let show_sidebar = self.state.sidebar_visible() && !needs_era.is_empty();
        let areas = calculate_areas(Rect::new(0, 0, size.width, size.height), show_sidebar);
        self.state.set_viewport(areas.timeline.width);

        let cards = self.stacker.stack(&self.books, self.state.pixels_per_year());
        self.rows = row_count(&cards);

        let screen = Screen {
            state: &self.state,
            cards: &cards,
            needs_era: &needs_era,
            styles: self.styles,
        };
        self.terminal.draw(|frame| render_layout(frame, &screen))?;
        Ok(())
    }
}

/// Show `books` in the timeline viewer until the reader quits.
///
/// Logging must be initialized by the caller; the terminal is restored even
/// when the event loop fails.
pub fn run_timeline(books: Vec<Book>, config: &ResolvedConfig) -> Result<(), TuiError> {
    info!(books = books.len(), zoom = %config.zoom, "Opening timeline");
    let mut app = TuiApp::new(books, config)?;

    let result = app.run();

    restore_terminal()?;

    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{merge_config, ConfigFile};
    use crate::model::ZoomLevel;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn config() -> ResolvedConfig {
        merge_config(Some(ConfigFile {
            timeline_start_year: Some(1900),
            timeline_end_year: Some(2000),
            zoom: Some(ZoomLevel::Decade),
            ..ConfigFile::default()
        }))
        .unwrap()
    }

    fn historical(title: &str, start: i32, end: i32) -> Book {
        let mut book = Book::new(title, "Author");
        book.set_manual_era(&start.to_string(), &end.to_string(), "");
        book
    }

    fn app(books: Vec<Book>) -> TuiApp<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(64, 8)).unwrap();
        TuiApp::with_terminal(terminal, books, &config()).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn tui_error_from_io_error() {
        let io_err = io::Error::other("test error");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
    }

    #[test]
    fn quit_keys_close_the_viewer() {
        let mut app = app(Vec::new());
        assert!(app.handle_key(key(KeyCode::Char('q'))));
        assert!(app.handle_key(key(KeyCode::Esc)));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn unbound_key_is_ignored() {
        let mut app = app(Vec::new());
        let before = app.state().clone();
        assert!(!app.handle_key(key(KeyCode::Char('x'))));
        assert_eq!(app.state(), &before);
    }

    #[test]
    fn draw_sizes_viewport_to_timeline_area() {
        let mut app = app(vec![Book::new("Atomic Habits", "James Clear")]);
        app.draw().unwrap();
        // Sidebar shown: 64 - 32 columns remain
        assert_eq!(app.state().viewport_px(), 32.0 * constants::CELL_WIDTH_PX);

        app.handle_key(key(KeyCode::Tab));
        app.draw().unwrap();
        assert_eq!(app.state().viewport_px(), 64.0 * constants::CELL_WIDTH_PX);
    }

    #[test]
    fn opening_viewport_excludes_sidebar() {
        let app = app(vec![Book::new("Atomic Habits", "James Clear")]);
        assert_eq!(app.state().viewport_px(), 32.0 * constants::CELL_WIDTH_PX);
    }

    #[test]
    fn row_scrolling_uses_drawn_layout() {
        let mut app = app(vec![
            historical("Dreadnought", 1906, 1914),
            historical("The Guns of August", 1914, 1918),
        ]);
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.state().first_row(), 0);

        app.draw().unwrap();
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.state().first_row(), 1);
    }

    #[test]
    fn zoom_key_toggles_density() {
        let mut app = app(Vec::new());
        app.draw().unwrap();
        app.handle_key(key(KeyCode::Char('z')));
        assert_eq!(app.state().zoom(), ZoomLevel::Century);
    }
}
