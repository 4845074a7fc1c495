//! Snapshot tests for the timeline viewer
//!
//! Uses insta + ratatui TestBackend to verify rendering output doesn't regress.

use chronicle::config::{merge_config, ConfigFile, ResolvedConfig};
use chronicle::model::{Book, ZoomLevel};
use chronicle::view::TuiApp;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

// ===== Test Helpers =====

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Empty lines are removed to keep snapshots clean.
fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Twentieth century at decade zoom.
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

fn create_app(books: Vec<Book>, width: u16, height: u16) -> TuiApp<TestBackend> {
    let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    TuiApp::with_terminal(terminal, books, &config()).unwrap()
}

fn press(app: &mut TuiApp<TestBackend>, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn screen(app: &mut TuiApp<TestBackend>) -> String {
    app.draw().unwrap();
    buffer_to_string(app.terminal().backend().buffer())
}

fn war_shelf() -> Vec<Book> {
    vec![
        historical("Band of Brothers", 1942, 1945),
        historical("Dreadnought", 1906, 1914),
        historical("The Guns of August", 1914, 1918),
    ]
}

// ===== Snapshots =====

#[test]
fn snapshot_timeline_from_start() {
    let mut app = create_app(war_shelf(), 64, 8);
    press(&mut app, KeyCode::Char('g'));

    let output = screen(&mut app);

    insta::assert_snapshot!(output, @r"
Modern                                       Contemporary
1900
      Dreadnought                         Band of Bro…
      1906 – 1914                         1942 – 1945
              The Guns of…
              1914 – 1918
 decade · 1900 – 1964 · 3 on timeline · 0 without era · q quit
");
}

#[test]
fn sidebar_lists_books_without_era() {
    let mut books = war_shelf();
    books.push(Book::new("Atomic Habits", "James Clear"));
    let mut app = create_app(books, 80, 12);

    let output = screen(&mut app);

    assert!(output.contains("No historical era"));
    assert!(output.contains("1 book"));
    assert!(output.contains("Atomic Habits"));
    assert!(output.contains("James Clear"));
    assert!(output.contains("3 on timeline · 1 without era"));
}

#[test]
fn sidebar_toggle_hides_panel() {
    let mut books = war_shelf();
    books.push(Book::new("Atomic Habits", "James Clear"));
    let mut app = create_app(books, 80, 12);
    press(&mut app, KeyCode::Tab);

    let output = screen(&mut app);

    assert!(!output.contains("No historical era"));
    assert!(output.contains("1 without era"));
}

#[test]
fn opens_on_the_present() {
    let mut app = create_app(war_shelf(), 64, 8);

    let output = screen(&mut app);

    // 2000 sits at column 48 of 64
    assert!(output.contains(" decade · 1952 – 2016 "), "{output}");
    assert!(output.contains("Contemporary"));
}

#[test]
fn opens_on_the_present_beside_the_sidebar() {
    let mut books = war_shelf();
    books.push(Book::new("Atomic Habits", "James Clear"));
    let mut app = create_app(books, 80, 12);

    let output = screen(&mut app);

    // 80 columns less the 32 column sidebar leaves 48; 2000 sits at column 36
    let state = app.state();
    let present = state.bounds().year_to_pixel(2000, state.pixels_per_year());
    assert_eq!(state.viewport_px(), 48.0 * 8.0);
    assert_eq!(state.column_of(present), 36);
    assert!(output.contains(" decade · 1964 – 2012 "), "{output}");
}

#[test]
fn zoom_key_switches_to_century() {
    let mut app = create_app(war_shelf(), 64, 8);
    press(&mut app, KeyCode::Char('g'));
    press(&mut app, KeyCode::Char('z'));

    let output = screen(&mut app);

    assert_eq!(app.state().zoom(), ZoomLevel::Century);
    // The whole century is 80 px wide, so the view cannot scroll
    assert_eq!(app.state().scroll_px(), 0.0);
    assert!(output.contains(" century · 1900 – "), "{output}");
}

#[test]
fn tiny_terminal_renders_without_panic() {
    let mut app = create_app(war_shelf(), 4, 2);
    let output = screen(&mut app);
    assert!(!output.is_empty());
}
