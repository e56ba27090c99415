//! UI tests for filebeam.
//!
//! Renders full frames into a ratatui `TestBackend` and checks what a user would see: the size
//! placeholder while directory sizes are outstanding, the resolved sizes afterwards, dialogs
//! and the denial state.
//!
//! Every test works inside its own temporary directory, removed when the test ends.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use filebeam::app::AppState;
use filebeam::config::Config;
use filebeam::core::{self, CALCULATING};
use filebeam::ui::{layout_chunks, render};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use std::error;
use std::fs;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn error::Error>>;

fn draw(app: &AppState) -> Result<String, Box<dyn error::Error>> {
    let mut terminal = Terminal::new(TestBackend::new(100, 20))?;
    terminal.draw(|f| render(f, app))?;

    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    let rows: Vec<String> = buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect();
    Ok(rows.join("\n"))
}

fn settle(app: &mut AppState) -> TestResult {
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.sizes().outstanding() > 0 || app.pending_ops() > 0 {
        if Instant::now() > deadline {
            return Err("workers did not settle".into());
        }
        app.tick();
        thread::sleep(Duration::from_millis(10));
    }
    Ok(())
}

fn press(app: &mut AppState, code: KeyCode) {
    app.handle_keypress(KeyEvent::new(code, KeyModifiers::NONE));
}

#[test]
fn directory_sizes_fill_in_after_calculation() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.txt"), [0u8; 10])?;
    fs::create_dir(dir.path().join("sub"))?;
    fs::write(dir.path().join("sub").join("inner.bin"), [0u8; 10])?;

    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path())?;

    let screen = draw(&app)?;
    assert!(screen.contains("sub/"), "directory row missing:\n{}", screen);
    assert!(
        screen.contains(CALCULATING),
        "size placeholder missing before results are applied:\n{}",
        screen
    );

    settle(&mut app)?;
    let screen = draw(&app)?;
    assert!(!screen.contains(CALCULATING), "placeholder left:\n{}", screen);
    assert_eq!(screen.matches("10 B").count(), 2, "screen:\n{}", screen);
    Ok(())
}

#[test]
fn delete_key_shows_confirmation_dialog() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("doomed.txt"), b"x")?;

    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path())?;
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('d'));

    let screen = draw(&app)?;
    assert!(screen.contains("Confirm Delete"), "screen:\n{}", screen);
    assert!(screen.contains("1 item? [y/N]"), "screen:\n{}", screen);
    assert!(screen.contains("- doomed.txt"), "screen:\n{}", screen);

    press(&mut app, KeyCode::Esc);
    let screen = draw(&app)?;
    assert!(!screen.contains("Confirm Delete"));
    assert!(dir.path().join("doomed.txt").exists());
    Ok(())
}

#[test]
fn empty_directory_shows_only_parent() -> TestResult {
    let dir = tempdir()?;
    let config = Config::default();
    let app = AppState::from_dir(&config, dir.path())?;

    assert_eq!(app.nav().entries().len(), 1);
    let screen = draw(&app)?;
    assert!(screen.contains(".."));
    assert!(screen.contains("1/1"), "footer position missing:\n{}", screen);
    Ok(())
}

#[test]
fn unlistable_path_renders_denial_instead_of_listing() -> TestResult {
    let dir = tempdir()?;
    let file = dir.path().join("not_a_dir.txt");
    fs::write(&file, b"data")?;

    let config = Config::default();
    let denied = AppState::from_dir(&config, &file)?;
    assert!(denied.nav().is_denied());
    assert!(denied.nav().entries().is_empty());

    let screen = draw(&denied)?;
    assert!(
        screen.contains("Permission denied - cannot access directory"),
        "screen:\n{}",
        screen
    );
    assert!(!screen.contains("[Empty]"), "screen:\n{}", screen);
    assert!(!screen.contains(".."), "screen:\n{}", screen);

    let listed = AppState::from_dir(&config, dir.path())?;
    let screen = draw(&listed)?;
    assert!(!screen.contains("Permission denied"), "screen:\n{}", screen);
    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_directory_renders_denial() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let locked = dir.path().join("locked");
    fs::create_dir(&locked)?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // privileged users read through the mode bits
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let config = Config::default();
    let app = AppState::from_dir(&config, &locked)?;
    let screen = draw(&app);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;

    assert!(app.nav().is_denied());
    assert!(screen?.contains("Permission denied"));
    Ok(())
}

#[test]
fn sanitize_gives_exact_width() {
    let cases = ["short.txt", "very_long_filename.txt", "🦀_crab.rs", "\t_tab"];

    for input in cases {
        let result = core::sanitize_to_exact_width(input, 10);
        let width = unicode_width::UnicodeWidthStr::width(result.as_str());

        assert_eq!(width, 10, "input '{}' gave '{}'", input, result);
        assert!(
            !result.chars().any(|c| c.is_control()),
            "control characters left in {:?}",
            result
        );
    }
}

#[test]
fn layout_leaves_room_for_listing() {
    let chunks = layout_chunks(Rect::new(0, 0, 100, 10));
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].height + chunks[1].height + chunks[2].height, 10);
    assert_eq!(chunks[1].height, 8);
}
