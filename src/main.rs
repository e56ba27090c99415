//! main.rs
//! Entry point for filebeam

use filebeam::app::AppState;
use filebeam::config::Config;
use filebeam::core::terminal;
use filebeam::logging::init_logging;
use filebeam::utils::cli::{CliAction, handle_args};
use filebeam::utils::resolve_input_path;

use std::io;
use std::path::PathBuf;

fn main() -> io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        tracing::error!("panic: {}", info);
        eprintln!("\n[filebeam] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let initial_path = match handle_args() {
        CliAction::Exit => return Ok(()),
        CliAction::RunApp => None,
        CliAction::RunAppAtPath(path_arg) => match open_target(&path_arg) {
            Some(path) => Some(path),
            None => {
                eprintln!("\n[filebeam] Error: Path '{}' cannot be opened.", path_arg);
                std::process::exit(1);
            }
        },
    };

    let config = Config::load();
    let _log_guard = init_logging(config.log());

    let app = match initial_path {
        Some(path) => AppState::from_dir(&config, &path),
        None => AppState::new(&config),
    };
    let mut app = app.map_err(io::Error::other)?;
    terminal::run_terminal(&mut app)
}

/// Absolute, canonical form of the path argument if it names a directory.
fn open_target(arg: &str) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let path = resolve_input_path(arg, &cwd).canonicalize().ok()?;
    path.is_dir().then_some(path)
}
