//! Command-line argument parsing and help for filebeam.
//!
//! When invoked with no args (filebeam), the TUI opens at the filesystem root.

use crate::config::Config;

#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    RunApp,
    RunAppAtPath(String),
    Exit,
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

/// Decides what to do from the arguments after the program name.
///
/// Informational flags print their output here and return [CliAction::Exit].
pub fn parse_args(args: &[String]) -> CliAction {
    let Some(first) = args.first() else {
        return CliAction::RunApp;
    };

    if args.len() > 1 {
        eprintln!("Error: filebeam accepts only one argument at a time.");
        eprintln!("Usage: filebeam [PATH] or filebeam [OPTION]");
        return CliAction::Exit;
    }

    match first.as_str() {
        "--version" | "-v" => {
            print_version();
            CliAction::Exit
        }
        "-h" | "--help" => {
            print_help();
            CliAction::Exit
        }
        "--keybinds" | "--keys" => {
            print_keybinds();
            CliAction::Exit
        }
        "--init" => {
            if let Err(e) = Config::generate_default(&Config::default_path()) {
                eprintln!("Error: {}", e);
            }
            CliAction::Exit
        }
        arg if !arg.starts_with('-') && !arg.trim().is_empty() => {
            CliAction::RunAppAtPath(arg.to_string())
        }
        arg => {
            eprintln!("Unknown argument: {}", arg);
            eprintln!("Try --help for available options");
            CliAction::Exit
        }
    }
}

fn print_version() {
    println!("filebeam {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"filebeam - terminal file browser with directory sizes and batch operations

USAGE:
  filebeam [PATH]

PATH:
  Directory to open (defaults to /)

OPTIONS:
      --init              Generate a default configuration file
      --keybinds          Display the default keybinds
  -h, --help              Print help information
  -v, --version           Display the installed version

ENVIRONMENT:
  FILEBEAM_CONFIG         Override the default config path
  FILEBEAM_LOG            Log filter, e.g. "debug" or "filebeam::core=trace"
"#
    );
}

const KEYBINDS_TEXT: &str = r##"
=========================
 Key Bindings
=========================
[keys]
  go_up                     ["k", "Up"]
  go_down                   ["j", "Down"]
  go_parent                 ["h", "Left", "Backspace"]
  go_into_dir               ["l", "Right", "Enter"]
  quit                      ["q"]          (Ctrl+c quits from anywhere)
  toggle_select             ["space"]
  clear_selection           ["u"]
  delete                    ["d"]          (asks for confirmation)
  delete_immediate          ["Shift+d"]
  open_with                 ["o"]
  move_file                 ["m"]
  copy                      ["c"]
  rename                    ["r"]

  Dialogs:
    confirm                 Enter, y
    cancel                  Esc, n
    edit                    Left, Right, Home, End, Backspace, Delete

  Syntax Reference:
    Modifiers: <c-x> (Ctrl), <m-x>/<a-x> (Alt/Meta), <s-x> (Shift)
    Standard:  ctrl+x, alt+x, shift+x, meta+x
    Special:   " ", "space", "back", "enter", "esc", "tab"
"##;

fn print_keybinds() {
    println!("{}", KEYBINDS_TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_runs_app() {
        assert_eq!(parse_args(&[]), CliAction::RunApp);
    }

    #[test]
    fn path_argument_is_passed_through() {
        assert_eq!(
            parse_args(&args(&["/tmp"])),
            CliAction::RunAppAtPath("/tmp".into())
        );
    }

    #[test]
    fn unknown_flag_and_extra_args_exit() {
        assert_eq!(parse_args(&args(&["--bogus"])), CliAction::Exit);
        assert_eq!(parse_args(&args(&["/a", "/b"])), CliAction::Exit);
    }
}
