//! Input configuration options for filebeam
//!
//! Defines the `[keys]` table (lists of key strings per action) and the `[opener]` table.

use serde::Deserialize;

/// Input configuration options of all actions
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Keys {
    go_up: Vec<String>,
    go_down: Vec<String>,
    go_parent: Vec<String>,
    go_into_dir: Vec<String>,
    quit: Vec<String>,
    toggle_select: Vec<String>,
    clear_selection: Vec<String>,
    delete: Vec<String>,
    delete_immediate: Vec<String>,
    open_with: Vec<String>,
    move_file: Vec<String>,
    copy: Vec<String>,
    rename: Vec<String>,
}

/// Program offered in the open-with prompt.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Opener {
    cmd: String,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    go_up,
    go_down,
    go_parent,
    go_into_dir,
    quit,
    toggle_select,
    clear_selection,
    delete,
    delete_immediate,
    open_with,
    move_file,
    copy,
    rename,
);

/// Default input configuration options
impl Default for Keys {
    fn default() -> Self {
        Keys {
            go_up: vec!["k".into(), "Up".into()],
            go_down: vec!["j".into(), "Down".into()],
            go_parent: vec!["h".into(), "Left".into(), "Backspace".into()],
            go_into_dir: vec!["l".into(), "Right".into(), "Enter".into()],

            quit: vec!["q".into()],

            toggle_select: vec!["space".into()],
            clear_selection: vec!["u".into()],

            delete: vec!["d".into()],
            delete_immediate: vec!["Shift+d".into()],
            open_with: vec!["o".into()],
            move_file: vec!["m".into()],
            copy: vec!["c".into()],
            rename: vec!["r".into()],
        }
    }
}

impl Opener {
    /// The configured program, empty when none is set.
    #[inline]
    pub fn cmd(&self) -> &str {
        self.cmd.trim()
    }
}
