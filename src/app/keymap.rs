//! Key mapping and action dispatch system for filebeam
//!
//! Maps keys to actions, parses key strings from the config, and defines the enum variants for
//! all navigation, file and system actions.

use crate::config::Keys;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Represents any action in the app: navigation, file, or system.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    Nav(NavAction),
    File(FileAction),
    System(SystemAction),
}

/// Navigation actions (move, into_parent, selection)
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NavAction {
    GoParent,
    GoIntoDir,
    GoUp,
    GoDown,
    ToggleSelect,
    ClearSelection,
}

/// File actions (delete, copy, move, etc.)
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FileAction {
    Delete,
    DeleteImmediate,
    OpenWith,
    MoveFile,
    Copy,
    Rename,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SystemAction {
    Quit,
}

/// Key + modifiers as used in keybind/keymap
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

/// Stores the mapping from Key to action, which is built from the config
pub struct Keymap {
    map: HashMap<Key, Action>,
}

impl Keymap {
    /// Builds the keymap from the `[keys]` config table
    #[rustfmt::skip]
    pub fn from_keys(keys: &Keys) -> Self {
        let mut map = HashMap::new();

        macro_rules! bind {
            ($keys:expr, $action:expr) => {
                bind($keys, $action, &mut map);
            };
        }

        use NavAction as N;
        use FileAction as F;
        use SystemAction as S;

        // NavActions
        bind!(keys.go_parent(),         Action::Nav(N::GoParent));
        bind!(keys.go_into_dir(),       Action::Nav(N::GoIntoDir));
        bind!(keys.go_up(),             Action::Nav(N::GoUp));
        bind!(keys.go_down(),           Action::Nav(N::GoDown));
        bind!(keys.toggle_select(),     Action::Nav(N::ToggleSelect));
        bind!(keys.clear_selection(),   Action::Nav(N::ClearSelection));

        // FileActions
        bind!(keys.delete(),            Action::File(F::Delete));
        bind!(keys.delete_immediate(),  Action::File(F::DeleteImmediate));
        bind!(keys.open_with(),         Action::File(F::OpenWith));
        bind!(keys.move_file(),         Action::File(F::MoveFile));
        bind!(keys.copy(),              Action::File(F::Copy));
        bind!(keys.rename(),            Action::File(F::Rename));

        // SystemActions
        bind!(keys.quit(),              Action::System(S::Quit));

        Keymap { map }
    }

    /// Looks up the action for a given key event
    ///
    /// Terminals disagree on whether an uppercase letter carries the SHIFT modifier, so both
    /// spellings are tried for character keys.
    pub fn lookup(&self, key: KeyEvent) -> Option<Action> {
        let k = Key {
            code: key.code,
            modifiers: key.modifiers,
        };

        if let Some(action) = self.map.get(&k).copied() {
            return Some(action);
        }

        let KeyCode::Char(c) = key.code else {
            return None;
        };

        let alternate = if key.modifiers.contains(KeyModifiers::SHIFT) {
            key.modifiers - KeyModifiers::SHIFT
        } else if c.is_uppercase() {
            key.modifiers | KeyModifiers::SHIFT
        } else {
            return None;
        };

        self.map
            .get(&Key {
                code: key.code,
                modifiers: alternate,
            })
            .copied()
    }
}

pub(crate) fn parse_key(s: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut code: Option<KeyCode> = None;

    // a lone space or dash is the key itself, not a separator
    if s == " " {
        return Some(Key {
            code: KeyCode::Char(' '),
            modifiers,
        });
    }

    let is_bracketed = s.starts_with('<') && s.ends_with('>');
    let mut input = s.trim_start_matches('<').trim_end_matches('>').to_string();

    if is_bracketed && input.contains('-') {
        let parts: Vec<&str> = input.split('-').collect();

        for &prefix in parts.iter().take(parts.len().saturating_sub(1)) {
            match prefix.to_lowercase().as_str() {
                "c" | "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "a" | "m" | "alt" => modifiers |= KeyModifiers::ALT,
                "s" | "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        input = parts.last()?.to_string();
    }

    let normalized = input.replace('-', "+");
    for part in normalized.split('+') {
        let p_low = part.to_lowercase();
        match p_low.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,

            "up" => code = Some(KeyCode::Up),
            "down" => code = Some(KeyCode::Down),
            "left" => code = Some(KeyCode::Left),
            "right" => code = Some(KeyCode::Right),
            "enter" => code = Some(KeyCode::Enter),
            "esc" => code = Some(KeyCode::Esc),
            "backspace" | "back" => code = Some(KeyCode::Backspace),
            "delete" | "del" => code = Some(KeyCode::Delete),
            "tab" => code = Some(KeyCode::Tab),
            "space" | "spc" => code = Some(KeyCode::Char(' ')),

            _ => {
                if part.chars().count() == 1 {
                    let mut c = part.chars().next()?;
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        c = c.to_ascii_uppercase();
                    }
                    code = Some(KeyCode::Char(c));
                } else if p_low.starts_with('f')
                    && p_low.len() > 1
                    && p_low[1..].chars().all(|c| c.is_ascii_digit())
                {
                    let n = p_low[1..].parse().ok()?;
                    code = Some(KeyCode::F(n));
                } else if part.is_empty() {
                    continue;
                } else {
                    return None;
                }
            }
        }
    }

    Some(Key {
        code: code?,
        modifiers,
    })
}

fn bind(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, action);
            }
            None => tracing::warn!(key = %k, ?action, "ignoring unparsable key binding"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Key {
        Key { code, modifiers }
    }

    #[test]
    fn parses_all_spellings() {
        assert_eq!(parse_key("j"), Some(key(KeyCode::Char('j'), KeyModifiers::NONE)));
        assert_eq!(parse_key("Up"), Some(key(KeyCode::Up, KeyModifiers::NONE)));
        assert_eq!(parse_key("space"), Some(key(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(parse_key(" "), Some(key(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(
            parse_key("Ctrl+n"),
            Some(key(KeyCode::Char('n'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            parse_key("Shift+d"),
            Some(key(KeyCode::Char('D'), KeyModifiers::SHIFT))
        );
        assert_eq!(
            parse_key("<c-p>"),
            Some(key(KeyCode::Char('p'), KeyModifiers::CONTROL))
        );
        assert_eq!(parse_key("f5"), Some(key(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(parse_key("<x-p>"), None);
        assert_eq!(parse_key("nonsense"), None);
    }

    #[test]
    fn default_keys_resolve() {
        let keymap = Keymap::from_keys(&Keys::default());

        let down = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(keymap.lookup(down), Some(Action::Nav(NavAction::GoDown)));

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(keymap.lookup(enter), Some(Action::Nav(NavAction::GoIntoDir)));

        let shift_d = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(
            keymap.lookup(shift_d),
            Some(Action::File(FileAction::DeleteImmediate))
        );

        // same key without the modifier flag
        let bare_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::NONE);
        assert_eq!(
            keymap.lookup(bare_upper),
            Some(Action::File(FileAction::DeleteImmediate))
        );

        let unbound = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(keymap.lookup(unbound), None);
    }
}
