//! Input action handler methods for filebeam.
//!
//! This module implements [AppState] methods that process key events, navigation and file
//! actions, and the modal dialogs (delete confirmation and the text prompts).

use crate::app::actions::{ActionMode, PromptKind};
use crate::app::keymap::{FileAction, NavAction, SystemAction};
use crate::app::state::{AppState, KeypressResult, NoticeKind};
use crate::core::worker::FileOperation;
use crate::core::{EntryKind, FsError, format_item_count};
use crate::utils::{open_with, program_exists, resolve_input_path};

use crossterm::event::{KeyCode::*, KeyEvent, KeyModifiers};

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// AppState input and action handlers
impl<'a> AppState<'a> {
    // Directory loading

    /// Lists `path` and makes it the current directory, focusing `focus` if it is listed.
    ///
    /// Size jobs for directories that are no longer listed are cancelled. Returns false if the
    /// directory could not be entered; the previous listing then stays as it was.
    pub(crate) fn change_dir(&mut self, path: PathBuf, focus: Option<OsString>) -> bool {
        let show_hidden = self.config.general().show_hidden();
        match self.nav.load(path, show_hidden, focus.as_deref()) {
            Ok(()) | Err(FsError::AccessDenied(_)) => {
                self.request_sizes(false);
                true
            }
            Err(e) => {
                self.push_notice(e.to_string(), NoticeKind::Error);
                false
            }
        }
    }

    /// Re-reads the current directory.
    ///
    /// After a mutation every size job is restarted, since any directory may have changed.
    /// Otherwise jobs still running for listed directories are joined. If the directory itself
    /// is gone, the nearest existing ancestor is shown instead.
    pub(crate) fn reload_current(&mut self, focus: Option<OsString>, after_mutation: bool) {
        let path = self.nav.current_dir().to_path_buf();
        let show_hidden = self.config.general().show_hidden();

        match self.nav.load(path.clone(), show_hidden, focus.as_deref()) {
            Ok(()) | Err(FsError::AccessDenied(_)) => self.request_sizes(after_mutation),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "current directory vanished");
                if let Some(ancestor) = path.ancestors().skip(1).find(|p| p.is_dir()) {
                    self.change_dir(ancestor.to_path_buf(), None);
                }
            }
        }
    }

    /// Starts size jobs for every directory in the listing and cancels jobs for paths that are
    /// no longer listed. With `restart`, running jobs are cancelled and started over.
    pub(crate) fn request_sizes(&mut self, restart: bool) {
        if restart {
            self.sizes.cancel_all();
        }

        let wanted: Vec<PathBuf> = self
            .nav
            .directory_paths()
            .map(Path::to_path_buf)
            .collect();
        let keep: HashSet<&Path> = wanted.iter().map(PathBuf::as_path).collect();
        self.sizes.retain_paths(&keep);

        for path in &wanted {
            self.sizes.start(path, &self.workers);
        }
    }

    // AppState core handlers

    /// Handles navigation actions (up, down, into dir, selection).
    pub(super) fn handle_nav_action(&mut self, action: NavAction) -> KeypressResult {
        match action {
            NavAction::GoUp => {
                self.nav.move_up();
            }
            NavAction::GoDown => {
                self.nav.move_down();
            }
            NavAction::GoParent => self.handle_go_parent(),
            NavAction::GoIntoDir => self.handle_go_into_dir(),
            NavAction::ToggleSelect => {
                if let Some(path) = self.nav.focused_target().map(Path::to_path_buf) {
                    self.selection.toggle(&path);
                }
            }
            NavAction::ClearSelection => self.selection.clear(),
        }
        KeypressResult::Continue
    }

    /// Handles file actions (delete, open with, move, copy, rename).
    pub(super) fn handle_file_action(&mut self, action: FileAction) -> KeypressResult {
        match action {
            FileAction::Delete => self.prompt_delete(),
            FileAction::DeleteImmediate => self.delete_immediate(),
            FileAction::OpenWith => self.prompt_open_with(),
            FileAction::MoveFile => self.prompt_transfer(PromptKind::Move),
            FileAction::Copy => self.prompt_transfer(PromptKind::Copy),
            FileAction::Rename => self.prompt_rename(),
        }
        KeypressResult::Continue
    }

    pub(super) fn handle_sys_action(&mut self, action: SystemAction) -> KeypressResult {
        match action {
            SystemAction::Quit => KeypressResult::Quit,
        }
    }

    /// Routes a key to the open modal. Every key is consumed while a modal is open.
    pub(super) fn handle_modal_key(&mut self, key: KeyEvent) -> KeypressResult {
        if matches!(self.actions.mode(), ActionMode::ConfirmDelete { .. }) {
            self.handle_confirm_key(key);
            return KeypressResult::Consumed;
        }

        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            Enter => return self.submit_prompt(),
            Esc => {
                self.actions.exit_mode();
            }
            Left => self.actions.action_move_cursor_left(),
            Right => self.actions.action_move_cursor_right(),
            Home => self.actions.action_cursor_home(),
            End => self.actions.action_cursor_end(),
            Backspace => self.actions.action_backspace_at_cursor(),
            Delete => self.actions.action_delete_at_cursor(),
            Char(c) if plain => self.actions.action_insert_at_cursor(c),
            _ => {}
        }
        KeypressResult::Consumed
    }

    // Navigation

    /// Goes to the parent directory and focuses the directory that was left.
    fn handle_go_parent(&mut self) {
        let current = self.nav.current_dir();
        let Some(parent) = current.parent() else {
            return;
        };

        let parent_path = parent.to_path_buf();
        let exited_name = current.file_name().map(|n| n.to_os_string());
        self.change_dir(parent_path, exited_name);
    }

    /// Enters the focused directory, `..` included, with focus on the first row. Files are left
    /// alone.
    fn handle_go_into_dir(&mut self) {
        let Some(entry) = self.nav.focused_entry() else {
            return;
        };

        match entry.kind() {
            EntryKind::Parent | EntryKind::Directory => {
                let path = entry.path().to_path_buf();
                self.change_dir(path, None);
            }
            EntryKind::File => {}
        }
    }

    // Prompt functions

    /// Asks for confirmation before deleting the active targets.
    fn prompt_delete(&mut self) {
        let targets = self.selection.active_targets(self.nav.focused_target());
        if targets.is_empty() {
            return;
        }
        let use_trash = self.config.general().move_to_trash();
        self.actions.enter_mode(
            ActionMode::ConfirmDelete { targets, use_trash },
            String::new(),
        );
    }

    /// Deletes the active targets without asking.
    fn delete_immediate(&mut self) {
        let targets = self.selection.active_targets(self.nav.focused_target());
        if targets.is_empty() {
            return;
        }
        let use_trash = self.config.general().move_to_trash();
        self.dispatch(FileOperation::Delete { targets, use_trash }, true);
    }

    /// Opens the move or copy prompt, prefilled with the current directory.
    fn prompt_transfer(&mut self, kind: PromptKind) {
        let targets = self.selection.active_targets(self.nav.focused_target());
        if targets.is_empty() {
            return;
        }
        let prompt = format!("{} {}:", kind.title(), format_item_count(targets.len()));
        let initial = self.nav.current_dir().to_string_lossy().into_owned();
        self.actions.enter_mode(
            ActionMode::Prompt {
                kind,
                prompt,
                targets,
            },
            initial,
        );
    }

    /// Opens the rename prompt for the focused entry. The selection is ignored.
    fn prompt_rename(&mut self) {
        let Some(entry) = self.nav.focused_entry().filter(|e| !e.is_parent()) else {
            return;
        };
        let name = entry.name_str().into_owned();
        let target = entry.path().to_path_buf();
        self.actions.enter_mode(
            ActionMode::Prompt {
                kind: PromptKind::Rename,
                prompt: format!("{}:", PromptKind::Rename.title()),
                targets: vec![target],
            },
            name,
        );
    }

    /// Opens the open-with prompt for the focused entry.
    fn prompt_open_with(&mut self) {
        let Some(target) = self.nav.focused_target().map(Path::to_path_buf) else {
            return;
        };
        let initial = self.config.opener().cmd().to_string();
        self.actions.enter_mode(
            ActionMode::Prompt {
                kind: PromptKind::OpenWith,
                prompt: format!("{}:", PromptKind::OpenWith.title()),
                targets: vec![target],
            },
            initial,
        );
    }

    // Modal resolution

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            Enter | Char('y') | Char('Y') => {
                if let (ActionMode::ConfirmDelete { targets, use_trash }, _) =
                    self.actions.exit_mode()
                {
                    self.dispatch(FileOperation::Delete { targets, use_trash }, true);
                }
            }
            Esc | Char('n') | Char('N') => {
                self.actions.exit_mode();
            }
            _ => {}
        }
    }

    /// Closes the prompt and runs its operation with the typed text.
    fn submit_prompt(&mut self) -> KeypressResult {
        let (mode, text) = self.actions.exit_mode();
        let ActionMode::Prompt { kind, targets, .. } = mode else {
            return KeypressResult::Consumed;
        };

        match kind {
            PromptKind::Move | PromptKind::Copy => {
                self.submit_transfer(kind, targets, &text);
                KeypressResult::Consumed
            }
            PromptKind::Rename => {
                if let Some(target) = targets.into_iter().next() {
                    self.dispatch(
                        FileOperation::Rename {
                            target,
                            new_name: text,
                        },
                        false,
                    );
                }
                KeypressResult::Consumed
            }
            PromptKind::OpenWith => match targets.first() {
                Some(target) => {
                    let target = target.clone();
                    self.run_open_with(text.trim(), &target)
                }
                None => KeypressResult::Consumed,
            },
        }
    }

    fn submit_transfer(&mut self, kind: PromptKind, targets: Vec<PathBuf>, text: &str) {
        let input = text.trim();
        if input.is_empty() {
            self.push_notice("No destination entered".to_string(), NoticeKind::Error);
            return;
        }

        let destination = resolve_input_path(input, self.nav.current_dir());
        if !destination.is_dir() {
            let msg = format!("Not a directory: {}", destination.display());
            self.push_notice(msg, NoticeKind::Error);
            return;
        }

        let op = if kind == PromptKind::Move {
            FileOperation::Move {
                targets,
                destination,
            }
        } else {
            FileOperation::Copy {
                targets,
                destination,
            }
        };
        self.dispatch(op, true);
    }

    /// Runs `program target` with the terminal released, then re-reads the listing.
    fn run_open_with(&mut self, program: &str, target: &Path) -> KeypressResult {
        if program.is_empty() {
            self.push_notice("No program entered".to_string(), NoticeKind::Error);
            return KeypressResult::Consumed;
        }
        if !program_exists(program) {
            let msg = format!("Program '{}' not found", program);
            self.push_notice(msg, NoticeKind::Error);
            return KeypressResult::Consumed;
        }

        tracing::info!(program, path = %target.display(), "opening with external program");
        let result = open_with(program, target);
        self.reload_current(None, true);

        match result {
            Ok(()) => KeypressResult::OpenedEditor,
            Err(e) => {
                self.push_notice(format!("{}: {}", program, e), NoticeKind::Error);
                KeypressResult::Recovered
            }
        }
    }

    /// Hands a file operation to the file operation worker.
    ///
    /// With `consumes_selection` the selection is cleared once the operation is queued.
    fn dispatch(&mut self, op: FileOperation, consumes_selection: bool) {
        if consumes_selection {
            self.selection.clear();
        }

        tracing::debug!(?op, "dispatching file operation");
        if self.workers.submit_op(op) {
            self.pending_ops += 1;
        } else {
            self.push_notice(
                "File operation worker is not running".to_string(),
                NoticeKind::Error,
            );
        }
    }
}
