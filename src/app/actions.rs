//! Action context and modal input logic for filebeam.
//!
//! Contains the [ActionContext] struct, tracking which modal (if any) owns key input and the
//! text buffer of an open prompt.

use std::path::PathBuf;

/// Describes the current mode for key handling.
///
/// While anything other than `Browsing` is active, navigation keys are suppressed and only the
/// modal's own keys are processed.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionMode {
    Browsing,
    ConfirmDelete {
        targets: Vec<PathBuf>,
        use_trash: bool,
    },
    Prompt {
        kind: PromptKind,
        prompt: String,
        /// Paths the prompt's operation acts on, captured when the prompt opened.
        targets: Vec<PathBuf>,
    },
}

/// Enumerates the text prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    OpenWith,
    Move,
    Copy,
    Rename,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::OpenWith => "Open with",
            PromptKind::Move => "Move to",
            PromptKind::Copy => "Copy to",
            PromptKind::Rename => "Rename to",
        }
    }
}

/// Tracks the current modal and the prompt input buffer with its cursor.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug)]
pub struct ActionContext {
    mode: ActionMode,
    input_buffer: String,
    input_cursor_pos: usize,
}

impl ActionContext {
    // Getters / accessors

    pub fn mode(&self) -> &ActionMode {
        &self.mode
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn input_cursor_pos(&self) -> usize {
        self.input_cursor_pos
    }

    // Mode functions

    pub fn is_modal(&self) -> bool {
        !matches!(self.mode, ActionMode::Browsing)
    }

    pub fn enter_mode(&mut self, mode: ActionMode, initial_value: String) {
        self.mode = mode;
        self.input_buffer = initial_value;
        self.input_cursor_pos = self.input_buffer.len();
    }

    /// Leaves the modal and hands back the mode that was active together with the typed text.
    pub fn exit_mode(&mut self) -> (ActionMode, String) {
        let mode = std::mem::replace(&mut self.mode, ActionMode::Browsing);
        let text = std::mem::take(&mut self.input_buffer);
        self.input_cursor_pos = 0;
        (mode, text)
    }

    // Cursor actions

    /// Moves the input cursor one character to the left, if possible.
    pub fn action_move_cursor_left(&mut self) {
        if let Some((prev, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_cursor_pos = prev;
        }
    }

    /// Moves the input cursor one character to the right, if possible.
    pub fn action_move_cursor_right(&mut self) {
        if let Some(ch) = self.input_buffer[self.input_cursor_pos..].chars().next() {
            self.input_cursor_pos += ch.len_utf8();
        }
    }

    /// Inserts a character at the current cursor position in the input buffer.
    pub fn action_insert_at_cursor(&mut self, ch: char) {
        self.input_buffer.insert(self.input_cursor_pos, ch);
        self.input_cursor_pos += ch.len_utf8();
    }

    /// Deletes the character before the cursor and moves the cursor back.
    pub fn action_backspace_at_cursor(&mut self) {
        if self.input_cursor_pos > 0
            && let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
                .char_indices()
                .next_back()
        {
            self.input_buffer.remove(previous);
            self.input_cursor_pos = previous;
        }
    }

    /// Deletes the character at the current cursor position in the input buffer.
    pub fn action_delete_at_cursor(&mut self) {
        if self.input_cursor_pos < self.input_buffer.len() {
            self.input_buffer.remove(self.input_cursor_pos);
        }
    }

    pub fn action_cursor_home(&mut self) {
        self.input_cursor_pos = 0;
    }

    pub fn action_cursor_end(&mut self) {
        self.input_cursor_pos = self.input_buffer.len();
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            mode: ActionMode::Browsing,
            input_buffer: String::new(),
            input_cursor_pos: 0,
        }
    }
}
