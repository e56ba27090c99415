//! Application controller for filebeam.
//!
//! - [state]: [AppState], the single owner of all mutable navigation state.
//! - [nav]: the current directory listing and focus.
//! - [selection]: paths marked for batch operations.
//! - [actions]: the modal context (delete confirmation and text prompts).
//! - [keymap]: key parsing and the key to action table.
//! - [handlers]: what each action does.

pub mod actions;
pub mod handlers;
pub mod keymap;
pub mod nav;
pub mod selection;
pub mod state;

pub use actions::{ActionContext, ActionMode, PromptKind};
pub use keymap::{Action, FileAction, Keymap, NavAction, SystemAction};
pub use nav::NavState;
pub use selection::SelectionSet;
pub use state::{AppState, KeypressResult, Notice, NoticeKind};
