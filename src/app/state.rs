//! Application state and main controller module for filebeam.
//!
//! This module defines the overall [AppState] struct, which owns all mutable navigation state
//! and is the single integration point between the terminal loop and the core:
//! - Configuration (loaded from config files) and the keymap built from it
//! - Navigation state of the current directory, the selection and the modal context
//! - Communication with the worker threads via crossbeam_channel
//! - The registry of outstanding directory size jobs
//! - Transient notices shown in the footer
//!
//! Workers never touch this state. Their results are drained in [AppState::tick] on the control
//! thread, which is the only writer.

use crate::app::actions::ActionContext;
use crate::app::keymap::{Action, Keymap};
use crate::app::{NavState, SelectionSet};
use crate::config::Config;
use crate::core::worker::{WorkerResponse, Workers};
use crate::core::{FsError, OpKind, OpReport, SizeJobs};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use std::ffi::OsString;
use std::path::Path;
use std::time::Instant;

/// Enumeration for each individual keypress result processed.
///
/// Tells the terminal loop whether to keep going, quit, or fully repaint after an external
/// program had the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypressResult {
    Continue,
    Consumed,
    Quit,
    OpenedEditor,
    Recovered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A transient message shown in the footer until it expires.
#[derive(Debug, Clone)]
pub struct Notice {
    text: String,
    kind: NoticeKind,
    expires: Instant,
}

impl Notice {
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn kind(&self) -> NoticeKind {
        self.kind
    }
}

/// Main struct which holds the central application state of filebeam.
pub struct AppState<'a> {
    pub(super) config: &'a Config,
    pub(super) keymap: Keymap,

    pub(super) nav: NavState,
    pub(super) selection: SelectionSet,
    pub(super) actions: ActionContext,

    pub(super) workers: Workers,
    pub(super) sizes: SizeJobs,
    pub(super) pending_ops: usize,

    pub(super) notice: Option<Notice>,
    pub(super) last_tick: Instant,
}

impl<'a> AppState<'a> {
    /// Starts at the filesystem root.
    pub fn new(config: &'a Config) -> Result<Self, FsError> {
        Self::from_dir(config, Path::new("/"))
    }

    /// Starts at `initial_path`.
    ///
    /// An unreadable directory still opens, showing the denial state. A missing one is an error.
    pub fn from_dir(config: &'a Config, initial_path: &Path) -> Result<Self, FsError> {
        let workers = Workers::spawn(config.general().size_workers());

        let mut app = Self {
            config,
            keymap: Keymap::from_keys(config.keys()),
            nav: NavState::new(initial_path.to_path_buf()),
            selection: SelectionSet::new(),
            actions: ActionContext::default(),
            workers,
            sizes: SizeJobs::new(),
            pending_ops: 0,
            notice: None,
            last_tick: Instant::now(),
        };

        let show_hidden = config.general().show_hidden();
        match app.nav.load(initial_path.to_path_buf(), show_hidden, None) {
            Ok(()) | Err(FsError::AccessDenied(_)) => {}
            Err(e) => return Err(e),
        }
        app.request_sizes(false);
        Ok(app)
    }

    // Getters / accessors

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    #[inline]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    #[inline]
    pub fn actions(&self) -> &ActionContext {
        &self.actions
    }

    #[inline]
    pub fn workers(&self) -> &Workers {
        &self.workers
    }

    #[inline]
    pub fn sizes(&self) -> &SizeJobs {
        &self.sizes
    }

    #[inline]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// File operations dispatched but not yet reported back.
    #[inline]
    pub fn pending_ops(&self) -> usize {
        self.pending_ops
    }

    /// The heart of the app: updates state and handles worker messages.
    ///
    /// Used by the main event loop. Returns true if the screen needs redrawing: a notice
    /// expired, a worker result was applied, or the periodic tick fired while directory sizes
    /// are still being calculated.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        if self
            .notice
            .as_ref()
            .is_some_and(|n| Instant::now() >= n.expires)
        {
            self.notice = None;
            changed = true;
        }

        while let Ok(response) = self.workers.response_rx().try_recv() {
            changed |= self.apply_response(response);
        }

        if self.sizes.outstanding() > 0
            && self.last_tick.elapsed() >= self.config.display().tick_interval()
        {
            self.last_tick = Instant::now();
            changed = true;
        }

        changed
    }

    /// Applies one worker result. Returns true if anything visible changed.
    ///
    /// A size result is applied only if its job is still the registered one for that path;
    /// superseded results are dropped without a redraw.
    pub fn apply_response(&mut self, response: WorkerResponse) -> bool {
        match response {
            WorkerResponse::SizeComputed { path, job_id, size } => {
                if !self.sizes.complete(&path, job_id) {
                    tracing::trace!(path = %path.display(), job_id, "dropping stale size result");
                    return false;
                }
                self.nav.patch_size(&path, size)
            }
            WorkerResponse::OperationComplete(report) => {
                self.pending_ops = self.pending_ops.saturating_sub(1);

                let kind = if report.failed().is_empty() {
                    NoticeKind::Info
                } else {
                    NoticeKind::Error
                };
                self.push_notice(report.summary(), kind);

                let focus = self.focus_after(&report);
                self.reload_current(focus, true);
                true
            }
        }
    }

    /// Central key handler.
    ///
    /// Ctrl+C quits from any state. While a modal is open it owns every other key; otherwise
    /// the key goes through the keymap.
    pub fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeypressResult::Quit;
        }

        if self.actions.is_modal() {
            return self.handle_modal_key(key);
        }

        if let Some(action) = self.keymap.lookup(key) {
            match action {
                Action::System(sys_act) => return self.handle_sys_action(sys_act),
                Action::Nav(nav_act) => return self.handle_nav_action(nav_act),
                Action::File(file_act) => return self.handle_file_action(file_act),
            }
        }

        KeypressResult::Continue
    }

    /// Name to focus once the listing is re-read after `report`.
    ///
    /// The first resulting path that lives in the current directory, if any. Deletes leave the
    /// focus on the same row instead.
    fn focus_after(&self, report: &OpReport) -> Option<OsString> {
        if report.kind() == OpKind::Delete {
            return None;
        }
        report
            .succeeded()
            .iter()
            .find(|p| p.parent() == Some(self.nav.current_dir()))
            .and_then(|p| p.file_name())
            .map(|n| n.to_os_string())
    }

    pub(super) fn push_notice(&mut self, text: String, kind: NoticeKind) {
        if kind == NoticeKind::Error {
            tracing::warn!(message = %text, "notice");
        }
        self.notice = Some(Notice {
            text,
            kind,
            expires: Instant::now() + self.config.display().message_duration(),
        });
    }
}
