//! Debounced autosave state for one project.
//!
//! `idle -> dirty -> saving -> idle | error`. Edits arm a debounce timer;
//! when it fires the host runs a flush bracketed by [`AutosaveState::begin_flush`]
//! and [`AutosaveState::complete_flush`]. Edits made while a save is in
//! flight keep the project dirty and queue an immediate follow-up save.

use super::error::PersistenceResult;
use super::format::now_timestamp;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Quiet period after the last edit before a save starts.
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 900;

/// Backups kept per file: `.backup`, `.backup.1`, `.backup.2`.
pub const DEFAULT_MAX_BACKUPS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct AutosaveConfig {
    pub debounce: Duration,
    /// Rotate backups before overwriting the graph file.
    pub backups: bool,
    pub max_backups: usize,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_AUTOSAVE_DEBOUNCE_MS),
            backups: true,
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveStatus {
    #[default]
    Idle,
    Dirty,
    Saving,
    Error,
}

/// What the save indicator shows for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveUiState {
    pub status: SaveStatus,
    pub dirty: bool,
    pub last_error: Option<String>,
    /// RFC 3339 time of the last successful save.
    pub last_saved_at: Option<String>,
}

impl SaveUiState {
    /// One-line indicator text.
    pub fn label(&self) -> String {
        match self.status {
            SaveStatus::Idle if self.last_saved_at.is_some() => "saved".to_string(),
            SaveStatus::Idle => String::new(),
            SaveStatus::Dirty => "unsaved changes".to_string(),
            SaveStatus::Saving => "saving...".to_string(),
            SaveStatus::Error => format!("save failed: {}", self.last_error.as_deref().unwrap_or("unknown error")),
        }
    }
}

/// What made a project dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtySource {
    Graph,
    View,
    Viewport,
    Ui,
}

/// A one-shot deadline. Re-arming replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    due: Instant,
}

impl ScheduledTask {
    pub fn after(now: Instant, delay: Duration) -> Self {
        Self { due: now + delay }
    }

    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}

/// Proof that a flush was started; hand it back to `complete_flush`.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct FlushTicket {
    seq: u64,
}

impl FlushTicket {
    /// Edit sequence number the flush is saving.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Per-project autosave state machine.
#[derive(Debug, Clone)]
pub struct AutosaveState {
    config: AutosaveConfig,
    status: SaveStatus,
    dirty: bool,
    /// Bumped on every edit.
    seq: u64,
    timer: Option<ScheduledTask>,
    last_error: Option<String>,
    last_saved_at: Option<String>,
}

impl Default for AutosaveState {
    fn default() -> Self {
        Self::new(AutosaveConfig::default())
    }
}

impl AutosaveState {
    pub fn new(config: AutosaveConfig) -> Self {
        Self {
            config,
            status: SaveStatus::Idle,
            dirty: false,
            seq: 0,
            timer: None,
            last_error: None,
            last_saved_at: None,
        }
    }

    pub fn config(&self) -> &AutosaveConfig {
        &self.config
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn timer(&self) -> Option<ScheduledTask> {
        self.timer
    }

    /// Record an edit and (re)arm the debounce timer.
    pub fn mark_dirty(&mut self, source: DirtySource, now: Instant) {
        self.seq += 1;
        self.dirty = true;
        if self.status != SaveStatus::Saving {
            self.status = SaveStatus::Dirty;
        }
        self.timer = Some(ScheduledTask::after(now, self.config.debounce));
        log::debug!("Dirty ({:?}), seq {}, save in {:?}", source, self.seq, self.config.debounce);
    }

    /// Whether the debounce timer has fired and no save is running.
    pub fn is_flush_due(&self, now: Instant) -> bool {
        self.status != SaveStatus::Saving && self.timer.is_some_and(|t| t.is_due(now))
    }

    /// Start a save. Returns `None` while another save is in flight; that
    /// save reschedules itself if edits arrive meanwhile.
    pub fn begin_flush(&mut self) -> Option<FlushTicket> {
        if self.status == SaveStatus::Saving {
            log::debug!("Save already in flight, coalescing");
            return None;
        }
        self.timer = None;
        self.status = SaveStatus::Saving;
        Some(FlushTicket { seq: self.seq })
    }

    /// Finish the save started with `ticket`.
    pub fn complete_flush(&mut self, ticket: FlushTicket, result: &PersistenceResult<()>, now: Instant) {
        match result {
            Ok(()) => {
                self.last_error = None;
                self.last_saved_at = Some(now_timestamp());
                if self.seq == ticket.seq {
                    self.dirty = false;
                    self.status = SaveStatus::Idle;
                } else {
                    // Edited during the save: catch up right away.
                    self.dirty = true;
                    self.status = SaveStatus::Dirty;
                    self.timer = Some(ScheduledTask::after(now, Duration::ZERO));
                    log::debug!("Edits during save (seq {} -> {}), saving again", ticket.seq, self.seq);
                }
            }
            Err(e) => {
                self.dirty = true;
                self.status = SaveStatus::Error;
                self.last_error = Some(e.user_message());
                log::error!("Save failed: {}", e);
            }
        }
    }

    pub fn ui_state(&self) -> SaveUiState {
        SaveUiState {
            status: self.status,
            dirty: self.dirty,
            last_error: self.last_error.clone(),
            last_saved_at: self.last_saved_at.clone(),
        }
    }
}
