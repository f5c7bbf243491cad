//! Options a host passes to a [`HistorySession`](crate::session::HistorySession).

use serde::Deserialize;

use crate::diff::DEFAULT_WINDOW;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HistoryConfig {
    /// Retention cap applied by `enforce_retention`.
    #[serde(default = "default_max_revisions")]
    pub max_revisions: usize,
    /// Separate cap on autosaves, applied before `max_revisions`. `None`
    /// leaves autosaves to the general cap.
    #[serde(default)]
    pub max_autosaves: Option<usize>,
    /// The host's autosave cadence. Not used by this crate.
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_secs: u64,
    /// When false, autosaves only appear under the autosave filter.
    #[serde(default = "default_true")]
    pub show_autosaves: bool,
    #[serde(default = "default_true")]
    pub enable_restore: bool,
    #[serde(default = "default_true")]
    pub enable_preview: bool,
    #[serde(default = "default_true")]
    pub enable_compare: bool,
    /// Lookahead window of the word diff.
    #[serde(default = "default_diff_window")]
    pub diff_window: usize,
    /// Publish revisions survive retention regardless of the cap. Scheduled
    /// revisions are not covered.
    #[serde(default = "default_true")]
    pub keep_all_publishes: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_revisions: default_max_revisions(),
            max_autosaves: None,
            autosave_interval_secs: default_autosave_interval(),
            show_autosaves: true,
            enable_restore: true,
            enable_preview: true,
            enable_compare: true,
            diff_window: default_diff_window(),
            keep_all_publishes: true,
        }
    }
}

fn default_max_revisions() -> usize {
    25
}
fn default_autosave_interval() -> u64 {
    60
}
fn default_true() -> bool {
    true
}
fn default_diff_window() -> usize {
    DEFAULT_WINDOW
}
