//! Selection and comparison over a revision store.
//!
//! A [`HistorySession`] owns the store for one editing session and tracks
//! which revision is previewed and, optionally, which one it is compared
//! against. Every command runs to completion and returns the outbound
//! [`HistoryEvent`]s it produced, in order, for the host to act on.
//!
//! # States
//!
//! ```text
//!            select               set_compare
//!   Idle ────────────▶ Selected ────────────▶ Comparing
//!     ▲                  ▲   ◀──────────────     │
//!     │                  │   clear_compare /     │
//!     │                  │   set_compare(same)   │
//!     └──── delete(selected) / select(absent) ───┘
//! ```
//!
//! The compare target is never the selected revision: selecting the target
//! drops the comparison, and `set_compare` refuses the selected id.
//!
//! Commands naming an id that is not in the store are silent no-ops, with
//! one exception: [`select`](HistorySession::select) of an unknown id moves
//! to `Idle`, the "no selection" display state.

use crate::config::HistoryConfig;
use crate::diff::{compare_revisions, RevisionComparison};
use crate::error::RevisionError;
use crate::filter::{FilterView, RevisionFilter};
use crate::models::Revision;
use crate::retention::{plan_autosave_retention, plan_retention};
use crate::store::memory::InMemoryStore;
use crate::store::RevisionStore;

/// Signals emitted to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    /// The previewed revision changed; `None` means nothing is selected.
    SelectionChanged(Option<Revision>),
    /// A new diff result, or `None` when the diff view should be cleared.
    ComparisonChanged(Option<RevisionComparison>),
    /// The host should apply this revision's content to the working document.
    Restored(Revision),
    /// A revision was permanently removed from the store.
    Deleted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Selected,
    Comparing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    Idle,
    Selected { selected: String },
    Comparing { selected: String, target: String },
}

impl Selection {
    fn selected(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Selected { selected } | Self::Comparing { selected, .. } => Some(selected),
        }
    }

    fn target(&self) -> Option<&str> {
        match self {
            Self::Comparing { target, .. } => Some(target),
            _ => None,
        }
    }
}

pub struct HistorySession<S: RevisionStore = InMemoryStore> {
    store: S,
    config: HistoryConfig,
    current: Option<String>,
    selection: Selection,
    comparison: Option<RevisionComparison>,
}

impl<S: RevisionStore> HistorySession<S> {
    pub fn new(store: S, config: HistoryConfig) -> Self {
        Self {
            store,
            config,
            current: None,
            selection: Selection::Idle,
            comparison: None,
        }
    }

    /// Mark the live, not-yet-superseded revision.
    pub fn with_current(mut self, id: impl Into<String>) -> Self {
        self.current = Some(id.into());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        match self.selection {
            Selection::Idle => SessionState::Idle,
            Selection::Selected { .. } => SessionState::Selected,
            Selection::Comparing { .. } => SessionState::Comparing,
        }
    }

    pub fn selected(&self) -> Option<&Revision> {
        self.selection.selected().and_then(|id| self.store.get(id))
    }

    pub fn compare_target(&self) -> Option<&Revision> {
        self.selection.target().and_then(|id| self.store.get(id))
    }

    /// The diff of the active comparison, target first, selection second.
    pub fn comparison(&self) -> Option<&RevisionComparison> {
        self.comparison.as_ref()
    }

    pub fn current(&self) -> Option<&Revision> {
        self.current.as_deref().and_then(|id| self.store.get(id))
    }

    /// Accept a revision the host just saved. Selection is left untouched.
    pub fn append(&mut self, revision: Revision) -> Result<(), RevisionError> {
        self.store.append(revision)
    }

    /// Display list and counts for `filter`, honouring `show_autosaves`.
    pub fn view(&self, filter: RevisionFilter) -> FilterView<'_> {
        FilterView::build(self.store.list(), filter, self.config.show_autosaves)
    }

    /// Preview a revision.
    ///
    /// An active comparison is kept (and recomputed) unless `id` is its
    /// target, in which case it is dropped. Unknown ids clear the selection.
    pub fn select(&mut self, id: &str) -> Vec<HistoryEvent> {
        if !self.config.enable_preview {
            tracing::debug!(id, "preview disabled, ignoring select");
            return Vec::new();
        }
        if !self.store.contains(id) {
            tracing::debug!(id, "select of unknown revision clears selection");
            return self.clear_selection();
        }
        if self.selection.selected() == Some(id) {
            return Vec::new();
        }

        self.selection = match self.selection.target() {
            Some(target) if target != id => Selection::Comparing {
                selected: id.to_string(),
                target: target.to_string(),
            },
            _ => Selection::Selected {
                selected: id.to_string(),
            },
        };
        tracing::debug!(id, state = ?self.state(), "revision selected");

        let mut events = vec![HistoryEvent::SelectionChanged(self.selected().cloned())];
        events.extend(self.refresh_comparison());
        events
    }

    /// Choose the "before" side of a comparison with the selected revision.
    ///
    /// Calling it again with the current target switches the comparison off.
    pub fn set_compare(&mut self, id: &str) -> Vec<HistoryEvent> {
        if !self.config.enable_compare {
            tracing::debug!(id, "compare disabled, ignoring set_compare");
            return Vec::new();
        }
        let selected = match self.selection.selected() {
            Some(selected) => selected.to_string(),
            None => return Vec::new(),
        };
        if selected == id || !self.store.contains(id) {
            return Vec::new();
        }

        self.selection = if self.selection.target() == Some(id) {
            Selection::Selected { selected }
        } else {
            Selection::Comparing {
                selected,
                target: id.to_string(),
            }
        };
        tracing::debug!(target_id = id, state = ?self.state(), "compare target changed");

        self.refresh_comparison().into_iter().collect()
    }

    pub fn clear_compare(&mut self) -> Vec<HistoryEvent> {
        let selected = match &self.selection {
            Selection::Comparing { selected, .. } => selected.clone(),
            _ => return Vec::new(),
        };
        self.selection = Selection::Selected { selected };
        self.refresh_comparison().into_iter().collect()
    }

    /// Compare the selection against the host's current revision.
    pub fn compare_with_current(&mut self) -> Vec<HistoryEvent> {
        match self.current.clone() {
            Some(current) if self.selection.target() != Some(current.as_str()) => {
                self.set_compare(&current)
            }
            _ => Vec::new(),
        }
    }

    /// Permanently remove a revision.
    ///
    /// Removing the selected revision clears the selection (and any
    /// comparison); removing the compare target clears only the comparison.
    pub fn delete(&mut self, id: &str) -> Vec<HistoryEvent> {
        let removed = match self.store.remove(id) {
            Some(removed) => removed,
            None => {
                tracing::debug!(id, "delete of unknown revision ignored");
                return Vec::new();
            }
        };
        tracing::debug!(id, version = removed.version, "revision deleted");

        let mut events = vec![HistoryEvent::Deleted(removed.id)];
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }

        let next = match &self.selection {
            s if s.selected() == Some(id) => Some(Selection::Idle),
            Selection::Comparing { selected, target } if target == id => Some(Selection::Selected {
                selected: selected.clone(),
            }),
            _ => None,
        };
        if let Some(next) = next {
            if next == Selection::Idle {
                events.push(HistoryEvent::SelectionChanged(None));
            }
            self.selection = next;
            events.extend(self.refresh_comparison());
        }
        events
    }

    /// Ask the host to apply a revision. The store is not modified.
    pub fn restore(&self, id: &str) -> Vec<HistoryEvent> {
        if !self.config.enable_restore {
            tracing::debug!(id, "restore disabled, ignoring");
            return Vec::new();
        }
        match self.store.get(id) {
            Some(revision) => {
                tracing::debug!(id, version = revision.version, "restore requested");
                vec![HistoryEvent::Restored(revision.clone())]
            }
            None => Vec::new(),
        }
    }

    pub fn restore_selected(&self) -> Vec<HistoryEvent> {
        match self.selection.selected() {
            Some(id) => self.restore(id),
            None => Vec::new(),
        }
    }

    /// Delete everything beyond the retention caps, oldest first.
    ///
    /// Autosaves over `max_autosaves` go first, then whatever still exceeds
    /// `max_revisions`.
    pub fn enforce_retention(&mut self) -> Vec<HistoryEvent> {
        let mut events = Vec::new();
        if let Some(max_autosaves) = self.config.max_autosaves {
            let doomed =
                plan_autosave_retention(self.store.list(), max_autosaves, self.current.as_deref());
            if !doomed.is_empty() {
                tracing::debug!(count = doomed.len(), max = max_autosaves, "applying autosave cap");
            }
            for id in &doomed {
                events.extend(self.delete(id));
            }
        }

        let doomed = plan_retention(
            self.store.list(),
            self.config.max_revisions,
            self.config.keep_all_publishes,
            self.current.as_deref(),
        );
        if !doomed.is_empty() {
            tracing::debug!(count = doomed.len(), max = self.config.max_revisions, "applying retention");
        }
        for id in &doomed {
            events.extend(self.delete(id));
        }
        events
    }

    fn clear_selection(&mut self) -> Vec<HistoryEvent> {
        if self.selection == Selection::Idle {
            return Vec::new();
        }
        self.selection = Selection::Idle;
        let mut events = vec![HistoryEvent::SelectionChanged(None)];
        events.extend(self.refresh_comparison());
        events
    }

    /// Recompute the diff for the current selection. Emits only when there is
    /// a comparison now or there was one before.
    fn refresh_comparison(&mut self) -> Option<HistoryEvent> {
        let next = match &self.selection {
            Selection::Comparing { selected, target } => {
                match (self.store.get(target), self.store.get(selected)) {
                    (Some(from), Some(to)) => {
                        Some(compare_revisions(from, to, self.config.diff_window))
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        if next.is_none() && self.comparison.is_none() {
            return None;
        }
        self.comparison = next.clone();
        Some(HistoryEvent::ComparisonChanged(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{reconstruct_new, reconstruct_old};
    use crate::models::{Author, RevisionType};
    use chrono::{Duration, TimeZone, Utc};

    fn rev(version: u64, revision_type: RevisionType, content: &str) -> Revision {
        let ts = Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap() + Duration::minutes(version as i64);
        Revision::new(
            format!("v{}", version),
            version,
            revision_type,
            format!("Title {}", version),
            content,
            Author::new("u1", "Ada"),
            ts,
        )
    }

    fn session() -> HistorySession {
        let store = InMemoryStore::from_revisions(vec![
            rev(1, RevisionType::Manual, "the quick brown fox"),
            rev(2, RevisionType::Autosave, "the quick red fox jumps"),
            rev(3, RevisionType::Publish, "the quick red fox jumps high"),
        ])
        .unwrap();
        HistorySession::new(store, HistoryConfig::default())
    }

    fn selected_id(s: &HistorySession) -> Option<&str> {
        s.selected().map(|r| r.id.as_str())
    }

    fn target_id(s: &HistorySession) -> Option<&str> {
        s.compare_target().map(|r| r.id.as_str())
    }

    #[test]
    fn test_select_emits_selection() {
        let mut s = session();
        assert_eq!(s.state(), SessionState::Idle);
        let events = s.select("v2");
        assert_eq!(events.len(), 1);
        match &events[0] {
            HistoryEvent::SelectionChanged(Some(r)) => assert_eq!(r.id, "v2"),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(s.state(), SessionState::Selected);
        assert!(s.select("v2").is_empty());
    }

    #[test]
    fn test_select_unknown_clears() {
        let mut s = session();
        s.select("v1");
        s.set_compare("v2");
        let events = s.select("ghost");
        assert_eq!(
            events,
            vec![
                HistoryEvent::SelectionChanged(None),
                HistoryEvent::ComparisonChanged(None)
            ]
        );
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.select("ghost").is_empty());
    }

    #[test]
    fn test_compare_produces_diff() {
        let mut s = session();
        s.select("v2");
        let events = s.set_compare("v1");
        assert_eq!(events.len(), 1);
        assert_eq!(s.state(), SessionState::Comparing);

        let cmp = s.comparison().unwrap();
        assert_eq!(cmp.from_id, "v1");
        assert_eq!(cmp.to_id, "v2");
        assert_eq!(reconstruct_old(&cmp.ops), "the quick brown fox ");
        assert_eq!(reconstruct_new(&cmp.ops), "the quick red fox jumps ");
        assert_eq!(events[0], HistoryEvent::ComparisonChanged(Some(cmp.clone())));
    }

    #[test]
    fn test_set_compare_requires_selection() {
        let mut s = session();
        assert!(s.set_compare("v1").is_empty());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_set_compare_rejects_selected_and_unknown() {
        let mut s = session();
        s.select("v1");
        assert!(s.set_compare("v1").is_empty());
        assert!(s.set_compare("nope").is_empty());
        assert_eq!(s.state(), SessionState::Selected);
    }

    #[test]
    fn test_set_compare_same_target_toggles_off() {
        let mut s = session();
        s.select("v3");
        s.set_compare("v1");
        let events = s.set_compare("v1");
        assert_eq!(events, vec![HistoryEvent::ComparisonChanged(None)]);
        assert_eq!(s.state(), SessionState::Selected);
        assert!(s.comparison().is_none());
    }

    #[test]
    fn test_set_compare_switches_target() {
        let mut s = session();
        s.select("v3");
        s.set_compare("v1");
        s.set_compare("v2");
        assert_eq!(target_id(&s), Some("v2"));
        assert_eq!(s.comparison().unwrap().from_id, "v2");
    }

    #[test]
    fn test_selecting_target_clears_compare() {
        let mut s = session();
        s.select("v3");
        s.set_compare("v1");
        let events = s.select("v1");
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], HistoryEvent::ComparisonChanged(None));
        assert_eq!(selected_id(&s), Some("v1"));
        assert_eq!(target_id(&s), None);
        assert_eq!(s.state(), SessionState::Selected);
    }

    #[test]
    fn test_selecting_other_keeps_compare() {
        let mut s = session();
        s.select("v3");
        s.set_compare("v1");
        let events = s.select("v2");
        assert_eq!(events.len(), 2);
        assert_eq!(s.state(), SessionState::Comparing);
        let cmp = s.comparison().unwrap();
        assert_eq!((cmp.from_id.as_str(), cmp.to_id.as_str()), ("v1", "v2"));
    }

    #[test]
    fn test_clear_compare() {
        let mut s = session();
        s.select("v3");
        assert!(s.clear_compare().is_empty());
        s.set_compare("v2");
        assert_eq!(s.clear_compare(), vec![HistoryEvent::ComparisonChanged(None)]);
        assert_eq!(s.state(), SessionState::Selected);
        assert_eq!(selected_id(&s), Some("v3"));
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut s = session();
        s.select("v2");
        s.set_compare("v1");
        let events = s.delete("v2");
        assert_eq!(
            events,
            vec![
                HistoryEvent::Deleted("v2".into()),
                HistoryEvent::SelectionChanged(None),
                HistoryEvent::ComparisonChanged(None),
            ]
        );
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.store().get("v2").is_none());
    }

    #[test]
    fn test_delete_target_keeps_selection() {
        let mut s = session();
        s.select("v3");
        s.set_compare("v1");
        let events = s.delete("v1");
        assert_eq!(
            events,
            vec![
                HistoryEvent::Deleted("v1".into()),
                HistoryEvent::ComparisonChanged(None),
            ]
        );
        assert_eq!(s.state(), SessionState::Selected);
        assert_eq!(selected_id(&s), Some("v3"));
    }

    #[test]
    fn test_delete_unrelated_and_unknown() {
        let mut s = session();
        s.select("v3");
        assert_eq!(s.delete("v1"), vec![HistoryEvent::Deleted("v1".into())]);
        assert!(s.delete("v1").is_empty());
        assert_eq!(s.state(), SessionState::Selected);
        assert_eq!(s.store().len(), 2);
    }

    #[test]
    fn test_restore_emits_full_record_without_mutating() {
        let mut s = session();
        s.select("v2");
        let before: Vec<Revision> = s.store().list().to_vec();
        let events = s.restore_selected();
        assert_eq!(events.len(), 1);
        let expected = s.store().get("v2").unwrap().clone();
        assert_eq!(events[0], HistoryEvent::Restored(expected));
        assert_eq!(s.store().list(), before.as_slice());
        assert!(s.restore("gone").is_empty());
    }

    #[test]
    fn test_restore_selected_when_idle() {
        let s = session();
        assert!(s.restore_selected().is_empty());
    }

    #[test]
    fn test_feature_toggles() {
        let store = InMemoryStore::from_revisions(vec![
            rev(1, RevisionType::Manual, "a"),
            rev(2, RevisionType::Manual, "b"),
        ])
        .unwrap();
        let config = HistoryConfig {
            enable_compare: false,
            enable_restore: false,
            ..HistoryConfig::default()
        };
        let mut s = HistorySession::new(store, config);
        assert_eq!(s.select("v2").len(), 1);
        assert!(s.set_compare("v1").is_empty());
        assert!(s.restore("v1").is_empty());

        let store = InMemoryStore::from_revisions(vec![rev(1, RevisionType::Manual, "a")]).unwrap();
        let config = HistoryConfig {
            enable_preview: false,
            ..HistoryConfig::default()
        };
        let mut s = HistorySession::new(store, config);
        assert!(s.select("v1").is_empty());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_append_between_operations() {
        let mut s = session();
        s.select("v3");
        s.set_compare("v2");
        s.append(rev(4, RevisionType::Manual, "brand new")).unwrap();
        assert_eq!(s.state(), SessionState::Comparing);
        assert_eq!(s.store().len(), 4);
        assert_eq!(s.view(RevisionFilter::All).revisions[0].id, "v4");
        assert!(s.append(rev(4, RevisionType::Manual, "dup")).is_err());
    }

    #[test]
    fn test_compare_with_current() {
        let store = InMemoryStore::from_revisions(vec![
            rev(1, RevisionType::Manual, "a b"),
            rev(2, RevisionType::Publish, "a c"),
        ])
        .unwrap();
        let mut s = HistorySession::new(store, HistoryConfig::default()).with_current("v2");
        assert_eq!(s.current().unwrap().id, "v2");

        s.select("v1");
        assert_eq!(s.compare_with_current().len(), 1);
        assert_eq!(target_id(&s), Some("v2"));
        // Already comparing against current: stays on.
        assert!(s.compare_with_current().is_empty());
        assert_eq!(s.state(), SessionState::Comparing);

        s.select("v2");
        assert!(s.compare_with_current().is_empty());
    }

    #[test]
    fn test_delete_current_clears_pointer() {
        let mut s = session().with_current("v3");
        s.delete("v3");
        assert!(s.current().is_none());
    }

    #[test]
    fn test_enforce_retention_goes_through_delete() {
        let revisions: Vec<Revision> = (1..=5)
            .map(|v| rev(v, RevisionType::Autosave, "text"))
            .collect();
        let store = InMemoryStore::from_revisions(revisions).unwrap();
        let config = HistoryConfig {
            max_revisions: 3,
            ..HistoryConfig::default()
        };
        let mut s = HistorySession::new(store, config);
        s.select("v1");

        let events = s.enforce_retention();
        assert_eq!(
            events,
            vec![
                HistoryEvent::Deleted("v1".into()),
                HistoryEvent::SelectionChanged(None),
                HistoryEvent::Deleted("v2".into()),
            ]
        );
        assert_eq!(s.store().len(), 3);
        assert!(s.enforce_retention().is_empty());
    }

    #[test]
    fn test_enforce_retention_applies_autosave_cap_first() {
        let store = InMemoryStore::from_revisions(vec![
            rev(1, RevisionType::Autosave, "a"),
            rev(2, RevisionType::Manual, "b"),
            rev(3, RevisionType::Autosave, "c"),
            rev(4, RevisionType::Autosave, "d"),
            rev(5, RevisionType::Manual, "e"),
        ])
        .unwrap();
        let config = HistoryConfig {
            max_revisions: 2,
            max_autosaves: Some(1),
            ..HistoryConfig::default()
        };
        let mut s = HistorySession::new(store, config).with_current("v2");

        let events = s.enforce_retention();
        assert_eq!(
            events,
            vec![
                HistoryEvent::Deleted("v1".into()),
                HistoryEvent::Deleted("v3".into()),
                HistoryEvent::Deleted("v4".into()),
            ]
        );
        let ids: Vec<&str> = s.store().list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["v2", "v5"]);
    }

    #[test]
    fn test_autosave_cap_alone() {
        let store = InMemoryStore::from_revisions(vec![
            rev(1, RevisionType::Autosave, "a"),
            rev(2, RevisionType::Autosave, "b"),
            rev(3, RevisionType::Manual, "c"),
        ])
        .unwrap();
        let config = HistoryConfig {
            max_autosaves: Some(1),
            ..HistoryConfig::default()
        };
        let mut s = HistorySession::new(store, config);
        assert_eq!(s.enforce_retention(), vec![HistoryEvent::Deleted("v1".into())]);
        assert!(s.enforce_retention().is_empty());
        assert_eq!(s.store().len(), 2);
    }

    #[test]
    fn test_view_respects_show_autosaves() {
        let store = InMemoryStore::from_revisions(vec![
            rev(1, RevisionType::Manual, "a"),
            rev(2, RevisionType::Autosave, "b"),
            rev(3, RevisionType::Publish, "c"),
        ])
        .unwrap();
        let config = HistoryConfig {
            show_autosaves: false,
            ..HistoryConfig::default()
        };
        let s = HistorySession::new(store, config);
        let all = s.view(RevisionFilter::All);
        assert_eq!(all.revisions.len(), 2);
        assert_eq!(all.counts.autosave, 1);
        assert_eq!(s.view(RevisionFilter::Autosave).revisions.len(), 1);
    }
}
