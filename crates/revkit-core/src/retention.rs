//! Retention planning: which revisions fall outside the `max_revisions` cap
//! or the autosave-only `max_autosaves` cap.
//!
//! The planners only pick ids. Removal happens through
//! [`HistorySession::enforce_retention`](crate::session::HistorySession::enforce_retention)
//! so every deletion applies the usual selection side effects and signals.

use std::collections::HashSet;

use crate::models::{Revision, RevisionType};

/// Ids to drop so that at most `max_revisions` remain, oldest first.
///
/// Newest revisions fill the cap. The current revision is always kept, and
/// publish revisions are kept as well when `keep_all_publishes` is set, even
/// if that leaves more than `max_revisions` in place. Only
/// [`RevisionType::Publish`] is protected; scheduled revisions compete for
/// the cap like any other.
pub fn plan_retention(
    revisions: &[Revision],
    max_revisions: usize,
    keep_all_publishes: bool,
    current: Option<&str>,
) -> Vec<String> {
    if revisions.len() <= max_revisions {
        return Vec::new();
    }

    let mut newest_first: Vec<&Revision> = revisions.iter().collect();
    newest_first.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.version.cmp(&a.version))
    });

    let mut keep: HashSet<&str> = newest_first
        .iter()
        .filter(|r| {
            Some(r.id.as_str()) == current
                || (keep_all_publishes && r.revision_type == RevisionType::Publish)
        })
        .map(|r| r.id.as_str())
        .collect();

    for r in &newest_first {
        if keep.len() >= max_revisions {
            break;
        }
        keep.insert(r.id.as_str());
    }

    let mut dropped: Vec<&Revision> = revisions
        .iter()
        .filter(|r| !keep.contains(r.id.as_str()))
        .collect();
    oldest_first_ids(dropped)
}

/// Autosave ids to drop so that at most `max_autosaves` autosaves remain,
/// oldest first. Other revision types are never touched.
///
/// The current revision is kept even when it is an old autosave; it still
/// counts against the cap.
pub fn plan_autosave_retention(
    revisions: &[Revision],
    max_autosaves: usize,
    current: Option<&str>,
) -> Vec<String> {
    let mut autosaves: Vec<&Revision> = revisions
        .iter()
        .filter(|r| r.revision_type == RevisionType::Autosave)
        .collect();
    if autosaves.len() <= max_autosaves {
        return Vec::new();
    }

    autosaves.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.version.cmp(&a.version))
    });

    let mut keep: HashSet<&str> = autosaves
        .iter()
        .filter(|r| Some(r.id.as_str()) == current)
        .map(|r| r.id.as_str())
        .collect();
    for r in &autosaves {
        if keep.len() >= max_autosaves {
            break;
        }
        keep.insert(r.id.as_str());
    }

    let dropped = autosaves
        .into_iter()
        .filter(|r| !keep.contains(r.id.as_str()))
        .collect();
    oldest_first_ids(dropped)
}

fn oldest_first_ids(mut revisions: Vec<&Revision>) -> Vec<String> {
    revisions.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.version.cmp(&b.version))
    });
    revisions.into_iter().map(|r| r.id.clone()).collect()
}
