//! Display list and per-type counts over a store's revisions.
//!
//! Revisions are shown newest first. Publish and scheduled revisions share
//! one bucket. With `show_autosaves` off, autosaves drop out of every bucket
//! except [`RevisionFilter::Autosave`], and the counts follow suit so each
//! count always equals the length of the list that filter would show.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::models::{Revision, RevisionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionFilter {
    #[default]
    All,
    Manual,
    Autosave,
    /// Publish or scheduled.
    Published,
}

impl RevisionFilter {
    pub const ALL_BUCKETS: [RevisionFilter; 4] = [
        RevisionFilter::All,
        RevisionFilter::Manual,
        RevisionFilter::Autosave,
        RevisionFilter::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Manual => "manual",
            Self::Autosave => "autosave",
            Self::Published => "published",
        }
    }

    fn admits(&self, revision_type: RevisionType, show_autosaves: bool) -> bool {
        match self {
            Self::All => show_autosaves || revision_type != RevisionType::Autosave,
            Self::Manual => revision_type == RevisionType::Manual,
            Self::Autosave => revision_type == RevisionType::Autosave,
            Self::Published => revision_type.is_published(),
        }
    }
}

impl fmt::Display for RevisionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RevisionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "manual" => Ok(Self::Manual),
            "autosave" => Ok(Self::Autosave),
            "published" | "publish" => Ok(Self::Published),
            other => Err(format!(
                "Unknown filter: '{}'. Use all, manual, autosave, or published.",
                other
            )),
        }
    }
}

/// Number of revisions each filter would display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub manual: usize,
    pub autosave: usize,
    pub published: usize,
}

impl FilterCounts {
    pub fn get(&self, filter: RevisionFilter) -> usize {
        match filter {
            RevisionFilter::All => self.all,
            RevisionFilter::Manual => self.manual,
            RevisionFilter::Autosave => self.autosave,
            RevisionFilter::Published => self.published,
        }
    }

    fn slot_mut(&mut self, filter: RevisionFilter) -> &mut usize {
        match filter {
            RevisionFilter::All => &mut self.all,
            RevisionFilter::Manual => &mut self.manual,
            RevisionFilter::Autosave => &mut self.autosave,
            RevisionFilter::Published => &mut self.published,
        }
    }
}

/// A filtered, sorted list together with the counts of every bucket.
#[derive(Debug, Clone)]
pub struct FilterView<'a> {
    pub filter: RevisionFilter,
    pub revisions: Vec<&'a Revision>,
    pub counts: FilterCounts,
}

impl<'a> FilterView<'a> {
    pub fn build(revisions: &'a [Revision], filter: RevisionFilter, show_autosaves: bool) -> Self {
        Self {
            filter,
            revisions: filter_revisions(revisions, filter, show_autosaves),
            counts: count_revisions(revisions, show_autosaves),
        }
    }
}

/// Revisions matching `filter`, newest first (ties broken by version).
pub fn filter_revisions(
    revisions: &[Revision],
    filter: RevisionFilter,
    show_autosaves: bool,
) -> Vec<&Revision> {
    let mut out: Vec<&Revision> = revisions
        .iter()
        .filter(|r| filter.admits(r.revision_type, show_autosaves))
        .collect();
    out.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.version.cmp(&a.version))
    });
    out
}

pub fn count_revisions(revisions: &[Revision], show_autosaves: bool) -> FilterCounts {
    let mut counts = FilterCounts::default();
    for r in revisions {
        for filter in RevisionFilter::ALL_BUCKETS {
            if filter.admits(r.revision_type, show_autosaves) {
                *counts.slot_mut(filter) += 1;
            }
        }
    }
    counts
}
