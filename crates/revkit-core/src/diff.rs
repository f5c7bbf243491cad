//! Bounded-lookahead word diff.
//!
//! Compares two texts token by token, where a token is a
//! whitespace-delimited word plus one trailing space. The walk keeps one
//! pointer into each token list and, on a mismatch, looks a small window
//! ahead on both sides for a realignment point instead of computing a full
//! longest-common-subsequence alignment.
//!
//! # Algorithm
//!
//! 1. Tokenize both texts (see [`tokenize`]).
//! 2. With pointers `i` (old) and `j` (new):
//!    - old exhausted: insert every remaining new token;
//!    - new exhausted: delete every remaining old token;
//!    - tokens equal: emit equal, advance both;
//!    - otherwise search `new[j]` in `old[i..i+w)` (offset `k`) and `old[i]`
//!      in `new[j..j+w)` (offset `m`). If `k` exists and `m` does not or
//!      `k <= m`, delete the `k` skipped old tokens. Else if `m` exists,
//!      insert the `m` skipped new tokens. Else emit a delete/insert pair.
//! 3. Ties go to the old side (delete first).
//!
//! Cost is O(n·w). Heavily reordered text produces fragmented output rather
//! than an optimal alignment.
//!
//! # Example
//!
//! ```rust
//! use revkit_core::diff::compute_diff;
//! use revkit_core::models::DiffOp;
//!
//! let ops = compute_diff("the quick brown fox", "the quick red fox jumps");
//! assert_eq!(
//!     ops,
//!     vec![
//!         DiffOp::equal("the "),
//!         DiffOp::equal("quick "),
//!         DiffOp::delete("brown "),
//!         DiffOp::insert("red "),
//!         DiffOp::equal("fox "),
//!         DiffOp::insert("jumps "),
//!     ]
//! );
//! ```

use serde::Serialize;

use crate::models::{DiffKind, DiffOp, Revision, RevisionType};

/// Default number of tokens searched ahead after a mismatch.
pub const DEFAULT_WINDOW: usize = 5;

/// Split text into tokens: each word followed by exactly one space.
///
/// Whitespace runs collapse to a single space and the final word also gets
/// a trailing space, so reconstruction yields the whitespace-normalized
/// text rather than the original bytes.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| format!("{} ", w)).collect()
}

/// Diff two texts with the [`DEFAULT_WINDOW`].
pub fn compute_diff(old: &str, new: &str) -> Vec<DiffOp> {
    compute_diff_with_window(old, new, DEFAULT_WINDOW)
}

/// Diff two texts, searching `window` tokens ahead on a mismatch.
///
/// A window of 0 behaves like 1 (only substitution pairs).
pub fn compute_diff_with_window(old: &str, new: &str, window: usize) -> Vec<DiffOp> {
    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);
    let window = window.max(1);

    let mut ops = Vec::with_capacity(old_tokens.len().max(new_tokens.len()));
    let mut i = 0;
    let mut j = 0;

    while i < old_tokens.len() || j < new_tokens.len() {
        if i >= old_tokens.len() {
            ops.extend(new_tokens[j..].iter().map(|t| DiffOp::insert(t.as_str())));
            j = new_tokens.len();
        } else if j >= new_tokens.len() {
            ops.extend(old_tokens[i..].iter().map(|t| DiffOp::delete(t.as_str())));
            i = old_tokens.len();
        } else if old_tokens[i] == new_tokens[j] {
            ops.push(DiffOp::equal(old_tokens[i].as_str()));
            i += 1;
            j += 1;
        } else {
            let old_match = find_within(&old_tokens[i..], &new_tokens[j], window);
            let new_match = find_within(&new_tokens[j..], &old_tokens[i], window);

            match (old_match, new_match) {
                (Some(k), m) if m.map_or(true, |m| k <= m) => {
                    ops.extend(old_tokens[i..i + k].iter().map(|t| DiffOp::delete(t.as_str())));
                    i += k;
                }
                (_, Some(m)) => {
                    ops.extend(new_tokens[j..j + m].iter().map(|t| DiffOp::insert(t.as_str())));
                    j += m;
                }
                _ => {
                    ops.push(DiffOp::delete(old_tokens[i].as_str()));
                    ops.push(DiffOp::insert(new_tokens[j].as_str()));
                    i += 1;
                    j += 1;
                }
            }
        }
    }

    tracing::trace!(
        old_tokens = old_tokens.len(),
        new_tokens = new_tokens.len(),
        ops = ops.len(),
        "computed word diff"
    );
    ops
}

/// Offset of `needle` within the first `window` tokens of `haystack`.
fn find_within(haystack: &[String], needle: &str, window: usize) -> Option<usize> {
    haystack.iter().take(window).position(|t| t == needle)
}

/// Concatenate every token that is not an insertion.
pub fn reconstruct_old(ops: &[DiffOp]) -> String {
    ops.iter()
        .filter(|op| op.kind != DiffKind::Insert)
        .map(|op| op.text.as_str())
        .collect()
}

/// Concatenate every token that is not a deletion.
pub fn reconstruct_new(ops: &[DiffOp]) -> String {
    ops.iter()
        .filter(|op| op.kind != DiffKind::Delete)
        .map(|op| op.text.as_str())
        .collect()
}

/// Word-level totals for a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub words_added: usize,
    pub words_removed: usize,
    pub words_unchanged: usize,
    /// Characters inserted minus characters deleted.
    pub char_delta: i64,
}

impl DiffStats {
    pub fn from_ops(ops: &[DiffOp]) -> Self {
        let mut stats = Self::default();
        for op in ops {
            let chars = op.text.chars().count() as i64;
            match op.kind {
                DiffKind::Equal => stats.words_unchanged += 1,
                DiffKind::Insert => {
                    stats.words_added += 1;
                    stats.char_delta += chars;
                }
                DiffKind::Delete => {
                    stats.words_removed += 1;
                    stats.char_delta -= chars;
                }
            }
        }
        stats
    }

    pub fn has_changes(&self) -> bool {
        self.words_added > 0 || self.words_removed > 0
    }
}

/// Render ops as plain text: `[-removed-]` and `{+added+}` around changes.
///
/// Adjacent ops of the same kind are merged into one marker.
pub fn render_word_diff(ops: &[DiffOp]) -> String {
    let mut out = String::new();
    let mut run: Option<(DiffKind, String)> = None;

    for op in ops {
        match run.as_mut() {
            Some((kind, text)) if *kind == op.kind => text.push_str(&op.text),
            _ => {
                if let Some((kind, text)) = run.take() {
                    push_run(&mut out, kind, &text);
                }
                run = Some((op.kind, op.text.clone()));
            }
        }
    }
    if let Some((kind, text)) = run {
        push_run(&mut out, kind, &text);
    }
    out.trim_end().to_string()
}

fn push_run(out: &mut String, kind: DiffKind, text: &str) {
    match kind {
        DiffKind::Equal => out.push_str(text),
        DiffKind::Delete => {
            out.push_str("[-");
            out.push_str(text.trim_end());
            out.push_str("-] ");
        }
        DiffKind::Insert => {
            out.push_str("{+");
            out.push_str(text.trim_end());
            out.push_str("+} ");
        }
    }
}

/// The diff between an earlier ("from") and a later ("to") revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionComparison {
    pub from_id: String,
    pub to_id: String,
    pub from_version: u64,
    pub to_version: u64,
    pub from_type: RevisionType,
    pub to_type: RevisionType,
    pub title_changed: bool,
    pub ops: Vec<DiffOp>,
    pub stats: DiffStats,
}

/// Compare the content of two revisions. `from` is the "before" side.
pub fn compare_revisions(from: &Revision, to: &Revision, window: usize) -> RevisionComparison {
    let ops = compute_diff_with_window(&from.content, &to.content, window);
    let stats = DiffStats::from_ops(&ops);
    RevisionComparison {
        from_id: from.id.clone(),
        to_id: to.id.clone(),
        from_version: from.version,
        to_version: to.version,
        from_type: from.revision_type,
        to_type: to.revision_type,
        title_changed: from.title != to.title,
        ops,
        stats,
    }
}
