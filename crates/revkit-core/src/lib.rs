//! # revkit core
//!
//! Revision history for a single editable document: data models, a
//! bounded-lookahead word diff, the revision store, the selection and
//! comparison session, filtering, and retention planning.
//!
//! Everything here is synchronous and free of I/O. Persisting revisions and
//! applying restored content are left to the host.
//!
//! ```rust
//! use chrono::Utc;
//! use revkit_core::config::HistoryConfig;
//! use revkit_core::models::{Author, Revision, RevisionType};
//! use revkit_core::session::{HistoryEvent, HistorySession};
//! use revkit_core::store::memory::InMemoryStore;
//!
//! let author = Author::new("u1", "Ada");
//! let store = InMemoryStore::from_revisions(vec![
//!     Revision::new("r1", 1, RevisionType::Manual, "Post", "hello world", author.clone(), Utc::now()),
//!     Revision::new("r2", 2, RevisionType::Publish, "Post", "hello brave world", author, Utc::now()),
//! ])
//! .unwrap();
//!
//! let mut session = HistorySession::new(store, HistoryConfig::default());
//! session.select("r2");
//! let events = session.set_compare("r1");
//! assert!(matches!(events[0], HistoryEvent::ComparisonChanged(Some(_))));
//! assert_eq!(session.comparison().unwrap().stats.words_added, 1);
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod models;
pub mod retention;
pub mod session;
pub mod store;
