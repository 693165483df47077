//! Partstore - Embedded inventory catalog for discrete electronic parts
//!
//! Each record (a [`Component`]) describes one bin of stock. Bins holding
//! electrically interchangeable parts can be grouped into an equivalence set,
//! so a lookup of any one member surfaces all alternatives.
//!
//! # Quick Start
//!
//! ```
//! use partstore::{ComponentStore, EditDecision, MemoryStore};
//!
//! let store = MemoryStore::new();
//!
//! // Records are created on first committed edit of a fresh id.
//! store.edit_record(1, &mut |comp| {
//!     comp.value = "10k".into();
//!     comp.category = "Resistor".into();
//!     EditDecision::Commit
//! })?;
//!
//! let hits = store.search("10k")?;
//! assert_eq!(hits[0].id, 1);
//! # Ok::<(), partstore::Error>(())
//! ```
//!
//! # Architecture
//!
//! The store contract is the [`ComponentStore`] trait. Two backends satisfy
//! it: [`MemoryStore`] (transient, lock-guarded) and [`SqliteStore`]
//! (durable, versioned-row updates). Relevance ranking is shared between
//! them through the [`Scorer`] trait.

pub use partstore_core::{
    Component, ComponentId, ComponentStore, EditDecision, EditOutcome, Error, Result,
    AVAILABLE_CATEGORIES,
};
pub use partstore_search::{rank, FieldWeightScorer, Scorer};
pub use partstore_storage::{MemoryStore, SqliteStore};
