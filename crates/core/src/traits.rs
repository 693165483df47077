//! The store contract both backends satisfy
//!
//! This module defines the ComponentStore trait so the transient in-memory
//! backend and the durable SQLite backend are interchangeable to callers.

use crate::component::{Component, ComponentId};
use crate::error::Result;

/// Decision returned by an edit closure.
///
/// Making the commit-or-discard choice an explicit enum (rather than a bare
/// boolean) keeps the caller's business-rule decision visible at the call
/// site and testable on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDecision {
    /// Persist the edited copy.
    Commit,
    /// Throw the edited copy away; the store is left untouched.
    Discard,
}

/// What a successful `edit_record` call did.
///
/// All three variants mean the call completed as the caller intended;
/// failures are reported through `Error` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The new field values were persisted.
    Committed,
    /// The closure committed a copy identical to what was read; backing
    /// storage was not touched and timestamps did not move.
    Unchanged,
    /// The closure chose to discard its changes.
    Discarded,
}

/// Storage abstraction for the component catalog
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync). The store never calls out;
/// it is a passive, synchronous service object.
pub trait ComponentStore: Send + Sync {
    /// Find a component by its id.
    ///
    /// Returns `None` if no record exists. The returned value is a copy;
    /// mutating it has no effect on the store.
    fn find_by_id(&self, id: ComponentId) -> Result<Option<Component>>;

    /// Edit the record with the given id through a read-modify-write cycle.
    ///
    /// If the id is new, an empty record is synthesized and handed to the
    /// closure; it is only inserted if the closure commits actual content.
    /// The closure runs on a private copy with no store lock held and
    /// returns whether to commit or discard.
    ///
    /// The id field is immutable: a closure that changes it is rejected
    /// with `Error::IdChanged` and nothing is written. Equivalence-set
    /// membership is not editable here either; changes to `equiv_set` made
    /// by the closure are ignored, use [`join_set`](Self::join_set) and
    /// [`leave_set`](Self::leave_set).
    ///
    /// If another edit of the same id commits between this call's read and
    /// its commit, the call fails with `Error::EditConflict` and the
    /// interleaved edit is preserved. Retrying the whole cycle is the
    /// caller's choice.
    fn edit_record(
        &self,
        id: ComponentId,
        update: &mut dyn FnMut(&mut Component) -> EditDecision,
    ) -> Result<EditOutcome>;

    /// Have the component with the given id join the given equivalence set.
    ///
    /// The target set value is typically the id of an existing component
    /// (the representative), but no such record needs to exist yet. A
    /// missing `id` is a no-op.
    fn join_set(&self, id: ComponentId, equiv_set: ComponentId) -> Result<()>;

    /// Leave whatever set the component is in and return to the default
    /// singleton set (`equiv_set == id`).
    ///
    /// Other members of the abandoned set are unaffected. A missing `id`
    /// is a no-op.
    fn leave_set(&self, id: ComponentId) -> Result<()>;

    /// All components interchangeable with the given one, itself included.
    ///
    /// Resolves the component's current `equiv_set` value and returns every
    /// record sharing it, ordered by (equiv_set, id) ascending. Returns an
    /// empty list if the id does not exist.
    fn matching_equiv_set(&self, id: ComponentId) -> Result<Vec<Component>>;

    /// All components matching a free-text search term, most relevant
    /// first.
    ///
    /// Ranking policy belongs to the backend; for equal relevance the order
    /// is stable across calls. Results are copies, like `find_by_id`.
    fn search(&self, term: &str) -> Result<Vec<Component>>;
}
