//! Relevance ranking for the component catalog
//!
//! Scoring is a pure function of (search term, component); no index and no
//! shared state. Both store backends delegate their `search` operation to
//! [`rank`], so ranking policy lives in exactly one place.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ranking;
pub mod scorer;

pub use ranking::rank;
pub use scorer::{FieldWeightScorer, Scorer};
