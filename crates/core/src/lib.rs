//! Core types and traits for Partstore
//!
//! This crate defines the foundational types used throughout the system:
//! - Component: one inventory bin of stock
//! - ComponentStore: the store contract both backends satisfy
//! - EditDecision / EditOutcome: commit-or-discard edit protocol
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod component;
pub mod error;
pub mod traits;

pub use component::{Component, ComponentId, AVAILABLE_CATEGORIES};
pub use error::{Error, Result};
pub use traits::{ComponentStore, EditDecision, EditOutcome};
