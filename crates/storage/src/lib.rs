//! Store backends for the component catalog
//!
//! Two interchangeable implementations of the
//! [`ComponentStore`](partstore_core::ComponentStore) contract:
//!
//! - [`MemoryStore`]: transient, single-process, one coarse lock. For
//!   ephemeral and test use, or low-volume deployments without durability.
//! - [`SqliteStore`]: durable, backed by an embedded SQLite database with
//!   versioned-row updates for conflict detection.
//!
//! Both detect write-write conflicts optimistically: a version token is
//! captured when a record is read for editing and compared again in a
//! single atomic step at commit time. Neither backend holds its lock while
//! a caller's edit closure runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
