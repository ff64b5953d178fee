//! # Meritbook Closure
//!
//! The semester write-lock gate and its administrative lifecycle.
//!
//! Every period-scoped mutation runs through [`gate::WriteGate`], which
//! reads the current lock state for the targeted (class, semester, year)
//! and either allows the write or produces a structured denial. The gate
//! only reads; state transitions (propose, soft-lock with a grace window,
//! rollback, hard-lock) are administrative operations in
//! [`lifecycle::ClosureService`].
//!
//! - [`gate`]: per-request writability decisions
//! - [`lifecycle`]: closure state machine
//! - [`snapshot`]: pre-lock data snapshot with checksum
//! - [`store`]: lock-state persistence behind a trait

pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod snapshot;
pub mod store;

pub use error::{ClosureError, ClosureStoreError};
pub use gate::{BlockDetails, Decision, WriteGate, WriteRequest};
pub use lifecycle::{ActivityLedger, ClosureService};
pub use snapshot::{ClosureSnapshot, SnapshotActivity};
pub use store::{FileLockStore, InMemoryLockStore, LockStore};
