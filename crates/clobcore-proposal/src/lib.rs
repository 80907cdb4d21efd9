//! # clobcore-proposal
//!
//! **Block assembly**: the operations queue a proposer builds for the next
//! block, and the per-block summary handed to the following one.
//!
//! ## Lifecycle
//!
//! 1. Orders reaching the book reserve a nonce in [`OperationsToPropose`]
//! 2. Placements, cancellations, matches, and removals are queued
//! 3. The queue is sealed and drained in ascending nonce order
//! 4. [`reconcile`] turns the drained queue into [`ProcessProposerMatchesEvents`]
//! 5. The next block checks the record with [`validate`] before replaying it
//!
//! Queue invariant violations are errors of kind
//! [`ErrorKind::QueueInvariant`](clobcore_types::ErrorKind) and are logged
//! at `warn`.
//!
//! [`ProcessProposerMatchesEvents`]: clobcore_types::ProcessProposerMatchesEvents

pub mod matches_events;
pub mod operations_to_propose;

pub use matches_events::{reconcile, validate};
pub use operations_to_propose::{MakerFillWithOrder, OperationsToPropose};
