//! # clobcore-types
//!
//! Shared types, errors, and configuration for the **clobcore** order
//! validation and block proposal core.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`SubaccountId`], [`OrderId`], [`OrderKind`]
//! - **Order model**: [`Order`], [`Side`], [`TimeInForce`], [`ConditionType`],
//!   [`GoodTilOneof`], [`TwapParameters`], [`BuilderCodeParameters`]
//! - **Matchable orders**: [`MatchableOrder`], [`LiquidationOrder`]
//! - **Messages**: [`MsgPlaceOrder`], [`MsgCancelOrder`], [`MsgBatchCancel`]
//! - **Operations**: [`Operation`], [`ClobMatch`], [`MakerFill`], [`OperationHash`]
//! - **Events**: [`ProcessProposerMatchesEvents`]
//! - **Configuration**: [`BlockRateLimitConfiguration`], [`EquityTierLimitConfiguration`],
//!   [`LiquidationsConfig`], [`OrderValidationParams`], [`ClobCoreConfig`]
//! - **Block context**: [`BlockContext`]
//! - **Errors**: [`ClobError`] with `CLOB_ERR_` prefix codes
//! - **Constants**: protocol-wide limits and defaults

pub mod block;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod hashing;
pub mod ids;
pub mod matchable;
pub mod messages;
pub mod operation;
pub mod order;

#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures;

pub use block::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use hashing::*;
pub use ids::*;
pub use matchable::*;
pub use messages::*;
pub use operation::*;
pub use order::*;

// Constants are accessed via `clobcore_types::constants::FOO`
// (not re-exported to avoid name collisions).
