//! # clobcore-validation
//!
//! Stateless validators for the **clobcore** order core. Nothing here holds
//! state between calls or logs: every function returns the first violated
//! rule as a [`ClobError`](clobcore_types::ClobError) and leaves telemetry to
//! the caller.
//!
//! ## Components
//!
//! 1. **MessageValidator**: place order, cancel order, and batch cancel
//! 2. **MatchValidator**: a single maker/taker fill, liquidation and
//!    deleveraging match structure
//! 3. **ConfigValidators**: rate limits, equity tiers, liquidation risk limits
//! 4. **Operations validator**: a whole proposed operations queue
//!
//! Two collaborators are traits so hosts can substitute their own rules:
//! [`SubaccountIdValidator`] (account address syntax) and
//! [`ReplacementPriority`] (which of two same-id orders wins).
//!
//! ## Flow
//!
//! ```text
//! user tx   → MessageValidator ─┐
//! proposer  → MatchValidator ───┼→ OperationsToPropose (clobcore-proposal)
//! block     → validate_proposed_operations
//! governance → ConfigValidators → chain state
//! ```

pub mod address;
pub mod config_validator;
pub mod match_validator;
pub mod message_validator;
pub mod operations_validator;
pub mod replacement;

pub use address::{Bech32SubaccountValidator, SubaccountIdValidator, validate_address};
pub use config_validator::{
    validate_equity_tier_config, validate_liquidations_config, validate_rate_limit_config,
};
pub use match_validator::{
    validate_deleveraging, validate_liquidation_fills, validate_match, validate_match_orders_fills,
};
pub use message_validator::MessageValidator;
pub use operations_validator::validate_proposed_operations;
pub use replacement::{GoodTilThenHash, ReplacementPriority, validate_replacement};
