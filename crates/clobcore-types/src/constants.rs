//! Protocol-wide constants for clobcore.
//!
//! These are the documented defaults. Validators never read them directly:
//! they are copied into the configuration structs in [`crate::config`], which
//! callers can override.

// ---------------------------------------------------------------------------
// Order flags
// ---------------------------------------------------------------------------

/// Short-term orders expire by block height and are never persisted.
pub const ORDER_FLAGS_SHORT_TERM: u32 = 0;

/// Conditional orders are stateful and gated on a price trigger.
pub const ORDER_FLAGS_CONDITIONAL: u32 = 32;

/// Long-term orders are stateful and expire by block time.
pub const ORDER_FLAGS_LONG_TERM: u32 = 64;

/// TWAP orders are stateful and executed in scheduled slices.
pub const ORDER_FLAGS_TWAP: u32 = 128;

// ---------------------------------------------------------------------------
// Order validation
// ---------------------------------------------------------------------------

/// Number of blocks into the future a short-term `GoodTilBlock` may reach.
pub const SHORT_BLOCK_WINDOW: u32 = 40;

/// How far into the future a stateful `GoodTilBlockTime` may reach (95 days).
pub const STATEFUL_ORDER_TIME_WINDOW_SECS: u64 = 95 * 24 * 60 * 60;

/// Maximum number of client ids across all groups of a batch cancel.
pub const MAX_MSG_BATCH_CANCEL_BATCH_SIZE: u32 = 100;

/// Largest valid subaccount number.
pub const MAX_SUBACCOUNT_ID_NUMBER: u32 = 128_000;

/// Bech32 human-readable prefix of account addresses.
pub const ADDRESS_PREFIX: &str = "dydx";

/// Shortest TWAP slice interval (seconds).
pub const MIN_TWAP_ORDER_INTERVAL_SECS: u32 = 30;

/// Longest TWAP slice interval (seconds).
pub const MAX_TWAP_ORDER_INTERVAL_SECS: u32 = 3_600;

/// Shortest TWAP schedule (seconds).
pub const MIN_TWAP_ORDER_DURATION_SECS: u32 = 300;

/// Longest TWAP schedule (seconds).
pub const MAX_TWAP_ORDER_DURATION_SECS: u32 = 86_400;

/// TWAP price tolerance must be strictly below this (parts per million).
pub const MAX_TWAP_ORDER_PRICE_TOLERANCE_PPM: u32 = 1_000_000;

/// Largest builder-code fee (parts per million).
pub const MAX_BUILDER_CODE_FEE_PPM: u32 = 10_000;

// ---------------------------------------------------------------------------
// Governance configuration bounds
// ---------------------------------------------------------------------------

/// Max `limit` for short-term order / cancellation rate limits.
pub const MAX_SHORT_TERM_ORDERS_AND_CANCELS_LIMIT: u32 = 10_000_000;

/// Max `num_blocks` for short-term order / cancellation rate limits.
pub const MAX_SHORT_TERM_ORDERS_AND_CANCELS_NUM_BLOCKS: u32 = 1_000;

/// Max `limit` for stateful order rate limits.
pub const MAX_STATEFUL_ORDERS_LIMIT: u32 = 1_000_000;

/// Max `num_blocks` for stateful order rate limits.
pub const MAX_STATEFUL_ORDERS_NUM_BLOCKS: u32 = 10_000;

/// Max `limit` of any equity tier.
pub const MAX_EQUITY_TIER_LIMIT: u32 = 10_000_000;

/// One million parts per million.
pub const ONE_MILLION: u32 = 1_000_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
