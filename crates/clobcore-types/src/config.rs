//! Configuration types.
//!
//! Two families live here. Governance records ([`BlockRateLimitConfiguration`],
//! [`EquityTierLimitConfiguration`], [`LiquidationsConfig`]) are singletons
//! stored in chain state and changed only through update messages; their
//! `Default` is the genesis value. Validator bounds ([`OrderValidationParams`],
//! [`RateLimitBounds`], [`EquityTierBounds`]) are what the validators compare
//! against; their `Default` is the protocol constants.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ClobError, Result, constants};

// ---------------------------------------------------------------------------
// Block rate limits
// ---------------------------------------------------------------------------

/// The three rate-limited message streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateLimitKind {
    ShortTermOrders,
    ShortTermCancellations,
    StatefulOrders,
}

impl fmt::Display for RateLimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortTermOrders => write!(f, "short-term orders"),
            Self::ShortTermCancellations => write!(f, "short-term cancellations"),
            Self::StatefulOrders => write!(f, "stateful orders"),
        }
    }
}

/// At most `limit` messages over any window of `num_blocks` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxPerNBlocksRateLimit {
    pub num_blocks: u32,
    pub limit: u32,
}

impl MaxPerNBlocksRateLimit {
    #[must_use]
    pub const fn new(num_blocks: u32, limit: u32) -> Self {
        Self { num_blocks, limit }
    }
}

/// Block-level rate limits for every message stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRateLimitConfiguration {
    pub max_short_term_orders_per_n_blocks: Vec<MaxPerNBlocksRateLimit>,
    pub max_short_term_order_cancellations_per_n_blocks: Vec<MaxPerNBlocksRateLimit>,
    pub max_stateful_orders_per_n_blocks: Vec<MaxPerNBlocksRateLimit>,
}

impl BlockRateLimitConfiguration {
    /// Every list paired with the stream it limits.
    #[must_use]
    pub fn lists(&self) -> [(RateLimitKind, &[MaxPerNBlocksRateLimit]); 3] {
        [
            (
                RateLimitKind::ShortTermOrders,
                &self.max_short_term_orders_per_n_blocks,
            ),
            (
                RateLimitKind::ShortTermCancellations,
                &self.max_short_term_order_cancellations_per_n_blocks,
            ),
            (
                RateLimitKind::StatefulOrders,
                &self.max_stateful_orders_per_n_blocks,
            ),
        ]
    }
}

impl Default for BlockRateLimitConfiguration {
    fn default() -> Self {
        Self {
            max_short_term_orders_per_n_blocks: vec![MaxPerNBlocksRateLimit::new(1, 200)],
            max_short_term_order_cancellations_per_n_blocks: vec![MaxPerNBlocksRateLimit::new(
                1, 200,
            )],
            max_stateful_orders_per_n_blocks: vec![
                MaxPerNBlocksRateLimit::new(1, 2),
                MaxPerNBlocksRateLimit::new(100, 20),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Equity tiers
// ---------------------------------------------------------------------------

/// The two equity tier lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquityTierKind {
    ShortTerm,
    Stateful,
}

impl fmt::Display for EquityTierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortTerm => write!(f, "short-term"),
            Self::Stateful => write!(f, "stateful"),
        }
    }
}

/// A subaccount with at least `usd_tnc_required` total net collateral may
/// hold up to `limit` open orders of the tier's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityTierLimit {
    pub usd_tnc_required: Decimal,
    pub limit: u32,
}

impl EquityTierLimit {
    #[must_use]
    pub fn new(usd_tnc_required: i64, limit: u32) -> Self {
        Self {
            usd_tnc_required: Decimal::from(usd_tnc_required),
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquityTierLimitConfiguration {
    pub short_term_order_equity_tiers: Vec<EquityTierLimit>,
    pub stateful_order_equity_tiers: Vec<EquityTierLimit>,
}

impl EquityTierLimitConfiguration {
    #[must_use]
    pub fn lists(&self) -> [(EquityTierKind, &[EquityTierLimit]); 2] {
        [
            (EquityTierKind::ShortTerm, &self.short_term_order_equity_tiers),
            (EquityTierKind::Stateful, &self.stateful_order_equity_tiers),
        ]
    }
}

impl Default for EquityTierLimitConfiguration {
    fn default() -> Self {
        Self {
            short_term_order_equity_tiers: vec![
                EquityTierLimit::new(0, 0),
                EquityTierLimit::new(20, 1),
                EquityTierLimit::new(100, 5),
                EquityTierLimit::new(1_000, 10),
                EquityTierLimit::new(10_000, 100),
                EquityTierLimit::new(100_000, 1_000),
            ],
            stateful_order_equity_tiers: vec![
                EquityTierLimit::new(0, 0),
                EquityTierLimit::new(20, 1),
                EquityTierLimit::new(100, 5),
                EquityTierLimit::new(1_000, 10),
                EquityTierLimit::new(10_000, 100),
                EquityTierLimit::new(100_000, 200),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Liquidations
// ---------------------------------------------------------------------------

/// Per-position limits on a single liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionBlockLimits {
    /// Positions below this notional may be liquidated in full. Unconstrained.
    pub min_position_notional_liquidated: u64,
    pub max_position_portion_liquidated_ppm: u32,
}

/// Per-subaccount limits over a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubaccountBlockLimits {
    pub max_notional_liquidated: u64,
    pub max_quantums_insurance_lost: u64,
}

/// How the fillable price of a liquidation is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillablePriceConfig {
    pub bankruptcy_adjustment_ppm: u32,
    pub spread_to_maintenance_margin_ratio_ppm: u32,
}

/// Risk limits applied to liquidations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidationsConfig {
    pub max_liquidation_fee_ppm: u32,
    pub position_block_limits: PositionBlockLimits,
    pub subaccount_block_limits: SubaccountBlockLimits,
    pub fillable_price_config: FillablePriceConfig,
}

impl Default for LiquidationsConfig {
    fn default() -> Self {
        Self {
            max_liquidation_fee_ppm: 5_000,
            position_block_limits: PositionBlockLimits {
                min_position_notional_liquidated: 1_000,
                max_position_portion_liquidated_ppm: 1_000_000,
            },
            subaccount_block_limits: SubaccountBlockLimits {
                max_notional_liquidated: 100_000_000_000_000,
                max_quantums_insurance_lost: 100_000_000_000_000,
            },
            fillable_price_config: FillablePriceConfig {
                bankruptcy_adjustment_ppm: 1_000_000,
                spread_to_maintenance_margin_ratio_ppm: 100_000,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Validator bounds
// ---------------------------------------------------------------------------

/// Static bounds applied by the message validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderValidationParams {
    pub short_block_window: u32,
    pub stateful_order_time_window_secs: u64,
    pub max_batch_cancel_size: u32,
    pub min_twap_interval_secs: u32,
    pub max_twap_interval_secs: u32,
    pub min_twap_duration_secs: u32,
    pub max_twap_duration_secs: u32,
    /// Exclusive upper bound.
    pub max_twap_price_tolerance_ppm: u32,
    pub max_builder_code_fee_ppm: u32,
    pub max_subaccount_number: u32,
    pub address_prefix: String,
}

impl Default for OrderValidationParams {
    fn default() -> Self {
        Self {
            short_block_window: constants::SHORT_BLOCK_WINDOW,
            stateful_order_time_window_secs: constants::STATEFUL_ORDER_TIME_WINDOW_SECS,
            max_batch_cancel_size: constants::MAX_MSG_BATCH_CANCEL_BATCH_SIZE,
            min_twap_interval_secs: constants::MIN_TWAP_ORDER_INTERVAL_SECS,
            max_twap_interval_secs: constants::MAX_TWAP_ORDER_INTERVAL_SECS,
            min_twap_duration_secs: constants::MIN_TWAP_ORDER_DURATION_SECS,
            max_twap_duration_secs: constants::MAX_TWAP_ORDER_DURATION_SECS,
            max_twap_price_tolerance_ppm: constants::MAX_TWAP_ORDER_PRICE_TOLERANCE_PPM,
            max_builder_code_fee_ppm: constants::MAX_BUILDER_CODE_FEE_PPM,
            max_subaccount_number: constants::MAX_SUBACCOUNT_ID_NUMBER,
            address_prefix: constants::ADDRESS_PREFIX.to_string(),
        }
    }
}

/// Per-kind maxima for rate limit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitBounds {
    pub short_term_max_limit: u32,
    pub short_term_max_num_blocks: u32,
    pub stateful_max_limit: u32,
    pub stateful_max_num_blocks: u32,
}

impl RateLimitBounds {
    /// `(max limit, max num_blocks)` for a stream.
    #[must_use]
    pub fn maxima(&self, kind: RateLimitKind) -> (u32, u32) {
        match kind {
            RateLimitKind::ShortTermOrders | RateLimitKind::ShortTermCancellations => {
                (self.short_term_max_limit, self.short_term_max_num_blocks)
            }
            RateLimitKind::StatefulOrders => (self.stateful_max_limit, self.stateful_max_num_blocks),
        }
    }
}

impl Default for RateLimitBounds {
    fn default() -> Self {
        Self {
            short_term_max_limit: constants::MAX_SHORT_TERM_ORDERS_AND_CANCELS_LIMIT,
            short_term_max_num_blocks: constants::MAX_SHORT_TERM_ORDERS_AND_CANCELS_NUM_BLOCKS,
            stateful_max_limit: constants::MAX_STATEFUL_ORDERS_LIMIT,
            stateful_max_num_blocks: constants::MAX_STATEFUL_ORDERS_NUM_BLOCKS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquityTierBounds {
    pub max_limit: u32,
}

impl Default for EquityTierBounds {
    fn default() -> Self {
        Self {
            max_limit: constants::MAX_EQUITY_TIER_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// Everything a node needs to run the validators, loadable from JSON.
///
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClobCoreConfig {
    pub order_validation: OrderValidationParams,
    pub rate_limit_bounds: RateLimitBounds,
    pub equity_tier_bounds: EquityTierBounds,
    pub block_rate_limits: BlockRateLimitConfiguration,
    pub equity_tier_limits: EquityTierLimitConfiguration,
    pub liquidations: LiquidationsConfig,
}

impl ClobCoreConfig {
    /// Parse a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ClobError::Configuration(e.to_string()))
    }
}
