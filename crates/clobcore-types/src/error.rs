//! Error types for the clobcore validation and proposal core.
//!
//! All errors use the `CLOB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order identity and message validation errors
//! - 2xx: Match validation errors
//! - 3xx: Operations queue invariant violations
//! - 4xx: Governance configuration errors
//! - 5xx: Cross-block event errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{EquityTierKind, OperationHash, OrderId, OrderKind, RateLimitKind, Side, SubaccountId};

/// Coarse classification of a [`ClobError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User input broke a rule. The caller may fix the input and resubmit.
    Validation,
    /// The caller assembling the operations queue made a mistake. Block
    /// processing should be aborted.
    QueueInvariant,
    /// Per-block event summary is inconsistent with the chain.
    CrossBlock,
    /// Serialization, configuration loading, or an unexpected state.
    Internal,
}

/// Central error enum for all clobcore operations.
#[derive(Debug, Error)]
pub enum ClobError {
    // =================================================================
    // Order Identity / Message Validation Errors (1xx)
    // =================================================================
    /// `order_flags` is not one of the known order kinds.
    #[error("CLOB_ERR_100: Invalid order flags {}: {order_id}", order_id.order_flags)]
    InvalidOrderFlag { order_id: OrderId },

    /// A caller assumed the wrong order kind.
    #[error("CLOB_ERR_101: Expected a {expected} order, got {actual}: {order_id}")]
    OrderKindMismatch {
        order_id: OrderId,
        expected: &'static str,
        actual: OrderKind,
    },

    /// An account address failed bech32 syntax checking.
    #[error("CLOB_ERR_102: Invalid {field} address {address:?}: {reason}")]
    InvalidAddress {
        field: &'static str,
        address: String,
        reason: String,
    },

    /// Subaccount number above the allowed maximum.
    #[error("CLOB_ERR_103: Invalid subaccount number {number} (max {max})")]
    InvalidSubaccountNumber { number: u32, max: u32 },

    /// Side is UNSPECIFIED.
    #[error("CLOB_ERR_104: Invalid order side: {order_id}")]
    InvalidOrderSide { order_id: OrderId },

    /// A wire enum carried a value with no known meaning.
    #[error("CLOB_ERR_105: Unrecognized {field} value {value}")]
    UnrecognizedEnumValue { field: &'static str, value: i32 },

    #[error("CLOB_ERR_106: Order quantums must be greater than zero: {order_id}")]
    ZeroQuantums { order_id: OrderId },

    #[error("CLOB_ERR_107: Order subticks must be greater than zero: {order_id}")]
    ZeroSubticks { order_id: OrderId },

    /// Short-term order or cancel without a non-zero `GoodTilBlock`.
    #[error("CLOB_ERR_108: GoodTilBlock must be set and non-zero for short-term {order_id}")]
    MissingGoodTilBlock { order_id: OrderId },

    /// Stateful order or cancel without a non-zero `GoodTilBlockTime`.
    #[error("CLOB_ERR_109: GoodTilBlockTime must be set and non-zero for stateful {order_id}")]
    MissingGoodTilBlockTime { order_id: OrderId },

    #[error(
        "CLOB_ERR_110: GoodTilBlock {good_til_block} is before current height {current_height}: {order_id}"
    )]
    GoodTilBlockExpired {
        order_id: OrderId,
        good_til_block: u32,
        current_height: u32,
    },

    #[error(
        "CLOB_ERR_111: GoodTilBlock {good_til_block} exceeds short block window (max {max}): {order_id}"
    )]
    GoodTilBlockExceedsShortBlockWindow {
        order_id: OrderId,
        good_til_block: u32,
        max: u32,
    },

    #[error(
        "CLOB_ERR_112: GoodTilBlockTime {good_til_block_time} is not after block time {block_time}: {order_id}"
    )]
    GoodTilBlockTimeExpired {
        order_id: OrderId,
        good_til_block_time: u32,
        block_time: i64,
    },

    #[error(
        "CLOB_ERR_113: GoodTilBlockTime {good_til_block_time} exceeds stateful order time window (max {max}): {order_id}"
    )]
    GoodTilBlockTimeExceedsStatefulOrderTimeWindow {
        order_id: OrderId,
        good_til_block_time: u32,
        max: i64,
    },

    /// FILL_OR_KILL has been removed from the protocol.
    #[error("CLOB_ERR_114: Fill-or-kill orders are no longer supported: {order_id}")]
    FillOrKillRemoved { order_id: OrderId },

    #[error("CLOB_ERR_115: long-term orders cannot require immediate execution: {order_id}")]
    LongTermOrderImmediateExecution { order_id: OrderId },

    #[error("CLOB_ERR_116: Reduce-only is disabled for stateful orders: {order_id}")]
    StatefulReduceOnlyDisabled { order_id: OrderId },

    #[error("CLOB_ERR_117: Invalid conditional order ({reason}): {order_id}")]
    InvalidConditionalOrder {
        order_id: OrderId,
        reason: &'static str,
    },

    #[error("CLOB_ERR_118: Non-conditional order carries conditional fields: {order_id}")]
    ConditionalFieldsOnNonConditional { order_id: OrderId },

    #[error("CLOB_ERR_119: TWAP order is missing its parameters: {order_id}")]
    MissingTwapParameters { order_id: OrderId },

    #[error("CLOB_ERR_120: Non-TWAP order carries TWAP parameters: {order_id}")]
    TwapParametersOnNonTwap { order_id: OrderId },

    #[error("CLOB_ERR_121: TWAP interval {interval}s outside [{min}, {max}]: {order_id}")]
    TwapIntervalOutOfRange {
        order_id: OrderId,
        interval: u32,
        min: u32,
        max: u32,
    },

    #[error("CLOB_ERR_122: TWAP duration {duration}s outside [{min}, {max}]: {order_id}")]
    TwapDurationOutOfRange {
        order_id: OrderId,
        duration: u32,
        min: u32,
        max: u32,
    },

    #[error(
        "CLOB_ERR_123: TWAP duration {duration} not a multiple of interval {interval}: {order_id}"
    )]
    TwapDurationNotMultipleOfInterval {
        order_id: OrderId,
        duration: u32,
        interval: u32,
    },

    #[error(
        "CLOB_ERR_124: TWAP price tolerance {price_tolerance} must be below {max} ppm: {order_id}"
    )]
    TwapPriceToleranceTooHigh {
        order_id: OrderId,
        price_tolerance: u32,
        max: u32,
    },

    #[error("CLOB_ERR_125: Builder fee {fee_ppm} ppm outside (0, {max}]: {order_id}")]
    InvalidBuilderFeePpm {
        order_id: OrderId,
        fee_ppm: u32,
        max: u32,
    },

    #[error("CLOB_ERR_126: Batch cancel of {total} orders exceeds max batch size {max}")]
    BatchCancelTooLarge { total: u32, max: u32 },

    #[error("CLOB_ERR_127: Duplicate client id {client_id} in batch cancel for CLOB pair {clob_pair_id}")]
    BatchCancelDuplicateClientId { clob_pair_id: u32, client_id: u32 },

    #[error("CLOB_ERR_128: Invalid batch cancel: {reason}")]
    InvalidBatchCancel { reason: String },

    #[error("CLOB_ERR_129: Invalid replacement ({reason}): {order_id}")]
    InvalidReplacement {
        order_id: OrderId,
        reason: &'static str,
    },

    #[error("CLOB_ERR_130: Duplicate order: {order_id}")]
    DuplicateOrder { order_id: OrderId },

    // =================================================================
    // Match Validation Errors (2xx)
    // =================================================================
    #[error("CLOB_ERR_200: Fill amount must be greater than zero")]
    FillAmountIsZero,

    /// Maker and taker belong to the same subaccount.
    #[error("CLOB_ERR_201: Self-trade: maker and taker are both {subaccount_id}")]
    SelfTrade { subaccount_id: SubaccountId },

    #[error("CLOB_ERR_202: CLOB pair mismatch: maker {maker_clob_pair_id}, taker {taker_clob_pair_id}")]
    ClobPairMismatch {
        maker_clob_pair_id: u32,
        taker_clob_pair_id: u32,
    },

    #[error("CLOB_ERR_203: Maker and taker are not on opposite sides (maker {maker_side}, taker {taker_side})")]
    MatchSidesNotOpposite { maker_side: Side, taker_side: Side },

    #[error(
        "CLOB_ERR_204: Prices do not cross: {taker_side} taker at {taker_subticks}, maker at {maker_subticks}"
    )]
    PricesDoNotCross {
        taker_side: Side,
        taker_subticks: u64,
        maker_subticks: u64,
    },

    #[error(
        "CLOB_ERR_205: Minimum initial order quantums exceeds fill amount: fill {fill_amount}, maker remaining {maker_remaining}, taker remaining {taker_remaining}"
    )]
    FillAmountExceedsRemaining {
        fill_amount: u64,
        maker_remaining: u64,
        taker_remaining: u64,
    },

    #[error("CLOB_ERR_206: Liquidation order cannot be the maker of a match")]
    LiquidationOrderAsMaker,

    #[error("CLOB_ERR_207: IOC order cannot be the maker of a match: {order_id}")]
    IocOrderAsMaker { order_id: OrderId },

    #[error("CLOB_ERR_208: {match_kind} match has no fills")]
    EmptyMatchFills { match_kind: &'static str },

    #[error("CLOB_ERR_209: Duplicate maker order id in match fills: {order_id}")]
    DuplicateMakerOrderId { order_id: OrderId },

    #[error("CLOB_ERR_210: Liquidation total size must be greater than zero")]
    InvalidLiquidationTotalSize,

    #[error("CLOB_ERR_211: Total fill amount {total_fill} exceeds order size {total_size}")]
    TotalFillAmountExceedsOrderSize { total_fill: u64, total_size: u64 },

    #[error("CLOB_ERR_212: Deleveraging fill offsets against the liquidated subaccount {subaccount_id}")]
    SelfDeleveraging { subaccount_id: SubaccountId },

    #[error("CLOB_ERR_213: Duplicate offsetting subaccount in deleveraging fills: {subaccount_id}")]
    DuplicateDeleveragingFill { subaccount_id: SubaccountId },

    #[error("CLOB_ERR_214: Invalid order removal ({reason}): {order_id}")]
    InvalidOrderRemoval {
        order_id: OrderId,
        reason: &'static str,
    },

    // =================================================================
    // Operations Queue Invariant Errors (3xx)
    // =================================================================
    /// An operation referenced an order that never received a nonce.
    #[error("CLOB_ERR_300: No nonce assigned to order {order_id}")]
    MissingNonce { order_id: OrderId },

    #[error("CLOB_ERR_301: Order {order_id} already holds nonce {nonce}")]
    NonceAlreadyAssigned { order_id: OrderId, nonce: u64 },

    #[error("CLOB_ERR_302: Nonce {nonce} already has a queued operation")]
    NonceCollision { nonce: u64 },

    /// The exact same operation content was queued twice.
    #[error("CLOB_ERR_303: Duplicate operation {hash}")]
    DuplicateOperation { hash: OperationHash },

    #[error("CLOB_ERR_304: order placement not in operations queue: {order_id}")]
    OrderPlacementNotInQueue { order_id: OrderId },

    #[error("CLOB_ERR_305: Operations queue is sealed")]
    QueueSealed,

    #[error("CLOB_ERR_306: Operations queue must be sealed before it is drained")]
    QueueNotSealed,

    /// A nonce was released while its placement is still queued.
    #[error("CLOB_ERR_307: Order {order_id} still has a queued placement at nonce {nonce}")]
    NonceStillQueued { order_id: OrderId, nonce: u64 },

    #[error("CLOB_ERR_308: Order {order_id} already in the collateral check set")]
    DuplicateCollatCheckOrder { order_id: OrderId },

    // =================================================================
    // Configuration Errors (4xx)
    // =================================================================
    #[error("CLOB_ERR_400: {kind} rate limit {field} = {value} outside (0, {max}]")]
    RateLimitOutOfBounds {
        kind: RateLimitKind,
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("CLOB_ERR_401: Duplicate {kind} rate limit num_blocks {num_blocks}")]
    DuplicateRateLimitNumBlocks { kind: RateLimitKind, num_blocks: u32 },

    #[error("CLOB_ERR_402: {kind} equity tier limit {limit} exceeds {max}")]
    EquityTierLimitTooHigh {
        kind: EquityTierKind,
        limit: u32,
        max: u32,
    },

    #[error("CLOB_ERR_403: {kind} equity tier usd_tnc_required {usd_tnc_required} is negative")]
    NegativeEquityTierRequirement {
        kind: EquityTierKind,
        usd_tnc_required: Decimal,
    },

    #[error("CLOB_ERR_404: Duplicate {kind} equity tier usd_tnc_required {usd_tnc_required}")]
    DuplicateEquityTierRequirement {
        kind: EquityTierKind,
        usd_tnc_required: Decimal,
    },

    #[error("CLOB_ERR_405: Invalid liquidations config {field} = {value}: {reason}")]
    InvalidLiquidationsConfig {
        field: &'static str,
        value: u64,
        reason: &'static str,
    },

    // =================================================================
    // Cross-Block Event Errors (5xx)
    // =================================================================
    #[error("CLOB_ERR_500: Events recorded for block {actual}, current block is {expected}")]
    BlockHeightMismatch { expected: u32, actual: u32 },

    #[error("CLOB_ERR_501: Deprecated field {field} must be empty")]
    DeprecatedFieldPopulated { field: &'static str },

    #[error("CLOB_ERR_502: Duplicate order id in {field}: {order_id}")]
    DuplicateEventOrderId {
        field: &'static str,
        order_id: OrderId,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CLOB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("CLOB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config document, bad values, etc.).
    #[error("CLOB_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl ClobError {
    /// Which branch of the error taxonomy this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingNonce { .. }
            | Self::NonceAlreadyAssigned { .. }
            | Self::NonceCollision { .. }
            | Self::DuplicateOperation { .. }
            | Self::OrderPlacementNotInQueue { .. }
            | Self::QueueSealed
            | Self::QueueNotSealed
            | Self::NonceStillQueued { .. }
            | Self::DuplicateCollatCheckOrder { .. } => ErrorKind::QueueInvariant,
            Self::BlockHeightMismatch { .. }
            | Self::DeprecatedFieldPopulated { .. }
            | Self::DuplicateEventOrderId { .. } => ErrorKind::CrossBlock,
            Self::Internal(_) | Self::Serialization(_) | Self::Configuration(_) => {
                ErrorKind::Internal
            }
            _ => ErrorKind::Validation,
        }
    }

    /// True for errors that mean the block being assembled can no longer be
    /// trusted.
    #[must_use]
    pub fn is_unrecoverable(&self) -> bool {
        self.kind() == ErrorKind::QueueInvariant
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ClobError>;

impl From<serde_json::Error> for ClobError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_id() -> OrderId {
        OrderId::new(SubaccountId::new("owner", 0), 1, OrderKind::LongTerm, 0)
    }

    #[test]
    fn error_display_contains_prefix() {
        let err = ClobError::InvalidOrderFlag { order_id: some_id() };
        let msg = format!("{err}");
        assert!(msg.starts_with("CLOB_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn long_term_ioc_message() {
        let err = ClobError::LongTermOrderImmediateExecution { order_id: some_id() };
        assert!(format!("{err}").contains("long-term orders cannot require immediate execution"));
    }

    #[test]
    fn rate_limit_display_carries_context() {
        let err = ClobError::RateLimitOutOfBounds {
            kind: RateLimitKind::StatefulOrders,
            field: "limit",
            value: 2_000_000,
            max: 1_000_000,
        };
        let msg = format!("{err}");
        assert!(msg.contains("CLOB_ERR_400"));
        assert!(msg.contains("2000000"));
        assert!(msg.contains("1000000"));
    }

    #[test]
    fn taxonomy() {
        assert_eq!(ClobError::QueueSealed.kind(), ErrorKind::QueueInvariant);
        assert!(ClobError::NonceCollision { nonce: 3 }.is_unrecoverable());
        assert_eq!(
            ClobError::BlockHeightMismatch {
                expected: 1,
                actual: 2
            }
            .kind(),
            ErrorKind::CrossBlock
        );
        assert_eq!(ClobError::FillAmountIsZero.kind(), ErrorKind::Validation);
        assert!(!ClobError::FillAmountIsZero.is_unrecoverable());
        assert_eq!(
            ClobError::Internal("x".into()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn serde_json_errors_convert() {
        let err: ClobError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ClobError::Serialization(_)));
    }

    #[test]
    fn all_errors_have_clob_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(ClobError::QueueNotSealed),
            Box::new(ClobError::LiquidationOrderAsMaker),
            Box::new(ClobError::InvalidLiquidationTotalSize),
            Box::new(ClobError::Configuration("test".into())),
            Box::new(ClobError::DeprecatedFieldPopulated {
                field: "placed_long_term_order_ids",
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("CLOB_ERR_"),
                "Error missing CLOB_ERR_ prefix: {msg}"
            );
        }
    }
}
