//! Book-mutating operations and match records.
//!
//! [`Operation`] and [`ClobMatch`] are closed sum types: every consumer
//! matches on them exhaustively, so adding a variant is a compile error
//! everywhere it has to be handled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    ClobError, MsgCancelOrder, MsgPlaceOrder, OperationHash, OrderHash, OrderId, Result, Side,
    SubaccountId, hashing::domain_digest,
};

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// A single maker fill of a taker or liquidation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakerFill {
    pub maker_order_id: OrderId,
    pub fill_amount: u64,
}

/// A regular taker order matched against one or more resting makers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOrders {
    pub taker_order_id: OrderId,
    pub taker_order_hash: OrderHash,
    pub fills: Vec<MakerFill>,
}

/// A liquidation order matched against resting makers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPerpetualLiquidation {
    pub liquidated: SubaccountId,
    pub clob_pair_id: u32,
    pub perpetual_id: u32,
    pub total_size: u64,
    pub side: Side,
    pub fills: Vec<MakerFill>,
}

impl MatchPerpetualLiquidation {
    /// Sum of all maker fills, saturating.
    #[must_use]
    pub fn total_fill_amount(&self) -> u64 {
        self.fills
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.fill_amount))
    }
}

/// One counterparty of a deleveraging match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleveragingFill {
    pub offsetting_subaccount_id: SubaccountId,
    pub fill_amount: u64,
}

/// Forced offset of a liquidated position against counterparties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPerpetualDeleveraging {
    pub liquidated: SubaccountId,
    pub perpetual_id: u32,
    pub fills: Vec<DeleveragingFill>,
    /// Set when the market is in final settlement rather than liquidation.
    pub is_final_settlement: bool,
}

/// Any match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClobMatch {
    Orders(MatchOrders),
    PerpetualLiquidation(MatchPerpetualLiquidation),
    PerpetualDeleveraging(MatchPerpetualDeleveraging),
}

impl ClobMatch {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Orders(_) => "match_orders",
            Self::PerpetualLiquidation(_) => "match_perpetual_liquidation",
            Self::PerpetualDeleveraging(_) => "match_perpetual_deleveraging",
        }
    }
}

// ---------------------------------------------------------------------------
// Order removal
// ---------------------------------------------------------------------------

/// Why a stateful order was removed from the book by the proposer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderRemovalReason {
    Unspecified,
    Undercollateralized,
    InvalidReduceOnly,
    PostOnlyWouldCrossMakerOrder,
    InvalidSelfTrade,
    ConditionalFokCouldNotBeFullyFilled,
    ConditionalIocWouldRestOnBook,
    FullyFilled,
    ViolatesIsolatedSubaccountConstraints,
    FinalSettlement,
}

impl TryFrom<i32> for OrderRemovalReason {
    type Error = ClobError;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Self::Unspecified,
            1 => Self::Undercollateralized,
            2 => Self::InvalidReduceOnly,
            3 => Self::PostOnlyWouldCrossMakerOrder,
            4 => Self::InvalidSelfTrade,
            5 => Self::ConditionalFokCouldNotBeFullyFilled,
            6 => Self::ConditionalIocWouldRestOnBook,
            7 => Self::FullyFilled,
            8 => Self::ViolatesIsolatedSubaccountConstraints,
            9 => Self::FinalSettlement,
            _ => {
                return Err(ClobError::UnrecognizedEnumValue {
                    field: "removal_reason",
                    value,
                });
            }
        })
    }
}

/// Proposer-initiated removal of a stateful order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRemoval {
    pub order_id: OrderId,
    pub removal_reason: OrderRemovalReason,
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// One entry of a block's operations queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    OrderPlacement(MsgPlaceOrder),
    OrderCancellation(MsgCancelOrder),
    Match(ClobMatch),
    /// Re-affirms a stateful order placed in an earlier block.
    PreexistingStatefulOrder(OrderId),
    OrderRemoval(OrderRemoval),
}

impl Operation {
    /// Content hash of this operation.
    #[must_use]
    pub fn hash(&self) -> OperationHash {
        OperationHash(domain_digest(b"clobcore:operation:v1:", self))
    }

    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::OrderPlacement(_) => "order_placement",
            Self::OrderCancellation(_) => "order_cancellation",
            Self::Match(m) => m.kind_name(),
            Self::PreexistingStatefulOrder(_) => "preexisting_stateful_order",
            Self::OrderRemoval(_) => "order_removal",
        }
    }

    /// The order id a placement, cancellation, re-affirmation, or removal
    /// refers to. Matches refer to several orders and return `None`.
    #[must_use]
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            Self::OrderPlacement(msg) => Some(&msg.order.order_id),
            Self::OrderCancellation(msg) => Some(&msg.order_id),
            Self::PreexistingStatefulOrder(id) => Some(id),
            Self::OrderRemoval(removal) => Some(&removal.order_id),
            Self::Match(_) => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order_id() {
            Some(id) => write!(f, "{}({id})", self.kind_name()),
            None => write!(f, "{}", self.kind_name()),
        }
    }
}
