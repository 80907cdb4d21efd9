//! Matchable orders: the two things that can sit on either side of a fill.

use serde::{Deserialize, Serialize};

use crate::{Order, OrderHash, OrderId, Side, SubaccountId, hashing::domain_digest};

/// Synthetic taker order created to close out an undercollateralized
/// position. It has no [`OrderId`] and never rests on the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationOrder {
    pub liquidated_subaccount_id: SubaccountId,
    pub perpetual_id: u32,
    pub clob_pair_id: u32,
    pub side: Side,
    pub quantums: u64,
    pub subticks: u64,
}

impl LiquidationOrder {
    #[must_use]
    pub fn order_hash(&self) -> OrderHash {
        OrderHash(domain_digest(b"clobcore:liquidation:v1:", self))
    }
}

/// Either a regular order or a liquidation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchableOrder {
    Order(Order),
    Liquidation(LiquidationOrder),
}

impl MatchableOrder {
    #[must_use]
    pub fn subaccount_id(&self) -> &SubaccountId {
        match self {
            Self::Order(o) => &o.order_id.subaccount_id,
            Self::Liquidation(l) => &l.liquidated_subaccount_id,
        }
    }

    #[must_use]
    pub fn clob_pair_id(&self) -> u32 {
        match self {
            Self::Order(o) => o.order_id.clob_pair_id,
            Self::Liquidation(l) => l.clob_pair_id,
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        match self {
            Self::Order(o) => o.side,
            Self::Liquidation(l) => l.side,
        }
    }

    #[must_use]
    pub fn subticks(&self) -> u64 {
        match self {
            Self::Order(o) => o.subticks,
            Self::Liquidation(l) => l.subticks,
        }
    }

    #[must_use]
    pub fn quantums(&self) -> u64 {
        match self {
            Self::Order(o) => o.quantums,
            Self::Liquidation(l) => l.quantums,
        }
    }

    #[must_use]
    pub fn is_liquidation(&self) -> bool {
        matches!(self, Self::Liquidation(_))
    }

    /// Only regular orders can be immediate-or-cancel.
    #[must_use]
    pub fn is_ioc(&self) -> bool {
        match self {
            Self::Order(o) => o.is_ioc(),
            Self::Liquidation(_) => false,
        }
    }

    /// The order id, if this is a regular order.
    #[must_use]
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            Self::Order(o) => Some(&o.order_id),
            Self::Liquidation(_) => None,
        }
    }

    #[must_use]
    pub fn order_hash(&self) -> OrderHash {
        match self {
            Self::Order(o) => o.order_hash(),
            Self::Liquidation(l) => l.order_hash(),
        }
    }
}

impl From<Order> for MatchableOrder {
    fn from(order: Order) -> Self {
        Self::Order(order)
    }
}

impl From<LiquidationOrder> for MatchableOrder {
    fn from(order: LiquidationOrder) -> Self {
        Self::Liquidation(order)
    }
}

/// One side of a proposed fill: the order plus how much of it is still
/// unfilled before this fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchParticipant {
    pub order: MatchableOrder,
    pub remaining_quantums: u64,
}

impl MatchParticipant {
    /// A participant with nothing filled yet.
    #[must_use]
    pub fn fresh(order: impl Into<MatchableOrder>) -> Self {
        let order = order.into();
        let remaining_quantums = order.quantums();
        Self {
            order,
            remaining_quantums,
        }
    }

    #[must_use]
    pub fn with_remaining(order: impl Into<MatchableOrder>, remaining_quantums: u64) -> Self {
        Self {
            order: order.into(),
            remaining_quantums,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn views_over_regular_order() {
        let order = fixtures::short_term_order(fixtures::alice(), 1, Side::Buy, 10, 50, 5);
        let m = MatchableOrder::from(order.clone());
        assert_eq!(m.subaccount_id(), &fixtures::alice());
        assert_eq!(m.side(), Side::Buy);
        assert_eq!(m.subticks(), 50);
        assert_eq!(m.order_id(), Some(&order.order_id));
        assert!(!m.is_liquidation());
        assert_eq!(m.order_hash(), order.order_hash());
    }

    #[test]
    fn views_over_liquidation() {
        let liq = fixtures::liquidation_order(fixtures::carl(), Side::Sell, 100, 40);
        let m = MatchableOrder::from(liq);
        assert!(m.is_liquidation());
        assert!(!m.is_ioc());
        assert_eq!(m.order_id(), None);
        assert_eq!(m.subaccount_id(), &fixtures::carl());
    }

    #[test]
    fn fresh_participant_uses_full_size() {
        let order = fixtures::short_term_order(fixtures::alice(), 1, Side::Buy, 10, 50, 5);
        assert_eq!(MatchParticipant::fresh(order).remaining_quantums, 10);
    }
}
