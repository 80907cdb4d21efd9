//! User-submitted messages: place, cancel, and batch cancel.

use serde::{Deserialize, Serialize};

use crate::{GoodTilOneof, Order, OrderId, SubaccountId};

/// Place a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgPlaceOrder {
    pub order: Order,
}

impl MsgPlaceOrder {
    #[must_use]
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Cancel a single order. The expiration bounds how long the cancel itself
/// stays effective and follows the same kind rules as an order's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCancelOrder {
    pub order_id: OrderId,
    pub good_til_oneof: Option<GoodTilOneof>,
}

impl MsgCancelOrder {
    #[must_use]
    pub fn short_term(order_id: OrderId, good_til_block: u32) -> Self {
        Self {
            order_id,
            good_til_oneof: Some(GoodTilOneof::GoodTilBlock(good_til_block)),
        }
    }

    #[must_use]
    pub fn stateful(order_id: OrderId, good_til_block_time: u32) -> Self {
        Self {
            order_id,
            good_til_oneof: Some(GoodTilOneof::GoodTilBlockTime(good_til_block_time)),
        }
    }
}

/// Client ids to cancel on one CLOB pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBatch {
    pub clob_pair_id: u32,
    pub client_ids: Vec<u32>,
}

/// Cancel many short-term orders of one subaccount at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgBatchCancel {
    pub subaccount_id: SubaccountId,
    pub short_term_cancels: Vec<OrderBatch>,
    pub good_til_block: u32,
}

impl MsgBatchCancel {
    /// Number of client ids across all groups.
    #[must_use]
    pub fn total_cancels(&self) -> usize {
        self.short_term_cancels
            .iter()
            .map(|batch| batch.client_ids.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn total_cancels_sums_groups() {
        let msg = MsgBatchCancel {
            subaccount_id: fixtures::alice(),
            short_term_cancels: vec![
                OrderBatch {
                    clob_pair_id: 0,
                    client_ids: vec![1, 2, 3],
                },
                OrderBatch {
                    clob_pair_id: 1,
                    client_ids: vec![1],
                },
            ],
            good_til_block: 10,
        };
        assert_eq!(msg.total_cancels(), 4);
    }

    #[test]
    fn cancel_constructors_set_expiration_kind() {
        let id = fixtures::short_term_id(fixtures::alice(), 1, 0);
        assert_eq!(
            MsgCancelOrder::short_term(id.clone(), 7).good_til_oneof,
            Some(GoodTilOneof::GoodTilBlock(7))
        );
        assert_eq!(
            MsgCancelOrder::stateful(id, 9).good_til_oneof,
            Some(GoodTilOneof::GoodTilBlockTime(9))
        );
    }
}
