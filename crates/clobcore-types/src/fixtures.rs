//! Test fixtures shared across the workspace.
//!
//! Addresses are valid bech32 strings under the `dydx` prefix.

use crate::{
    BlockContext, ConditionType, GoodTilOneof, LiquidationOrder, Order, OrderId, OrderKind, Side,
    SubaccountId, TimeInForce, TwapParameters,
};

pub const ALICE_ADDRESS: &str = "dydx199tqg4wdlnu4qjlxchpd7seg454937hjrknju4";
pub const BOB_ADDRESS: &str = "dydx10fx7sy6ywd5senxae9dwytf8jxek3t2gcen2vs";
pub const CARL_ADDRESS: &str = "dydx1fjg6zp6vv8t9wvy4lps03r5l4g7tkjw9wvmh70";
pub const DAVE_ADDRESS: &str = "dydx1v88c3xv9xyv3eetdx0tvcmq7ung3dywp5upwc6";
pub const BUILDER_ADDRESS: &str = "dydx1wau5mja7j7zdavtfq9lu7ejef05hm6ffenlcsn";
pub const ROUTER_ADDRESS: &str = "dydx1mkkvp26dngu6n8rmalaxyp3gwkjuzztq5zx6tr";

/// Alice's address with the last checksum character altered.
pub const BAD_CHECKSUM_ADDRESS: &str = "dydx199tqg4wdlnu4qjlxchpd7seg454937hjrknju5";

/// Height of [`block`].
pub const BLOCK_HEIGHT: u32 = 10;
/// UNIX time of [`block`].
pub const BLOCK_TIME: u32 = 1_700_000_000;

#[must_use]
pub fn alice() -> SubaccountId {
    SubaccountId::new(ALICE_ADDRESS, 0)
}

#[must_use]
pub fn bob() -> SubaccountId {
    SubaccountId::new(BOB_ADDRESS, 0)
}

#[must_use]
pub fn carl() -> SubaccountId {
    SubaccountId::new(CARL_ADDRESS, 0)
}

#[must_use]
pub fn dave() -> SubaccountId {
    SubaccountId::new(DAVE_ADDRESS, 0)
}

/// Block at [`BLOCK_HEIGHT`] / [`BLOCK_TIME`].
#[must_use]
pub fn block() -> BlockContext {
    BlockContext::from_unix(BLOCK_HEIGHT, i64::from(BLOCK_TIME))
        .expect("fixture block time is in range")
}

#[must_use]
pub fn short_term_id(subaccount_id: SubaccountId, client_id: u32, clob_pair_id: u32) -> OrderId {
    OrderId::new(subaccount_id, client_id, OrderKind::ShortTerm, clob_pair_id)
}

#[must_use]
pub fn long_term_id(subaccount_id: SubaccountId, client_id: u32, clob_pair_id: u32) -> OrderId {
    OrderId::new(subaccount_id, client_id, OrderKind::LongTerm, clob_pair_id)
}

#[must_use]
pub fn conditional_id(subaccount_id: SubaccountId, client_id: u32, clob_pair_id: u32) -> OrderId {
    OrderId::new(subaccount_id, client_id, OrderKind::Conditional, clob_pair_id)
}

#[must_use]
pub fn twap_id(subaccount_id: SubaccountId, client_id: u32, clob_pair_id: u32) -> OrderId {
    OrderId::new(subaccount_id, client_id, OrderKind::Twap, clob_pair_id)
}

fn base_order(order_id: OrderId, side: Side, quantums: u64, subticks: u64, good_til: GoodTilOneof) -> Order {
    Order {
        order_id,
        side,
        quantums,
        subticks,
        good_til_oneof: Some(good_til),
        time_in_force: TimeInForce::Unspecified,
        reduce_only: false,
        client_metadata: 0,
        condition_type: ConditionType::Unspecified,
        conditional_order_trigger_subticks: 0,
        twap_parameters: None,
        builder_code_parameters: None,
        order_router_address: None,
    }
}

/// Short-term order on CLOB pair 0.
#[must_use]
pub fn short_term_order(
    subaccount_id: SubaccountId,
    client_id: u32,
    side: Side,
    quantums: u64,
    subticks: u64,
    good_til_block: u32,
) -> Order {
    base_order(
        short_term_id(subaccount_id, client_id, 0),
        side,
        quantums,
        subticks,
        GoodTilOneof::GoodTilBlock(good_til_block),
    )
}

/// Long-term order on CLOB pair 0.
#[must_use]
pub fn long_term_order(
    subaccount_id: SubaccountId,
    client_id: u32,
    side: Side,
    quantums: u64,
    subticks: u64,
    good_til_block_time: u32,
) -> Order {
    base_order(
        long_term_id(subaccount_id, client_id, 0),
        side,
        quantums,
        subticks,
        GoodTilOneof::GoodTilBlockTime(good_til_block_time),
    )
}

/// Stop-loss conditional order on CLOB pair 0.
#[must_use]
pub fn conditional_order(
    subaccount_id: SubaccountId,
    client_id: u32,
    side: Side,
    quantums: u64,
    subticks: u64,
    good_til_block_time: u32,
    trigger_subticks: u64,
) -> Order {
    let mut order = base_order(
        conditional_id(subaccount_id, client_id, 0),
        side,
        quantums,
        subticks,
        GoodTilOneof::GoodTilBlockTime(good_til_block_time),
    );
    order.condition_type = ConditionType::StopLoss;
    order.conditional_order_trigger_subticks = trigger_subticks;
    order
}

/// TWAP order on CLOB pair 0.
#[must_use]
pub fn twap_order(
    subaccount_id: SubaccountId,
    client_id: u32,
    side: Side,
    quantums: u64,
    subticks: u64,
    good_til_block_time: u32,
    twap_parameters: TwapParameters,
) -> Order {
    let mut order = base_order(
        twap_id(subaccount_id, client_id, 0),
        side,
        quantums,
        subticks,
        GoodTilOneof::GoodTilBlockTime(good_til_block_time),
    );
    order.twap_parameters = Some(twap_parameters);
    order
}

/// Liquidation order on CLOB pair 0, perpetual 0.
#[must_use]
pub fn liquidation_order(
    subaccount_id: SubaccountId,
    side: Side,
    quantums: u64,
    subticks: u64,
) -> LiquidationOrder {
    LiquidationOrder {
        liquidated_subaccount_id: subaccount_id,
        perpetual_id: 0,
        clob_pair_id: 0,
        side,
        quantums,
        subticks,
    }
}
