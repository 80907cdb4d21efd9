//! Integration tests for the shared types: identity, hashing, wire decoding,
//! and configuration loading.

use clobcore_types::*;

const OWNER: &str = "dydx199tqg4wdlnu4qjlxchpd7seg454937hjrknju4";

fn id(client_id: u32, order_flags: u32) -> OrderId {
    OrderId {
        subaccount_id: SubaccountId::new(OWNER, 0),
        client_id,
        order_flags,
        clob_pair_id: 0,
    }
}

fn order(order_id: OrderId, good_til: GoodTilOneof) -> Order {
    Order {
        order_id,
        side: Side::Buy,
        quantums: 10,
        subticks: 100,
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

#[test]
fn flags_partition_order_kinds() {
    let cases = [
        (0, Some(OrderKind::ShortTerm), false),
        (32, Some(OrderKind::Conditional), true),
        (64, Some(OrderKind::LongTerm), true),
        (128, Some(OrderKind::Twap), true),
        (16, None, false),
    ];
    for (flags, kind, stateful) in cases {
        let id = id(1, flags);
        assert_eq!(id.kind().ok(), kind, "flags {flags}");
        assert_eq!(id.is_stateful(), stateful, "flags {flags}");
    }
    assert!(matches!(
        id(1, 16).must_be_stateful(),
        Err(ClobError::InvalidOrderFlag { .. })
    ));
}

#[test]
fn id_lists_sort_deterministically() {
    let mut ids = vec![id(2, 0), id(1, 64), id(1, 0), id(1, 32)];
    ids.sort();
    let flags: Vec<(u32, u32)> = ids.iter().map(|i| (i.client_id, i.order_flags)).collect();
    assert_eq!(flags, [(1, 0), (1, 32), (1, 64), (2, 0)]);
}

#[test]
fn hashes_track_content() {
    let a = order(id(1, 0), GoodTilOneof::GoodTilBlock(20));
    let mut b = a.clone();
    assert_eq!(a.order_hash(), b.order_hash());
    b.quantums += 1;
    assert_ne!(a.order_hash(), b.order_hash());
    assert_eq!(a.order_hash().short().len(), 8);

    // An order and the placement wrapping it live in different hash domains.
    let op = Operation::OrderPlacement(MsgPlaceOrder::new(a.clone()));
    assert_ne!(op.hash().0, a.order_hash().0);
}

#[test]
fn wire_enums_reject_unknown_values() {
    assert_eq!(Side::try_from(2).unwrap(), Side::Sell);
    assert!(matches!(
        Side::try_from(7),
        Err(ClobError::UnrecognizedEnumValue { field: "side", value: 7 })
    ));
    assert!(TimeInForce::try_from(99).is_err());
    assert!(ConditionType::try_from(-1).is_err());
}

#[test]
fn good_til_value_follows_statefulness() {
    let short = order(id(1, 0), GoodTilOneof::GoodTilBlock(20));
    let long = order(id(1, 64), GoodTilOneof::GoodTilBlockTime(1_700_000_600));
    assert_eq!(short.good_til_block(), Some(20));
    assert_eq!(short.good_til_block_time(), None);
    assert_eq!(long.good_til_value(), 1_700_000_600);
    assert!(long.must_be_stateful_order().is_ok());
    assert!(short.must_be_stateful_order().is_err());
}

#[test]
fn empty_config_document_is_all_defaults() {
    let cfg = ClobCoreConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, ClobCoreConfig::default());
    assert_eq!(
        cfg.order_validation.short_block_window,
        constants::SHORT_BLOCK_WINDOW
    );

    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(ClobCoreConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn block_context_from_unix() {
    let block = BlockContext::from_unix(10, 1_700_000_000).unwrap();
    assert_eq!(block.height, 10);
    assert_eq!(block.unix_seconds(), 1_700_000_000);
}
