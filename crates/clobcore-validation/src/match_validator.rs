//! Stateless validation of proposed matches.
//!
//! [`validate_match`] checks a single maker/taker fill. The `*_fills`
//! functions check the structure of a whole match record and are used when
//! validating a proposed operations queue.

use std::collections::HashSet;

use clobcore_types::{
    ClobError, MakerFill, MatchOrders, MatchParticipant, MatchPerpetualDeleveraging,
    MatchPerpetualLiquidation, Result, Side,
};

/// Validate one fill between `maker` and `taker`.
///
/// Rules, first failure wins:
/// 1. fill amount non-zero
/// 2. different subaccounts
/// 3. same CLOB pair
/// 4. opposite sides
/// 5. prices cross
/// 6. fill fits in both remaining sizes
/// 7. maker is not a liquidation order
/// 8. maker is not IOC
pub fn validate_match(
    maker: &MatchParticipant,
    taker: &MatchParticipant,
    fill_amount: u64,
) -> Result<()> {
    let (m, t) = (&maker.order, &taker.order);

    if fill_amount == 0 {
        return Err(ClobError::FillAmountIsZero);
    }

    if m.subaccount_id() == t.subaccount_id() {
        return Err(ClobError::SelfTrade {
            subaccount_id: m.subaccount_id().clone(),
        });
    }

    if m.clob_pair_id() != t.clob_pair_id() {
        return Err(ClobError::ClobPairMismatch {
            maker_clob_pair_id: m.clob_pair_id(),
            taker_clob_pair_id: t.clob_pair_id(),
        });
    }

    if m.side() == Side::Unspecified || t.side() != m.side().opposite() {
        return Err(ClobError::MatchSidesNotOpposite {
            maker_side: m.side(),
            taker_side: t.side(),
        });
    }

    let crosses = match t.side() {
        Side::Buy => t.subticks() >= m.subticks(),
        _ => t.subticks() <= m.subticks(),
    };
    if !crosses {
        return Err(ClobError::PricesDoNotCross {
            taker_side: t.side(),
            taker_subticks: t.subticks(),
            maker_subticks: m.subticks(),
        });
    }

    if fill_amount > maker.remaining_quantums.min(taker.remaining_quantums) {
        return Err(ClobError::FillAmountExceedsRemaining {
            fill_amount,
            maker_remaining: maker.remaining_quantums,
            taker_remaining: taker.remaining_quantums,
        });
    }

    if m.is_liquidation() {
        return Err(ClobError::LiquidationOrderAsMaker);
    }

    if m.is_ioc() {
        if let Some(order_id) = m.order_id() {
            return Err(ClobError::IocOrderAsMaker {
                order_id: order_id.clone(),
            });
        }
    }

    Ok(())
}

/// Non-empty fills, each non-zero, no maker order id twice.
fn validate_maker_fills(match_kind: &'static str, fills: &[MakerFill]) -> Result<()> {
    if fills.is_empty() {
        return Err(ClobError::EmptyMatchFills { match_kind });
    }
    let mut seen = HashSet::with_capacity(fills.len());
    for fill in fills {
        if fill.fill_amount == 0 {
            return Err(ClobError::FillAmountIsZero);
        }
        if !seen.insert(&fill.maker_order_id) {
            return Err(ClobError::DuplicateMakerOrderId {
                order_id: fill.maker_order_id.clone(),
            });
        }
    }
    Ok(())
}

/// Structural checks for an order-vs-order match record.
pub fn validate_match_orders_fills(m: &MatchOrders) -> Result<()> {
    validate_maker_fills("match_orders", &m.fills)
}

/// Structural checks for a liquidation match record.
pub fn validate_liquidation_fills(m: &MatchPerpetualLiquidation) -> Result<()> {
    if m.total_size == 0 {
        return Err(ClobError::InvalidLiquidationTotalSize);
    }
    validate_maker_fills("match_perpetual_liquidation", &m.fills)?;
    let total_fill = m.total_fill_amount();
    if total_fill > m.total_size {
        return Err(ClobError::TotalFillAmountExceedsOrderSize {
            total_fill,
            total_size: m.total_size,
        });
    }
    Ok(())
}

/// Validate a deleveraging match.
pub fn validate_deleveraging(m: &MatchPerpetualDeleveraging) -> Result<()> {
    if m.fills.is_empty() {
        return Err(ClobError::EmptyMatchFills {
            match_kind: "match_perpetual_deleveraging",
        });
    }
    let mut seen = HashSet::with_capacity(m.fills.len());
    for fill in &m.fills {
        if fill.offsetting_subaccount_id == m.liquidated {
            return Err(ClobError::SelfDeleveraging {
                subaccount_id: m.liquidated.clone(),
            });
        }
        if !seen.insert(&fill.offsetting_subaccount_id) {
            return Err(ClobError::DuplicateDeleveragingFill {
                subaccount_id: fill.offsetting_subaccount_id.clone(),
            });
        }
        if fill.fill_amount == 0 {
            return Err(ClobError::FillAmountIsZero);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clobcore_types::{
        DeleveragingFill, MatchableOrder, Order, OrderHash, TimeInForce, fixtures,
    };

    fn bid(subticks: u64) -> Order {
        fixtures::short_term_order(fixtures::alice(), 0, Side::Buy, 10, subticks, 20)
    }

    fn ask(subticks: u64) -> Order {
        fixtures::short_term_order(fixtures::bob(), 0, Side::Sell, 10, subticks, 20)
    }

    fn fresh(order: impl Into<MatchableOrder>) -> MatchParticipant {
        MatchParticipant::fresh(order)
    }

    #[test]
    fn accepts_crossing_orders() {
        validate_match(&fresh(ask(100)), &fresh(bid(100)), 10).unwrap();
        validate_match(&fresh(bid(100)), &fresh(ask(90)), 5).unwrap();
    }

    #[test]
    fn zero_fill() {
        assert!(matches!(
            validate_match(&fresh(ask(100)), &fresh(bid(100)), 0),
            Err(ClobError::FillAmountIsZero)
        ));
    }

    #[test]
    fn self_trade() {
        let mut maker = ask(100);
        maker.order_id.subaccount_id = fixtures::alice();
        assert!(matches!(
            validate_match(&fresh(maker), &fresh(bid(100)), 1),
            Err(ClobError::SelfTrade { .. })
        ));
    }

    #[test]
    fn same_owner_different_number_is_not_self_trade() {
        let mut maker = ask(100);
        maker.order_id.subaccount_id = clobcore_types::SubaccountId::new(fixtures::ALICE_ADDRESS, 1);
        validate_match(&fresh(maker), &fresh(bid(100)), 1).unwrap();
    }

    #[test]
    fn clob_pair_mismatch() {
        let mut maker = ask(100);
        maker.order_id.clob_pair_id = 1;
        assert!(matches!(
            validate_match(&fresh(maker), &fresh(bid(100)), 1),
            Err(ClobError::ClobPairMismatch {
                maker_clob_pair_id: 1,
                taker_clob_pair_id: 0
            })
        ));
    }

    #[test]
    fn same_side() {
        let mut maker = ask(100);
        maker.side = Side::Buy;
        assert!(matches!(
            validate_match(&fresh(maker), &fresh(bid(100)), 1),
            Err(ClobError::MatchSidesNotOpposite { .. })
        ));

        let mut maker = ask(100);
        maker.side = Side::Unspecified;
        let mut taker = bid(100);
        taker.side = Side::Unspecified;
        assert!(matches!(
            validate_match(&fresh(maker), &fresh(taker), 1),
            Err(ClobError::MatchSidesNotOpposite { .. })
        ));
        let mut taker = bid(100);
        taker.side = Side::Unspecified;
        assert!(matches!(
            validate_match(&fresh(ask(100)), &fresh(taker), 1),
            Err(ClobError::MatchSidesNotOpposite { .. })
        ));
    }

    #[test]
    fn prices_must_cross() {
        assert!(matches!(
            validate_match(&fresh(ask(101)), &fresh(bid(100)), 1),
            Err(ClobError::PricesDoNotCross { .. })
        ));
        assert!(matches!(
            validate_match(&fresh(bid(99)), &fresh(ask(100)), 1),
            Err(ClobError::PricesDoNotCross { .. })
        ));
    }

    #[test]
    fn fill_bounded_by_remaining() {
        let maker = MatchParticipant::with_remaining(ask(100), 3);
        let err = validate_match(&maker, &fresh(bid(100)), 4).unwrap_err();
        assert!(
            err.to_string()
                .contains("Minimum initial order quantums exceeds fill amount")
        );
        validate_match(&maker, &fresh(bid(100)), 3).unwrap();

        let taker = MatchParticipant::with_remaining(bid(100), 2);
        assert!(matches!(
            validate_match(&fresh(ask(100)), &taker, 3),
            Err(ClobError::FillAmountExceedsRemaining { .. })
        ));
    }

    #[test]
    fn liquidation_maker_always_rejected() {
        let taker = fresh(bid(100));
        for (subticks, fill) in [(100, 1), (50, 10), (1, 5)] {
            let liq = fixtures::liquidation_order(fixtures::carl(), Side::Sell, 10, subticks);
            assert!(validate_match(&fresh(liq), &taker, fill).is_err());
        }
        let liq = fixtures::liquidation_order(fixtures::carl(), Side::Sell, 10, 100);
        assert!(matches!(
            validate_match(&fresh(liq), &taker, 1),
            Err(ClobError::LiquidationOrderAsMaker)
        ));
    }

    #[test]
    fn liquidation_taker_allowed() {
        let liq = fixtures::liquidation_order(fixtures::carl(), Side::Buy, 10, 100);
        validate_match(&fresh(ask(100)), &fresh(liq), 10).unwrap();
    }

    #[test]
    fn ioc_maker_rejected() {
        let mut maker = ask(100);
        maker.time_in_force = TimeInForce::Ioc;
        assert!(matches!(
            validate_match(&fresh(maker), &fresh(bid(100)), 1),
            Err(ClobError::IocOrderAsMaker { .. })
        ));
        let mut taker = bid(100);
        taker.time_in_force = TimeInForce::Ioc;
        validate_match(&fresh(ask(100)), &fresh(taker), 1).unwrap();
    }

    fn maker_fill(order: &Order, fill_amount: u64) -> MakerFill {
        MakerFill {
            maker_order_id: order.order_id.clone(),
            fill_amount,
        }
    }

    fn liquidation(total_size: u64, fills: Vec<MakerFill>) -> MatchPerpetualLiquidation {
        MatchPerpetualLiquidation {
            liquidated: fixtures::carl(),
            clob_pair_id: 0,
            perpetual_id: 0,
            total_size,
            side: Side::Buy,
            fills,
        }
    }

    #[test]
    fn liquidation_structure() {
        let a = ask(100);
        let mut b = ask(100);
        b.order_id.subaccount_id = fixtures::dave();

        validate_liquidation_fills(&liquidation(10, vec![maker_fill(&a, 4), maker_fill(&b, 6)]))
            .unwrap();
        assert!(matches!(
            validate_liquidation_fills(&liquidation(0, vec![maker_fill(&a, 1)])),
            Err(ClobError::InvalidLiquidationTotalSize)
        ));
        assert!(matches!(
            validate_liquidation_fills(&liquidation(10, vec![])),
            Err(ClobError::EmptyMatchFills { .. })
        ));
        assert!(matches!(
            validate_liquidation_fills(&liquidation(10, vec![maker_fill(&a, 0)])),
            Err(ClobError::FillAmountIsZero)
        ));
        assert!(matches!(
            validate_liquidation_fills(&liquidation(10, vec![maker_fill(&a, 1), maker_fill(&a, 1)])),
            Err(ClobError::DuplicateMakerOrderId { .. })
        ));
        assert!(matches!(
            validate_liquidation_fills(&liquidation(10, vec![maker_fill(&a, 6), maker_fill(&b, 6)])),
            Err(ClobError::TotalFillAmountExceedsOrderSize {
                total_fill: 12,
                total_size: 10
            })
        ));
    }

    #[test]
    fn match_orders_structure() {
        let taker = bid(100);
        let a = ask(100);
        let mk = |fills| MatchOrders {
            taker_order_id: taker.order_id.clone(),
            taker_order_hash: OrderHash([0; 32]),
            fills,
        };
        validate_match_orders_fills(&mk(vec![maker_fill(&a, 1)])).unwrap();
        assert!(matches!(
            validate_match_orders_fills(&mk(vec![])),
            Err(ClobError::EmptyMatchFills {
                match_kind: "match_orders"
            })
        ));
        assert!(matches!(
            validate_match_orders_fills(&mk(vec![maker_fill(&a, 0)])),
            Err(ClobError::FillAmountIsZero)
        ));
        assert!(matches!(
            validate_match_orders_fills(&mk(vec![maker_fill(&a, 1), maker_fill(&a, 2)])),
            Err(ClobError::DuplicateMakerOrderId { .. })
        ));
    }

    fn deleveraging(fills: Vec<(clobcore_types::SubaccountId, u64)>) -> MatchPerpetualDeleveraging {
        MatchPerpetualDeleveraging {
            liquidated: fixtures::carl(),
            perpetual_id: 0,
            fills: fills
                .into_iter()
                .map(|(offsetting_subaccount_id, fill_amount)| DeleveragingFill {
                    offsetting_subaccount_id,
                    fill_amount,
                })
                .collect(),
            is_final_settlement: false,
        }
    }

    #[test]
    fn deleveraging_rules() {
        validate_deleveraging(&deleveraging(vec![(fixtures::alice(), 5), (fixtures::bob(), 5)]))
            .unwrap();
        assert!(matches!(
            validate_deleveraging(&deleveraging(vec![])),
            Err(ClobError::EmptyMatchFills { .. })
        ));
        assert!(matches!(
            validate_deleveraging(&deleveraging(vec![(fixtures::carl(), 5)])),
            Err(ClobError::SelfDeleveraging { .. })
        ));
        assert!(matches!(
            validate_deleveraging(&deleveraging(vec![(fixtures::alice(), 5), (fixtures::alice(), 1)])),
            Err(ClobError::DuplicateDeleveragingFill { .. })
        ));
        assert!(matches!(
            validate_deleveraging(&deleveraging(vec![(fixtures::alice(), 0)])),
            Err(ClobError::FillAmountIsZero)
        ));
    }
}
