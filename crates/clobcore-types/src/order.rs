//! Order model.
//!
//! Enum fields arrive on the wire as integers. Decoding goes through the
//! `TryFrom<i32>` impls below, so an unrecognized side, time-in-force, or
//! condition type is rejected before an [`Order`] value exists. The
//! `Unspecified` variants are recognized values that validators reject where
//! they are not allowed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ClobError, OrderHash, OrderId, Result, hashing::domain_digest};

/// Which side of the book this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Side {
    Unspecified,
    Buy,
    Sell,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
            Self::Unspecified => Self::Unspecified,
        }
    }
}

impl TryFrom<i32> for Side {
    type Error = ClobError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Buy),
            2 => Ok(Self::Sell),
            _ => Err(ClobError::UnrecognizedEnumValue {
                field: "side",
                value,
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => write!(f, "UNSPECIFIED"),
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order time-in-force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Rests on the book until filled, cancelled, or expired.
    Unspecified,
    /// Immediate-or-cancel: any unfilled remainder is removed.
    Ioc,
    /// Only ever a maker; removed if it would cross.
    PostOnly,
    /// Removed feature. Recognized on the wire, always rejected.
    FillOrKill,
}

impl TryFrom<i32> for TimeInForce {
    type Error = ClobError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Ioc),
            2 => Ok(Self::PostOnly),
            3 => Ok(Self::FillOrKill),
            _ => Err(ClobError::UnrecognizedEnumValue {
                field: "time_in_force",
                value,
            }),
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => write!(f, "UNSPECIFIED"),
            Self::Ioc => write!(f, "IOC"),
            Self::PostOnly => write!(f, "POST_ONLY"),
            Self::FillOrKill => write!(f, "FILL_OR_KILL"),
        }
    }
}

/// Trigger condition of a conditional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionType {
    Unspecified,
    StopLoss,
    TakeProfit,
}

impl TryFrom<i32> for ConditionType {
    type Error = ClobError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::StopLoss),
            2 => Ok(Self::TakeProfit),
            _ => Err(ClobError::UnrecognizedEnumValue {
                field: "condition_type",
                value,
            }),
        }
    }
}

/// Order expiration. Short-term orders use a block height, stateful orders a
/// UNIX timestamp in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoodTilOneof {
    GoodTilBlock(u32),
    GoodTilBlockTime(u32),
}

impl GoodTilOneof {
    #[must_use]
    pub fn value(self) -> u32 {
        match self {
            Self::GoodTilBlock(v) | Self::GoodTilBlockTime(v) => v,
        }
    }
}

/// Schedule of a TWAP order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TwapParameters {
    /// Seconds between slices.
    pub interval: u32,
    /// Total seconds over which the order is sliced.
    pub duration: u32,
    /// Allowed slice price deviation, parts per million.
    pub price_tolerance: u32,
}

/// Fee attribution to a third-party order-flow builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuilderCodeParameters {
    pub builder_address: String,
    pub fee_ppm: u32,
}

/// A user order as carried by a place-order message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub side: Side,
    /// Base quantity in quantums.
    pub quantums: u64,
    /// Limit price in subticks.
    pub subticks: u64,
    pub good_til_oneof: Option<GoodTilOneof>,
    pub time_in_force: TimeInForce,
    pub reduce_only: bool,
    pub client_metadata: u32,
    pub condition_type: ConditionType,
    pub conditional_order_trigger_subticks: u64,
    pub twap_parameters: Option<TwapParameters>,
    pub builder_code_parameters: Option<BuilderCodeParameters>,
    pub order_router_address: Option<String>,
}

impl Order {
    /// Content hash of the full order.
    #[must_use]
    pub fn order_hash(&self) -> OrderHash {
        OrderHash(domain_digest(b"clobcore:order:v1:", self))
    }

    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    #[must_use]
    pub fn is_ioc(&self) -> bool {
        self.time_in_force == TimeInForce::Ioc
    }

    #[must_use]
    pub fn good_til_block(&self) -> Option<u32> {
        match self.good_til_oneof {
            Some(GoodTilOneof::GoodTilBlock(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn good_til_block_time(&self) -> Option<u32> {
        match self.good_til_oneof {
            Some(GoodTilOneof::GoodTilBlockTime(v)) => Some(v),
            _ => None,
        }
    }

    /// Expiration value regardless of kind, `0` when unset.
    #[must_use]
    pub fn good_til_value(&self) -> u32 {
        self.good_til_oneof.map_or(0, GoodTilOneof::value)
    }

    pub fn must_be_stateful_order(&self) -> Result<()> {
        self.order_id.must_be_stateful()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}@{} good_til={} tif={}",
            self.order_id,
            self.side,
            self.quantums,
            self.subticks,
            self.good_til_value(),
            self.time_in_force
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn side_decoding() {
        assert_eq!(Side::try_from(1).unwrap(), Side::Buy);
        assert_eq!(Side::try_from(2).unwrap(), Side::Sell);
        assert_eq!(Side::try_from(0).unwrap(), Side::Unspecified);
        let err = Side::try_from(999).unwrap_err();
        assert!(matches!(
            err,
            ClobError::UnrecognizedEnumValue {
                field: "side",
                value: 999
            }
        ));
    }

    #[test]
    fn time_in_force_decoding() {
        assert_eq!(TimeInForce::try_from(3).unwrap(), TimeInForce::FillOrKill);
        assert!(TimeInForce::try_from(4).is_err());
        assert!(ConditionType::try_from(-1).is_err());
    }

    #[test]
    fn side_display_and_opposite() {
        assert_eq!(format!("{}", Side::Buy), "BUY");
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Unspecified.opposite(), Side::Unspecified);
    }

    #[test]
    fn order_hash_changes_with_content() {
        let a = fixtures::short_term_order(fixtures::alice(), 0, Side::Buy, 10, 100, 20);
        let mut b = a.clone();
        assert_eq!(a.order_hash(), b.order_hash());
        b.quantums = 11;
        assert_ne!(a.order_hash(), b.order_hash());
    }

    #[test]
    fn expiration_accessors() {
        let st = fixtures::short_term_order(fixtures::alice(), 0, Side::Buy, 10, 100, 20);
        assert_eq!(st.good_til_block(), Some(20));
        assert_eq!(st.good_til_block_time(), None);
        let lt = fixtures::long_term_order(fixtures::bob(), 0, Side::Sell, 10, 100, 1_000);
        assert_eq!(lt.good_til_block_time(), Some(1_000));
        assert_eq!(lt.good_til_value(), 1_000);
    }

    #[test]
    fn order_serde_roundtrip() {
        let order = fixtures::long_term_order(fixtures::bob(), 3, Side::Sell, 10, 100, 1_000);
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
        assert_eq!(order.order_hash(), back.order_hash());
    }
}
