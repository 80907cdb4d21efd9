//! Identifiers and order classification.
//!
//! An [`OrderId`] is a value type: two ids are the same order iff every field
//! matches. The `order_flags` field partitions orders into four disjoint
//! kinds (see [`OrderKind`]); every other component asks the id, never the
//! raw flags, what kind of order it is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ClobError, Result, constants};

// ---------------------------------------------------------------------------
// SubaccountId
// ---------------------------------------------------------------------------

/// An account owner address plus a subaccount number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SubaccountId {
    pub owner: String,
    pub number: u32,
}

impl SubaccountId {
    #[must_use]
    pub fn new(owner: impl Into<String>, number: u32) -> Self {
        Self {
            owner: owner.into(),
            number,
        }
    }
}

impl fmt::Display for SubaccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.number)
    }
}

// ---------------------------------------------------------------------------
// OrderKind
// ---------------------------------------------------------------------------

/// The four disjoint kinds of order, derived from `OrderId::order_flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderKind {
    ShortTerm,
    LongTerm,
    Conditional,
    Twap,
}

impl OrderKind {
    /// Classify raw order flags. Returns `None` for unrecognized values.
    #[must_use]
    pub fn from_flags(flags: u32) -> Option<Self> {
        match flags {
            constants::ORDER_FLAGS_SHORT_TERM => Some(Self::ShortTerm),
            constants::ORDER_FLAGS_LONG_TERM => Some(Self::LongTerm),
            constants::ORDER_FLAGS_CONDITIONAL => Some(Self::Conditional),
            constants::ORDER_FLAGS_TWAP => Some(Self::Twap),
            _ => None,
        }
    }

    #[must_use]
    pub fn flags(self) -> u32 {
        match self {
            Self::ShortTerm => constants::ORDER_FLAGS_SHORT_TERM,
            Self::LongTerm => constants::ORDER_FLAGS_LONG_TERM,
            Self::Conditional => constants::ORDER_FLAGS_CONDITIONAL,
            Self::Twap => constants::ORDER_FLAGS_TWAP,
        }
    }

    /// Long-term, conditional, and TWAP orders are persisted in chain state.
    #[must_use]
    pub fn is_stateful(self) -> bool {
        !matches!(self, Self::ShortTerm)
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortTerm => write!(f, "SHORT_TERM"),
            Self::LongTerm => write!(f, "LONG_TERM"),
            Self::Conditional => write!(f, "CONDITIONAL"),
            Self::Twap => write!(f, "TWAP"),
        }
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Canonical order identity.
///
/// Field order matters: the derived `Ord` sorts by subaccount, then client
/// id, then flags, then CLOB pair, which is the order used whenever a list
/// of ids has to be deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId {
    pub subaccount_id: SubaccountId,
    pub client_id: u32,
    pub order_flags: u32,
    pub clob_pair_id: u32,
}

impl OrderId {
    #[must_use]
    pub fn new(subaccount_id: SubaccountId, client_id: u32, kind: OrderKind, clob_pair_id: u32) -> Self {
        Self {
            subaccount_id,
            client_id,
            order_flags: kind.flags(),
            clob_pair_id,
        }
    }

    /// Classify this id.
    ///
    /// # Errors
    /// [`ClobError::InvalidOrderFlag`] if `order_flags` is not a known kind.
    pub fn kind(&self) -> Result<OrderKind> {
        OrderKind::from_flags(self.order_flags).ok_or_else(|| ClobError::InvalidOrderFlag {
            order_id: self.clone(),
        })
    }

    #[must_use]
    pub fn is_short_term(&self) -> bool {
        self.order_flags == constants::ORDER_FLAGS_SHORT_TERM
    }

    #[must_use]
    pub fn is_long_term(&self) -> bool {
        self.order_flags == constants::ORDER_FLAGS_LONG_TERM
    }

    #[must_use]
    pub fn is_conditional(&self) -> bool {
        self.order_flags == constants::ORDER_FLAGS_CONDITIONAL
    }

    #[must_use]
    pub fn is_twap(&self) -> bool {
        self.order_flags == constants::ORDER_FLAGS_TWAP
    }

    /// True for long-term, conditional, and TWAP ids. Unrecognized flags are
    /// neither short-term nor stateful.
    #[must_use]
    pub fn is_stateful(&self) -> bool {
        self.is_long_term() || self.is_conditional() || self.is_twap()
    }

    /// Fails unless this is a short-term order id.
    pub fn must_be_short_term(&self) -> Result<()> {
        match self.kind()? {
            OrderKind::ShortTerm => Ok(()),
            actual => Err(ClobError::OrderKindMismatch {
                order_id: self.clone(),
                expected: "short-term",
                actual,
            }),
        }
    }

    /// Fails unless this is a stateful order id.
    pub fn must_be_stateful(&self) -> Result<()> {
        match self.kind()? {
            OrderKind::ShortTerm => Err(ClobError::OrderKindMismatch {
                order_id: self.clone(),
                expected: "stateful",
                actual: OrderKind::ShortTerm,
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:client={}:flags={}:clob={}",
            self.subaccount_id, self.client_id, self.order_flags, self.clob_pair_id
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
