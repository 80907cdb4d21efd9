//! Block context: the height and time validators compare expirations against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClobError, Result};

/// Height and time of the block being validated or proposed.
///
/// Supplied by the caller; the core never reads a wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    pub height: u32,
    pub time: DateTime<Utc>,
}

impl BlockContext {
    #[must_use]
    pub fn new(height: u32, time: DateTime<Utc>) -> Self {
        Self { height, time }
    }

    /// Build a context from a UNIX timestamp in seconds.
    pub fn from_unix(height: u32, unix_seconds: i64) -> Result<Self> {
        let time = DateTime::from_timestamp(unix_seconds, 0).ok_or_else(|| {
            ClobError::Internal(format!("block time {unix_seconds} out of range"))
        })?;
        Ok(Self { height, time })
    }

    #[must_use]
    pub fn unix_seconds(&self) -> i64 {
        self.time.timestamp()
    }
}
