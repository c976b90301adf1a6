use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_primitives::prelude::*;
use ibc_primitives::Timestamp;

use crate::error::ChannelError;

/// Indicates a timestamp on a chain after which a packet or an upgrade attempt
/// counts as timed out.
///
/// The IBC protocol represents timestamps as u64 Unix timestamps in
/// nanoseconds. A protocol value of 0 indicates that the timestamp is not set,
/// which maps to the explicit `Never` variant.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TimeoutTimestamp {
    Never,
    At(Timestamp),
}

impl TimeoutTimestamp {
    /// Creates a new timeout timestamp from a given nanosecond value.
    pub fn from_nanoseconds(nanoseconds: u64) -> Result<Self, ChannelError> {
        Self::try_from(nanoseconds)
    }

    /// Returns the timestamp in nanoseconds, where 0 indicates the absence
    /// of a timeout.
    pub fn nanoseconds(&self) -> u64 {
        match self {
            Self::At(timestamp) => timestamp.nanoseconds(),
            Self::Never => 0,
        }
    }

    /// Returns if the timeout timestamp is set.
    pub fn is_set(&self) -> bool {
        matches!(self, TimeoutTimestamp::At(_))
    }

    /// Returns a timeout timestamp that never expires.
    pub fn no_timeout() -> Self {
        Self::Never
    }

    /// Check if a timestamp has reached the timeout timestamp.
    pub fn has_elapsed(&self, timestamp: &Timestamp) -> bool {
        match self {
            Self::At(timeout_timestamp) => timestamp >= timeout_timestamp,
            Self::Never => false,
        }
    }
}

impl Default for TimeoutTimestamp {
    fn default() -> Self {
        Self::Never
    }
}

impl TryFrom<u64> for TimeoutTimestamp {
    type Error = ChannelError;

    fn try_from(timestamp: u64) -> Result<Self, Self::Error> {
        let timeout_timestamp = if timestamp == 0 {
            TimeoutTimestamp::Never
        } else {
            let timestamp = Timestamp::from_nanoseconds(timestamp)
                .map_err(ChannelError::InvalidTimeoutTimestamp)?;
            TimeoutTimestamp::At(timestamp)
        };

        Ok(timeout_timestamp)
    }
}

impl From<Timestamp> for TimeoutTimestamp {
    fn from(timestamp: Timestamp) -> Self {
        Self::At(timestamp)
    }
}

impl Display for TimeoutTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            TimeoutTimestamp::At(timeout_timestamp) => write!(f, "{timeout_timestamp}"),
            TimeoutTimestamp::Never => write!(f, "no timeout timestamp"),
        }
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::{Deserialize, Serialize};

    use super::TimeoutTimestamp;

    impl Serialize for TimeoutTimestamp {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.nanoseconds().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for TimeoutTimestamp {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let timestamp = u64::deserialize(deserializer)?;
            TimeoutTimestamp::try_from(timestamp).map_err(serde::de::Error::custom)
        }
    }
}
