use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_core_client_types::Height;
use ibc_primitives::prelude::*;
use ibc_primitives::Timestamp;
use ibc_proto::ibc::core::channel::v1::Timeout as RawTimeout;
use ibc_proto::Protobuf;

use crate::error::ChannelError;
use crate::timeout::{TimeoutHeight, TimeoutTimestamp};

/// The deadline of an upgrade attempt: a height bound, a timestamp bound, or
/// both. Whichever is reached first ends the attempt.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpgradeTimeout {
    pub height: TimeoutHeight,
    pub timestamp: TimeoutTimestamp,
}

impl UpgradeTimeout {
    pub fn new(height: TimeoutHeight, timestamp: TimeoutTimestamp) -> Self {
        Self { height, timestamp }
    }

    pub fn at_height(height: Height) -> Self {
        Self::new(TimeoutHeight::At(height), TimeoutTimestamp::Never)
    }

    pub fn at_timestamp(timestamp: Timestamp) -> Self {
        Self::new(TimeoutHeight::Never, TimeoutTimestamp::At(timestamp))
    }

    /// A timeout without any bound could never fire.
    pub fn is_valid(&self) -> bool {
        self.height.is_set() || self.timestamp.is_set()
    }

    /// Returns `true` once either bound is reached on the given chain.
    pub fn has_elapsed(&self, host_height: &Height, host_timestamp: &Timestamp) -> bool {
        self.height.has_elapsed(host_height) || self.timestamp.has_elapsed(host_timestamp)
    }
}

impl Display for UpgradeTimeout {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "UpgradeTimeout {{ height: {}, timestamp: {} }}",
            self.height, self.timestamp
        )
    }
}

impl Protobuf<RawTimeout> for UpgradeTimeout {}

impl TryFrom<RawTimeout> for UpgradeTimeout {
    type Error = ChannelError;

    fn try_from(raw: RawTimeout) -> Result<Self, Self::Error> {
        Ok(Self::new(
            TimeoutHeight::try_from(raw.height)?,
            TimeoutTimestamp::try_from(raw.timestamp)?,
        ))
    }
}

impl From<UpgradeTimeout> for RawTimeout {
    fn from(value: UpgradeTimeout) -> Self {
        RawTimeout {
            height: value.height.into(),
            timestamp: value.timestamp.nanoseconds(),
        }
    }
}
