use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_core_client_types::Height;
use ibc_primitives::prelude::*;
use ibc_proto::ibc::core::client::v1::Height as RawHeight;

use crate::error::ChannelError;

/// Indicates a consensus height on a chain after which a packet or an upgrade
/// attempt counts as timed out.
///
/// The protobuf encoding uses a zero height (`0-0`) to express the absence of
/// a height bound; that value maps to `Never`.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimeoutHeight {
    Never,
    At(Height),
}

impl TimeoutHeight {
    pub fn no_timeout() -> Self {
        Self::Never
    }

    /// Revision number to be used in packet commitment computation
    pub fn commitment_revision_number(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_number(),
            Self::Never => 0,
        }
    }

    /// Revision height to be used in packet commitment computation
    pub fn commitment_revision_height(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_height(),
            Self::Never => 0,
        }
    }

    /// Returns if the timeout height is set.
    pub fn is_set(&self) -> bool {
        matches!(self, TimeoutHeight::At(_))
    }

    /// Check if a height has reached the timeout height.
    pub fn has_elapsed(&self, height: &Height) -> bool {
        match self {
            Self::At(timeout_height) => height >= timeout_height,
            Self::Never => false,
        }
    }
}

impl Default for TimeoutHeight {
    fn default() -> Self {
        Self::Never
    }
}

impl TryFrom<RawHeight> for TimeoutHeight {
    type Error = ChannelError;

    fn try_from(raw_height: RawHeight) -> Result<Self, Self::Error> {
        if raw_height.revision_number == 0 && raw_height.revision_height == 0 {
            Ok(TimeoutHeight::Never)
        } else {
            let height = raw_height
                .try_into()
                .map_err(ChannelError::InvalidTimeoutHeight)?;
            Ok(TimeoutHeight::At(height))
        }
    }
}

impl TryFrom<Option<RawHeight>> for TimeoutHeight {
    type Error = ChannelError;

    fn try_from(maybe_raw_height: Option<RawHeight>) -> Result<Self, Self::Error> {
        match maybe_raw_height {
            Some(raw_height) => Self::try_from(raw_height),
            None => Ok(TimeoutHeight::Never),
        }
    }
}

/// Never encodes as the zero height, the way ibc-go encodes its non-nullable
/// height field.
impl From<TimeoutHeight> for Option<RawHeight> {
    fn from(timeout_height: TimeoutHeight) -> Self {
        let raw_height = match timeout_height {
            TimeoutHeight::At(height) => height.into(),
            TimeoutHeight::Never => RawHeight {
                revision_number: 0,
                revision_height: 0,
            },
        };

        Some(raw_height)
    }
}

impl From<Height> for TimeoutHeight {
    fn from(height: Height) -> Self {
        Self::At(height)
    }
}

impl Display for TimeoutHeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            TimeoutHeight::At(timeout_height) => write!(f, "{timeout_height}"),
            TimeoutHeight::Never => write!(f, "no timeout height"),
        }
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::{Deserialize, Serialize};

    use super::{Height, TimeoutHeight};

    #[derive(Serialize, Deserialize)]
    struct HeightHelper {
        revision_number: u64,
        revision_height: u64,
    }

    impl Serialize for TimeoutHeight {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            let helper = HeightHelper {
                revision_number: self.commitment_revision_number(),
                revision_height: self.commitment_revision_height(),
            };
            helper.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for TimeoutHeight {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let helper = HeightHelper::deserialize(deserializer)?;
            if helper.revision_height == 0 && helper.revision_number == 0 {
                return Ok(TimeoutHeight::Never);
            }
            Height::new(helper.revision_number, helper.revision_height)
                .map(TimeoutHeight::At)
                .map_err(serde::de::Error::custom)
        }
    }
}
