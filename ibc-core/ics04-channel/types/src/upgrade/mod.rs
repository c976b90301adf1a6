//! Upgrade proposals and the records kept while an upgrade is negotiated.

mod error_receipt;
mod fields;
mod timeout;

use core::fmt::{Display, Error as FmtError, Formatter};

pub use error_receipt::*;
pub use fields::*;
use ibc_core_host_types::error::DecodingError;
use ibc_core_host_types::identifiers::Sequence;
use ibc_primitives::prelude::*;
use ibc_proto::ibc::core::channel::v1::Upgrade as RawUpgrade;
use ibc_proto::Protobuf;
pub use timeout::*;

use crate::channel::{ChannelEnd, State};
use crate::error::ChannelError;

/// An upgrade attempt as recorded by one end of the channel.
///
/// `latest_sequence_send` is the highest packet sequence sent on the channel
/// when flushing started. Packets up to and including it must be cleared
/// before the upgrade can complete.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upgrade {
    pub fields: UpgradeFields,
    pub timeout: UpgradeTimeout,
    pub latest_sequence_send: Sequence,
}

impl Upgrade {
    pub fn new(
        fields: UpgradeFields,
        timeout: UpgradeTimeout,
        latest_sequence_send: Sequence,
    ) -> Self {
        Self {
            fields,
            timeout,
            latest_sequence_send,
        }
    }

    /// Field errors are returned as they are; an empty timeout is an
    /// [`ChannelError::InvalidUpgrade`].
    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        self.fields.validate_basic()?;

        if !self.timeout.is_valid() {
            return Err(ChannelError::invalid_upgrade(
                "upgrade timeout must set a height or a timestamp",
            ));
        }

        Ok(())
    }
}

impl Display for Upgrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "Upgrade {{ fields: {}, timeout: {}, latest_sequence_send: {} }}",
            self.fields, self.timeout, self.latest_sequence_send
        )
    }
}

impl Protobuf<RawUpgrade> for Upgrade {}

impl TryFrom<RawUpgrade> for Upgrade {
    type Error = ChannelError;

    fn try_from(raw: RawUpgrade) -> Result<Self, Self::Error> {
        let fields: UpgradeFields = raw
            .fields
            .ok_or_else(|| DecodingError::missing_raw_data("upgrade fields"))?
            .try_into()?;

        let timeout: UpgradeTimeout = match raw.timeout {
            Some(raw_timeout) => raw_timeout.try_into()?,
            None => UpgradeTimeout::default(),
        };

        // The wire field carries the send watermark.
        Ok(Self::new(fields, timeout, raw.next_sequence_send.into()))
    }
}

impl From<Upgrade> for RawUpgrade {
    fn from(value: Upgrade) -> Self {
        RawUpgrade {
            fields: Some(value.fields.into()),
            timeout: Some(value.timeout.into()),
            next_sequence_send: value.latest_sequence_send.value(),
        }
    }
}

/// Where a channel stands in the upgrade handshake, derived from the channel
/// state and the presence of an upgrade record.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeState {
    /// The channel is open and no upgrade was proposed.
    NotUpgrading,
    /// An upgrade was proposed; the channel is still open with its old fields.
    Init,
    /// Both ends agreed on the fields; packets sent before are being drained.
    Flushing,
    /// This end has drained its packets and waits for the counterparty.
    FlushComplete,
}

impl UpgradeState {
    pub fn from_channel(channel: &ChannelEnd, has_upgrade: bool) -> Self {
        match channel.state {
            State::Flushing => Self::Flushing,
            State::FlushComplete => Self::FlushComplete,
            _ if has_upgrade => Self::Init,
            _ => Self::NotUpgrading,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotUpgrading => "NONE",
            Self::Init => "INIT",
            Self::Flushing => "FLUSHING",
            Self::FlushComplete => "FLUSHCOMPLETE",
        }
    }
}

impl Display for UpgradeState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a handshake step that went through validation.
///
/// `Aborted` steps still changed state: the error receipt was written and the
/// channel restored.
#[derive(Debug)]
pub enum UpgradeOutcome {
    Success,
    Aborted(UpgradeError),
}

impl UpgradeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn aborted(&self) -> Option<&UpgradeError> {
        match self {
            Self::Success => None,
            Self::Aborted(e) => Some(e),
        }
    }
}
