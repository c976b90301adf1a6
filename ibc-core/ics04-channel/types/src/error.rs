//! Defines the main channel, upgrade and packet error types

use displaydoc::Display;
use ibc_core_client_types::error::ClientError;
use ibc_core_host_types::error::{DecodingError, HostError, IdentifierError};
use ibc_core_host_types::identifiers::{ChannelId, PortId, Sequence};
use ibc_primitives::prelude::*;
use ibc_primitives::TimestampError;

use super::channel::{Counterparty, State};

/// Code reported for errors outside the channel registry, as ibc-go does for
/// unregistered errors.
pub const INTERNAL_ABCI_CODE: u32 = 1;

#[derive(Debug, Display)]
pub enum ChannelError {
    /// application module error: `{description}`
    AppModule { description: String },
    /// identifier error: `{0}`
    InvalidIdentifier(IdentifierError),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// host error: `{0}`
    Host(HostError),
    /// invalid channel state: expected `{expected}`, actual `{actual}`
    InvalidState { expected: String, actual: String },
    /// invalid channel order type: expected `{expected}`, actual `{actual}`
    InvalidOrderType { expected: String, actual: String },
    /// invalid counterparty: expected `{expected}`, actual `{actual}`
    InvalidCounterparty {
        expected: Counterparty,
        actual: Counterparty,
    },
    /// missing counterparty
    MissingCounterparty,
    /// invalid connection hops length: expected `{expected}`, actual `{actual}`
    InvalidConnectionHopsLength { expected: u64, actual: u64 },
    /// invalid channel version: `{version}`; version cannot be empty
    InvalidVersion { version: String },
    /// non-existent channel end: (`{port_id}`, `{channel_id}`)
    MissingChannel {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// missing upgrade error receipt for channel (`{port_id}`, `{channel_id}`)
    MissingUpgradeErrorReceipt {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// invalid upgrade: `{description}`
    InvalidUpgrade { description: String },
    /// invalid upgrade sequence: expected `{expected}`, actual `{actual}`
    InvalidUpgradeSequence {
        expected: Sequence,
        actual: Sequence,
    },
    /// missing upgrade for channel (`{port_id}`, `{channel_id}`)
    MissingUpgrade {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// missing counterparty upgrade for channel (`{port_id}`, `{channel_id}`)
    MissingCounterpartyUpgrade {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// incompatible counterparty upgrade: `{description}`
    IncompatibleCounterpartyUpgrade { description: String },
    /// invalid upgrade error receipt: `{description}`
    InvalidUpgradeErrorReceipt { description: String },
    /// upgrade timed out: `{description}`
    UpgradeTimeout { description: String },
    /// invalid upgrade timeout: `{description}`
    InvalidUpgradeTimeout { description: String },
    /// `{count}` in-flight packets must be cleared before the upgrade completes
    PendingInflightPackets { count: u64 },
    /// upgrade timeout failed: `{description}`
    UpgradeTimeoutFailed { description: String },
    /// upgrade timeout not reached: `{description}`
    UpgradeTimeoutNotReached { description: String },
    /// upgrade timeout elapsed: `{description}`
    UpgradeTimeoutElapsed { description: String },
    /// invalid timeout height: `{0}`
    InvalidTimeoutHeight(ClientError),
    /// invalid timeout timestamp: `{0}`
    InvalidTimeoutTimestamp(TimestampError),
    /// failed proof verification: `{0}`
    FailedProofVerification(ClientError),
    /// signer `{signer}` is not the upgrade authority
    UnauthorizedSigner { signer: String },
}

impl ChannelError {
    /// The ABCI code of this error in the ibc-go channel codespace.
    ///
    /// Error receipts carry this code instead of the error message, which may
    /// differ between nodes.
    pub fn abci_code(&self) -> u32 {
        match self {
            Self::MissingChannel { .. } => 3,
            Self::InvalidState { .. } => 5,
            Self::InvalidOrderType { .. } => 6,
            Self::InvalidCounterparty { .. } | Self::MissingCounterparty => 7,
            Self::InvalidConnectionHopsLength { .. } => 15,
            Self::InvalidVersion { .. } => 24,
            Self::MissingUpgradeErrorReceipt { .. } => 27,
            Self::InvalidUpgrade { .. } => 28,
            Self::InvalidUpgradeSequence { .. } => 29,
            Self::MissingUpgrade { .. } | Self::MissingCounterpartyUpgrade { .. } => 30,
            Self::IncompatibleCounterpartyUpgrade { .. } => 31,
            Self::InvalidUpgradeErrorReceipt { .. } => 32,
            Self::UpgradeTimeout { .. } => 34,
            Self::InvalidUpgradeTimeout { .. } => 35,
            Self::PendingInflightPackets { .. } => 36,
            Self::UpgradeTimeoutFailed { .. } => 37,
            Self::UpgradeTimeoutNotReached { .. } => 39,
            Self::UpgradeTimeoutElapsed { .. } => 40,
            Self::AppModule { .. }
            | Self::InvalidIdentifier(_)
            | Self::Decoding(_)
            | Self::Host(_)
            | Self::InvalidTimeoutHeight(_)
            | Self::InvalidTimeoutTimestamp(_)
            | Self::FailedProofVerification(_)
            | Self::UnauthorizedSigner { .. } => INTERNAL_ABCI_CODE,
        }
    }

    pub fn invalid_upgrade(description: impl ToString) -> Self {
        Self::InvalidUpgrade {
            description: description.to_string(),
        }
    }

    pub fn incompatible_upgrade(description: impl ToString) -> Self {
        Self::IncompatibleCounterpartyUpgrade {
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Display)]
pub enum PacketError {
    /// channel error: `{0}`
    Channel(ChannelError),
    /// cannot send packets on channel (`{port_id}`, `{channel_id}`) in state `{state}`
    SendNotAllowed {
        port_id: PortId,
        channel_id: ChannelId,
        state: State,
    },
    /// packet sequence `{sequence}` is above the counterparty upgrade send watermark `{watermark}`
    SequenceAboveUpgradeWatermark {
        sequence: Sequence,
        watermark: Sequence,
    },
    /// missing packet commitment for sequence `{0}`
    MissingPacketCommitment(Sequence),
    /// packet sequence cannot be 0
    ZeroPacketSequence,
}

impl From<IdentifierError> for ChannelError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

impl From<DecodingError> for ChannelError {
    fn from(err: DecodingError) -> Self {
        Self::Decoding(err)
    }
}

impl From<HostError> for ChannelError {
    fn from(err: HostError) -> Self {
        Self::Host(err)
    }
}

impl From<ChannelError> for PacketError {
    fn from(err: ChannelError) -> Self {
        Self::Channel(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PacketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Channel(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidIdentifier(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::Host(e) => Some(e),
            Self::InvalidTimeoutHeight(e) => Some(e),
            Self::InvalidTimeoutTimestamp(e) => Some(e),
            Self::FailedProofVerification(e) => Some(e),
            _ => None,
        }
    }
}
