use displaydoc::Display;
use ibc_core_host_types::identifiers::Sequence;
use ibc_primitives::prelude::*;
use ibc_proto::ibc::core::channel::v1::ErrorReceipt as RawErrorReceipt;
use ibc_proto::Protobuf;

use crate::error::ChannelError;

/// Fixed suffix of every error receipt message.
pub const RESTORE_ERROR_MESSAGE: &str = "restored channel to pre-upgrade state";

/// Proof that an upgrade attempt failed on one end of the channel.
///
/// The message only carries the ABCI code of the failure, so the bytes stored
/// under the receipt path are the same on every node.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorReceipt {
    pub sequence: Sequence,
    pub message: String,
}

impl ErrorReceipt {
    pub fn new(sequence: Sequence, abci_code: u32) -> Self {
        Self {
            sequence,
            message: format!("ABCI code: {abci_code}: {RESTORE_ERROR_MESSAGE}"),
        }
    }

    pub fn from_error(sequence: Sequence, error: &ChannelError) -> Self {
        Self::new(sequence, error.abci_code())
    }
}

impl Protobuf<RawErrorReceipt> for ErrorReceipt {}

impl TryFrom<RawErrorReceipt> for ErrorReceipt {
    type Error = ChannelError;

    fn try_from(raw: RawErrorReceipt) -> Result<Self, Self::Error> {
        Ok(Self {
            sequence: raw.sequence.into(),
            message: raw.message,
        })
    }
}

impl From<ErrorReceipt> for RawErrorReceipt {
    fn from(value: ErrorReceipt) -> Self {
        RawErrorReceipt {
            sequence: value.sequence.value(),
            message: value.message,
        }
    }
}

// A failure of the upgrade attempt with the given sequence. Never persisted as
// such: only its `ErrorReceipt` is written to the store.
#[derive(Debug, Display)]
/// upgrade attempt `{sequence}` failed: `{error}`
pub struct UpgradeError {
    sequence: Sequence,
    error: ChannelError,
}

impl UpgradeError {
    pub fn new(sequence: Sequence, error: ChannelError) -> Self {
        Self { sequence, error }
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    pub fn error(&self) -> &ChannelError {
        &self.error
    }

    pub fn into_error(self) -> ChannelError {
        self.error
    }

    pub fn error_receipt(&self) -> ErrorReceipt {
        ErrorReceipt::from_error(self.sequence, &self.error)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UpgradeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
