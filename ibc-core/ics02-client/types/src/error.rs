//! Defines the client error type

use displaydoc::Display;
use ibc_core_commitment_types::error::CommitmentError;
use ibc_core_host_types::error::{DecodingError, HostError};
use ibc_core_host_types::identifiers::ClientId;
use ibc_primitives::prelude::*;

use crate::height::Height;
use crate::Status;

/// Encodes all the possible client errors
#[derive(Debug, Display)]
pub enum ClientError {
    /// host error: `{0}`
    Host(HostError),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// invalid height; cannot be zero or negative
    InvalidHeight,
    /// height cannot end up zero or negative
    InvalidHeightResult,
    /// client is not active; status is `{status}`
    ClientNotActive { status: Status },
    /// missing client state for `{0}`
    MissingClientState(ClientId),
    /// client cannot prove state at `{proof_height}`; its latest height is `{latest_height}`
    InvalidProofHeight {
        latest_height: Height,
        proof_height: Height,
    },
    /// missing consensus state for `{client_id}` at `{height}`
    MissingConsensusState { client_id: ClientId, height: Height },
    /// failed commitment verification: `{0}`
    FailedCommitmentVerification(CommitmentError),
    /// client-specific error: `{description}`
    ClientSpecific { description: String },
}

impl From<CommitmentError> for ClientError {
    fn from(e: CommitmentError) -> Self {
        Self::FailedCommitmentVerification(e)
    }
}

impl From<DecodingError> for ClientError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<HostError> for ClientError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::FailedCommitmentVerification(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::Host(e) => Some(e),
            _ => None,
        }
    }
}
