use ibc_core::client::client_state::{ClientStateCommon, ClientStateValidation};
use ibc_core::client::types::error::ClientError;
use ibc_core::client::types::{Height, Status};
use ibc_core::client::ClientValidationContext;
use ibc_core::commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use ibc_core::host::types::identifiers::ClientId;
use ibc_core::host::types::path::Path;
use ibc_core::primitives::prelude::*;
use tracing::trace;

use crate::hosts::{commitment_key, CommittedState};

pub const MOCK_CLIENT_TYPE: &str = "9999-mock";

/// A light client of a mock chain.
///
/// A proof is the full state the counterparty committed in some block. It is
/// accepted only if it hashes to the root of the trusted consensus state at
/// the proof height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockClientState {
    pub latest_height: Height,
    pub frozen: bool,
}

impl MockClientState {
    pub fn new(latest_height: Height) -> Self {
        Self {
            latest_height,
            frozen: false,
        }
    }

    pub fn frozen(self) -> Self {
        Self {
            frozen: true,
            ..self
        }
    }

    pub fn with_latest_height(self, latest_height: Height) -> Self {
        Self {
            latest_height,
            ..self
        }
    }

    fn committed_state(
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
    ) -> Result<CommittedState, ClientError> {
        let state =
            CommittedState::decode(proof.as_ref()).ok_or_else(|| ClientError::ClientSpecific {
                description: "malformed mock proof".to_string(),
            })?;

        if state.root() != *root {
            return Err(ClientError::ClientSpecific {
                description: "mock proof does not match the commitment root".to_string(),
            });
        }

        Ok(state)
    }
}

impl ClientStateCommon for MockClientState {
    fn latest_height(&self) -> Height {
        self.latest_height
    }

    fn verify_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError> {
        let state = Self::committed_state(proof, root)?;
        let key = commitment_key(prefix, &path);

        trace!(%key, "verifying membership");

        match state.get(&key) {
            Some(committed) if *committed == value => Ok(()),
            Some(_) => Err(ClientError::ClientSpecific {
                description: format!("value committed at `{key}` differs"),
            }),
            None => Err(ClientError::ClientSpecific {
                description: format!("nothing committed at `{key}`"),
            }),
        }
    }

    fn verify_non_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
    ) -> Result<(), ClientError> {
        let state = Self::committed_state(proof, root)?;
        let key = commitment_key(prefix, &path);

        trace!(%key, "verifying non-membership");

        match state.get(&key) {
            None => Ok(()),
            Some(_) => Err(ClientError::ClientSpecific {
                description: format!("a value is committed at `{key}`"),
            }),
        }
    }
}

impl<V> ClientStateValidation<V> for MockClientState
where
    V: ClientValidationContext,
{
    fn status(&self, _ctx: &V, _client_id: &ClientId) -> Result<Status, ClientError> {
        if self.frozen {
            Ok(Status::Frozen)
        } else {
            Ok(Status::Active)
        }
    }
}
