//! Defines `ClientState`, the core type to be implemented by light clients

use ibc_core_client_types::error::ClientError;
use ibc_core_client_types::{Height, Status};
use ibc_core_commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use ibc_core_host_types::identifiers::ClientId;
use ibc_core_host_types::path::Path;
use ibc_primitives::prelude::*;

use crate::context::ClientValidationContext;

/// `ClientState` methods that need no access to the host.
pub trait ClientStateCommon {
    /// Latest height the client was updated to
    fn latest_height(&self) -> Height;

    /// Validate that the client is at a sufficient height
    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError> {
        let latest_height = self.latest_height();
        if latest_height < proof_height {
            return Err(ClientError::InvalidProofHeight {
                latest_height,
                proof_height,
            });
        }
        Ok(())
    }

    /// Verifies a proof of the existence of `value` at `path` under the
    /// counterparty's commitment `root`.
    fn verify_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError>;

    /// Verifies a proof that nothing is stored at `path` under the
    /// counterparty's commitment `root`.
    fn verify_non_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
    ) -> Result<(), ClientError>;
}

/// `ClientState` methods which require access to the client's validation
/// context.
pub trait ClientStateValidation<V>: ClientStateCommon
where
    V: ClientValidationContext,
{
    /// Returns the status of the client. Only active clients may be used to
    /// verify counterparty state.
    fn status(&self, ctx: &V, client_id: &ClientId) -> Result<Status, ClientError>;
}
