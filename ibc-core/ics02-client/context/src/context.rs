use ibc_core_client_types::Height;
use ibc_core_handler_types::error::ContextError;
use ibc_core_host_types::identifiers::ClientId;

use crate::client_state::ClientStateValidation;
use crate::consensus_state::ConsensusState;

/// Defines the methods available to clients and handlers for reading client
/// state from the host.
pub trait ClientValidationContext: Sized {
    type ClientStateRef: ClientStateValidation<Self>;
    type ConsensusStateRef: ConsensusState;

    /// Returns the ClientState for the given identifier `client_id`.
    fn client_state(&self, client_id: &ClientId) -> Result<Self::ClientStateRef, ContextError>;

    /// Retrieve the consensus state for the given client ID at the specified
    /// height.
    ///
    /// Returns an error if no such state exists.
    fn consensus_state(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Self::ConsensusStateRef, ContextError>;
}

/// Defines the methods through which a client's view of its counterparty is
/// advanced. Updating a client is driven by the host, outside of the channel
/// handshake.
pub trait ClientExecutionContext: ClientValidationContext {
    fn store_client_state(
        &mut self,
        client_id: ClientId,
        client_state: Self::ClientStateRef,
    ) -> Result<(), ContextError>;

    fn store_consensus_state(
        &mut self,
        client_id: ClientId,
        height: Height,
        consensus_state: Self::ConsensusStateRef,
    ) -> Result<(), ContextError>;
}
