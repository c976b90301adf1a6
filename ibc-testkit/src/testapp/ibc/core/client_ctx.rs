use alloc::collections::BTreeMap;

use ibc_core::client::types::error::ClientError;
use ibc_core::client::types::Height;
use ibc_core::client::{ClientExecutionContext, ClientValidationContext};
use ibc_core::handler::types::error::ContextError;
use ibc_core::host::types::identifiers::ClientId;
use tracing::debug;

use crate::testapp::ibc::clients::mock::client_state::MockClientState;
use crate::testapp::ibc::clients::mock::consensus_state::MockConsensusState;
use crate::testapp::ibc::core::types::{MockClientRecord, MockContext};

impl ClientValidationContext for MockContext {
    type ClientStateRef = MockClientState;
    type ConsensusStateRef = MockConsensusState;

    fn client_state(&self, client_id: &ClientId) -> Result<Self::ClientStateRef, ContextError> {
        match self.ibc_store.lock().clients.get(client_id) {
            Some(client_record) => Ok(client_record.client_state),
            None => Err(ClientError::MissingClientState(client_id.clone()))?,
        }
    }

    fn consensus_state(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Self::ConsensusStateRef, ContextError> {
        match self
            .ibc_store
            .lock()
            .clients
            .get(client_id)
            .and_then(|record| record.consensus_states.get(height))
        {
            Some(consensus_state) => Ok(consensus_state.clone()),
            None => Err(ClientError::MissingConsensusState {
                client_id: client_id.clone(),
                height: *height,
            })?,
        }
    }
}

impl ClientExecutionContext for MockContext {
    fn store_client_state(
        &mut self,
        client_id: ClientId,
        client_state: Self::ClientStateRef,
    ) -> Result<(), ContextError> {
        let mut ibc_store = self.ibc_store.lock();

        ibc_store
            .clients
            .entry(client_id)
            .and_modify(|record| record.client_state = client_state)
            .or_insert_with(|| MockClientRecord {
                client_state,
                consensus_states: BTreeMap::new(),
            });

        Ok(())
    }

    fn store_consensus_state(
        &mut self,
        client_id: ClientId,
        height: Height,
        consensus_state: Self::ConsensusStateRef,
    ) -> Result<(), ContextError> {
        debug!(%client_id, %height, "storing consensus state");

        let mut ibc_store = self.ibc_store.lock();

        let record = ibc_store
            .clients
            .get_mut(&client_id)
            .ok_or_else(|| ClientError::MissingClientState(client_id.clone()))?;
        record.consensus_states.insert(height, consensus_state);

        Ok(())
    }
}
