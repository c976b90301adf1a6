//! Implementation of a global context mock. Used in testing handlers of all IBC modules.

use ibc_core::channel::types::channel::ChannelEnd;
use ibc_core::channel::types::commitment::PacketCommitment;
use ibc_core::channel::types::upgrade::{ErrorReceipt, Upgrade};
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::CommitmentPrefix;
use ibc_core::connection_types::ConnectionEnd;
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::error::HostError;
use ibc_core::host::types::identifiers::{ConnectionId, Sequence};
use ibc_core::host::types::path::{
    ChannelEndPath, ChannelUpgradeErrorPath, ChannelUpgradePath, CommitmentPath,
    CounterpartyUpgradePath, SeqSendPath,
};
use ibc_core::host::{ExecutionContext, ValidationContext};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::{Signer, Timestamp};
use tracing::{debug, trace};

use super::types::MockContext;

impl ValidationContext for MockContext {
    type V = Self;

    fn get_client_validation_context(&self) -> &Self::V {
        self
    }

    fn host_height(&self) -> Result<Height, ContextError> {
        Ok(self.latest_height())
    }

    fn host_timestamp(&self) -> Result<Timestamp, ContextError> {
        Ok(self.latest_timestamp())
    }

    fn commitment_prefix(&self) -> CommitmentPrefix {
        self.commitment_prefix_bytes()
    }

    fn connection_end(&self, cid: &ConnectionId) -> Result<ConnectionEnd, ContextError> {
        match self.ibc_store.lock().connections.get(cid) {
            Some(connection_end) => Ok(connection_end.clone()),
            None => Err(HostError::missing_data(format!("connection end for {cid}")))?,
        }
    }

    fn channel_end(&self, chan_end_path: &ChannelEndPath) -> Result<ChannelEnd, ContextError> {
        let ChannelEndPath(port_id, chan_id) = chan_end_path;
        match self
            .ibc_store
            .lock()
            .channels
            .get(port_id)
            .and_then(|map| map.get(chan_id))
        {
            Some(channel_end) => Ok(channel_end.clone()),
            None => Err(HostError::missing_data(format!(
                "channel end for ({port_id}, {chan_id})"
            )))?,
        }
    }

    fn upgrade(&self, upgrade_path: &ChannelUpgradePath) -> Result<Option<Upgrade>, ContextError> {
        let ChannelUpgradePath(port_id, chan_id) = upgrade_path;
        Ok(self
            .ibc_store
            .lock()
            .upgrades
            .get(port_id)
            .and_then(|map| map.get(chan_id))
            .cloned())
    }

    fn counterparty_upgrade(
        &self,
        counterparty_upgrade_path: &CounterpartyUpgradePath,
    ) -> Result<Option<Upgrade>, ContextError> {
        let CounterpartyUpgradePath(port_id, chan_id) = counterparty_upgrade_path;
        Ok(self
            .ibc_store
            .lock()
            .counterparty_upgrades
            .get(port_id)
            .and_then(|map| map.get(chan_id))
            .cloned())
    }

    fn upgrade_error_receipt(
        &self,
        upgrade_error_path: &ChannelUpgradeErrorPath,
    ) -> Result<Option<ErrorReceipt>, ContextError> {
        let ChannelUpgradeErrorPath(port_id, chan_id) = upgrade_error_path;
        Ok(self
            .ibc_store
            .lock()
            .upgrade_errors
            .get(port_id)
            .and_then(|map| map.get(chan_id))
            .cloned())
    }

    fn get_next_sequence_send(
        &self,
        seq_send_path: &SeqSendPath,
    ) -> Result<Sequence, ContextError> {
        let SeqSendPath(port_id, chan_id) = seq_send_path;
        match self
            .ibc_store
            .lock()
            .next_sequence_send
            .get(port_id)
            .and_then(|map| map.get(chan_id))
        {
            Some(sequence) => Ok(*sequence),
            None => Err(HostError::missing_data(format!(
                "next send sequence for ({port_id}, {chan_id})"
            )))?,
        }
    }

    fn get_packet_commitment(
        &self,
        commitment_path: &CommitmentPath,
    ) -> Result<PacketCommitment, ContextError> {
        match self
            .ibc_store
            .lock()
            .packet_commitment
            .get(&commitment_path.port_id)
            .and_then(|map| map.get(&commitment_path.channel_id))
            .and_then(|map| map.get(&commitment_path.sequence))
        {
            Some(commitment) => Ok(commitment.clone()),
            None => Err(HostError::missing_data(format!(
                "packet commitment at {commitment_path}"
            )))?,
        }
    }

    fn packet_commitment_sequences(
        &self,
        channel_end_path: &ChannelEndPath,
    ) -> Result<Vec<Sequence>, ContextError> {
        let ChannelEndPath(port_id, chan_id) = channel_end_path;
        Ok(self
            .ibc_store
            .lock()
            .packet_commitment
            .get(port_id)
            .and_then(|map| map.get(chan_id))
            .map(|commitments| commitments.keys().copied().collect())
            .unwrap_or_default())
    }

    fn validate_message_signer(&self, signer: &Signer) -> Result<(), ContextError> {
        if signer.is_empty() {
            return Err(HostError::InvalidData {
                description: "message signer cannot be empty".to_string(),
            })?;
        }
        Ok(())
    }

    fn is_upgrade_authority(&self, signer: &Signer) -> bool {
        *signer == self.upgrade_authority
    }
}

impl ExecutionContext for MockContext {
    type E = Self;

    fn get_client_execution_context(&mut self) -> &mut Self::E {
        self
    }

    fn store_channel(
        &mut self,
        channel_end_path: &ChannelEndPath,
        channel_end: ChannelEnd,
    ) -> Result<(), ContextError> {
        let ChannelEndPath(port_id, chan_id) = channel_end_path;
        trace!(%port_id, %chan_id, state = %channel_end.state(), "storing channel end");
        self.ibc_store
            .lock()
            .channels
            .entry(port_id.clone())
            .or_default()
            .insert(chan_id.clone(), channel_end);
        Ok(())
    }

    fn store_upgrade(
        &mut self,
        upgrade_path: &ChannelUpgradePath,
        upgrade: Upgrade,
    ) -> Result<(), ContextError> {
        let ChannelUpgradePath(port_id, chan_id) = upgrade_path;
        trace!(%port_id, %chan_id, %upgrade, "storing upgrade");
        self.ibc_store
            .lock()
            .upgrades
            .entry(port_id.clone())
            .or_default()
            .insert(chan_id.clone(), upgrade);
        Ok(())
    }

    fn delete_upgrade(&mut self, upgrade_path: &ChannelUpgradePath) -> Result<(), ContextError> {
        let ChannelUpgradePath(port_id, chan_id) = upgrade_path;
        trace!(%port_id, %chan_id, "deleting upgrade");
        if let Some(map) = self.ibc_store.lock().upgrades.get_mut(port_id) {
            map.remove(chan_id);
        }
        Ok(())
    }

    fn store_counterparty_upgrade(
        &mut self,
        counterparty_upgrade_path: &CounterpartyUpgradePath,
        upgrade: Upgrade,
    ) -> Result<(), ContextError> {
        let CounterpartyUpgradePath(port_id, chan_id) = counterparty_upgrade_path;
        trace!(%port_id, %chan_id, %upgrade, "storing counterparty upgrade");
        self.ibc_store
            .lock()
            .counterparty_upgrades
            .entry(port_id.clone())
            .or_default()
            .insert(chan_id.clone(), upgrade);
        Ok(())
    }

    fn delete_counterparty_upgrade(
        &mut self,
        counterparty_upgrade_path: &CounterpartyUpgradePath,
    ) -> Result<(), ContextError> {
        let CounterpartyUpgradePath(port_id, chan_id) = counterparty_upgrade_path;
        trace!(%port_id, %chan_id, "deleting counterparty upgrade");
        if let Some(map) = self.ibc_store.lock().counterparty_upgrades.get_mut(port_id) {
            map.remove(chan_id);
        }
        Ok(())
    }

    fn store_upgrade_error_receipt(
        &mut self,
        upgrade_error_path: &ChannelUpgradeErrorPath,
        error_receipt: ErrorReceipt,
    ) -> Result<(), ContextError> {
        let ChannelUpgradeErrorPath(port_id, chan_id) = upgrade_error_path;
        debug!(
            %port_id,
            %chan_id,
            sequence = %error_receipt.sequence,
            message = %error_receipt.message,
            "storing upgrade error receipt"
        );
        self.ibc_store
            .lock()
            .upgrade_errors
            .entry(port_id.clone())
            .or_default()
            .insert(chan_id.clone(), error_receipt);
        Ok(())
    }

    fn store_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), ContextError> {
        trace!(%commitment_path, "storing packet commitment");
        self.ibc_store
            .lock()
            .packet_commitment
            .entry(commitment_path.port_id.clone())
            .or_default()
            .entry(commitment_path.channel_id.clone())
            .or_default()
            .insert(commitment_path.sequence, commitment);
        Ok(())
    }

    fn delete_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
    ) -> Result<(), ContextError> {
        trace!(%commitment_path, "deleting packet commitment");
        if let Some(map) = self
            .ibc_store
            .lock()
            .packet_commitment
            .get_mut(&commitment_path.port_id)
            .and_then(|map| map.get_mut(&commitment_path.channel_id))
        {
            map.remove(&commitment_path.sequence);
        }
        Ok(())
    }

    fn store_next_sequence_send(
        &mut self,
        seq_send_path: &SeqSendPath,
        seq: Sequence,
    ) -> Result<(), ContextError> {
        let SeqSendPath(port_id, chan_id) = seq_send_path;
        self.ibc_store
            .lock()
            .next_sequence_send
            .entry(port_id.clone())
            .or_default()
            .insert(chan_id.clone(), seq);
        Ok(())
    }

    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), ContextError> {
        debug!(event_type = event.event_type(), "emitting event");
        self.ibc_store.lock().events.push(event);
        Ok(())
    }

    fn log_message(&mut self, message: String) -> Result<(), ContextError> {
        debug!(%message, "ibc log");
        self.ibc_store.lock().logs.push(message);
        Ok(())
    }
}
