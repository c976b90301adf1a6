//! Implementation of a global context mock. Used in testing the channel
//! upgrade handlers against a chain whose state can be proven.

use alloc::collections::BTreeMap;
use alloc::sync::Arc;

use ibc_core::channel::flush::{on_packet_cleared, send_packet_allowed};
use ibc_core::channel::types::channel::ChannelEnd;
use ibc_core::channel::types::error::ChannelError;
use ibc_core::channel::types::commitment::PacketCommitment;
use ibc_core::channel::types::upgrade::{ErrorReceipt, Upgrade, UpgradeOutcome};
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::{CommitmentPrefix, CommitmentProofBytes};
use ibc_core::connection_types::ConnectionEnd;
use ibc_core::entrypoint::dispatch;
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::handler::types::msgs::MsgEnvelope;
use ibc_core::host::types::identifiers::{ChannelId, ClientId, ConnectionId, PortId, Sequence};
use ibc_core::host::types::path::{
    ChannelEndPath, ChannelUpgradeErrorPath, ChannelUpgradePath, CommitmentPath,
    CounterpartyUpgradePath, Path, SeqSendPath,
};
use ibc_core::host::{ExecutionContext, ValidationContext};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::proto::Protobuf;
use ibc_core::primitives::{Signer, Timestamp};
use ibc_core::router::router::Router;
use parking_lot::Mutex;
use tracing::debug;

use crate::fixtures::core::context::MockContextConfig;
use crate::hosts::{commitment_key, CommittedState, MockHost};
use crate::relayer::error::RelayerError;
use crate::testapp::ibc::clients::mock::client_state::MockClientState;
use crate::testapp::ibc::clients::mock::consensus_state::MockConsensusState;

pub const DEFAULT_BLOCK_TIME_SECS: u64 = 3;

pub const MOCK_COMMITMENT_PREFIX: &[u8] = b"mock";

pub type PortChannelIdMap<V> = BTreeMap<PortId, BTreeMap<ChannelId, V>>;

/// A light client hosted on the mock chain, tracking its counterparty.
#[derive(Clone, Debug)]
pub struct MockClientRecord {
    pub client_state: MockClientState,
    pub consensus_states: BTreeMap<Height, MockConsensusState>,
}

/// An object that stores all IBC related data.
#[derive(Clone, Debug, Default)]
pub struct MockIbcStore {
    /// The set of all clients, indexed by their id.
    pub clients: BTreeMap<ClientId, MockClientRecord>,

    /// All the connections in the store.
    pub connections: BTreeMap<ConnectionId, ConnectionEnd>,

    /// All the channels in the store.
    pub channels: PortChannelIdMap<ChannelEnd>,

    /// In-flight upgrade proposals.
    pub upgrades: PortChannelIdMap<Upgrade>,

    /// Counterparty upgrades proven during a handshake.
    pub counterparty_upgrades: PortChannelIdMap<Upgrade>,

    /// Latest error receipt of each channel.
    pub upgrade_errors: PortChannelIdMap<ErrorReceipt>,

    /// Tracks the sequence number for the next packet to be sent.
    pub next_sequence_send: PortChannelIdMap<Sequence>,

    /// Constant-size commitments to packets data fields
    pub packet_commitment: PortChannelIdMap<BTreeMap<Sequence, PacketCommitment>>,

    /// Emitted IBC events in order
    pub events: Vec<IbcEvent>,

    /// Logs of the IBC module
    pub logs: Vec<String>,
}

impl MockIbcStore {
    /// The provable part of the store, keyed as the counterparty's light
    /// client looks it up.
    pub fn committed_state(&self, prefix: &CommitmentPrefix) -> CommittedState {
        fn each<V>(
            map: &PortChannelIdMap<V>,
            mut f: impl FnMut(&PortId, &ChannelId, &V),
        ) {
            for (port_id, channels) in map {
                for (chan_id, value) in channels {
                    f(port_id, chan_id, value);
                }
            }
        }

        let mut entries = BTreeMap::new();
        let mut commit = |path: Path, value: Vec<u8>| {
            entries.insert(commitment_key(prefix, &path), value);
        };

        each(&self.channels, |port_id, chan_id, chan_end| {
            commit(
                ChannelEndPath::new(port_id, chan_id).into(),
                chan_end.clone().encode_vec(),
            )
        });
        each(&self.upgrades, |port_id, chan_id, upgrade| {
            commit(
                ChannelUpgradePath::new(port_id, chan_id).into(),
                upgrade.clone().encode_vec(),
            )
        });
        each(&self.counterparty_upgrades, |port_id, chan_id, upgrade| {
            commit(
                CounterpartyUpgradePath::new(port_id, chan_id).into(),
                upgrade.clone().encode_vec(),
            )
        });
        each(&self.upgrade_errors, |port_id, chan_id, receipt| {
            commit(
                ChannelUpgradeErrorPath::new(port_id, chan_id).into(),
                receipt.clone().encode_vec(),
            )
        });
        each(&self.next_sequence_send, |port_id, chan_id, seq| {
            commit(SeqSendPath::new(port_id, chan_id).into(), seq.to_vec())
        });
        each(&self.packet_commitment, |port_id, chan_id, commitments| {
            for (seq, commitment) in commitments {
                commit(
                    CommitmentPath::new(port_id, chan_id, *seq).into(),
                    commitment.as_ref().to_vec(),
                );
            }
        });

        CommittedState::new(entries)
    }
}

/// A context implementing the dependencies necessary for testing the
/// channel upgrade handlers.
#[derive(Debug)]
pub struct MockContext {
    /// The chain underlying this mock context.
    pub host: MockHost,

    /// Signer allowed to cancel upgrades without an error receipt.
    pub upgrade_authority: Signer,

    /// An object that stores all IBC related data.
    pub ibc_store: Arc<Mutex<MockIbcStore>>,
}

/// Returns a MockContext with bare minimum initialization: no clients, no
/// connections and no channels are present, and the chain has Height(5).
impl Default for MockContext {
    fn default() -> Self {
        MockContextConfig::builder().build()
    }
}

/// A manual clone impl is provided because the tests are oblivious to the fact that the `ibc_store`
/// is a shared ptr.
impl Clone for MockContext {
    fn clone(&self) -> Self {
        let ibc_store = {
            let ibc_store = self.ibc_store.lock().clone();
            Arc::new(Mutex::new(ibc_store))
        };

        Self {
            host: self.host.clone(),
            upgrade_authority: self.upgrade_authority.clone(),
            ibc_store,
        }
    }
}

/// Implementation of internal interface for use in testing. The methods in this interface should
/// _not_ be accessible to any handler.
impl MockContext {
    pub fn commitment_prefix_bytes(&self) -> CommitmentPrefix {
        CommitmentPrefix::try_from(MOCK_COMMITMENT_PREFIX.to_vec()).expect("Never fails")
    }

    pub fn latest_height(&self) -> Height {
        self.host.latest_height()
    }

    pub fn latest_timestamp(&self) -> Timestamp {
        self.host.latest_timestamp()
    }

    /// Commits the current store in a new block.
    pub fn advance_block(&mut self) {
        let state = self
            .ibc_store
            .lock()
            .committed_state(&self.commitment_prefix_bytes());
        self.host.advance_block(state);
    }

    /// Advances the chain until its clock reaches `timestamp`.
    pub fn advance_block_up_to_timestamp(&mut self, timestamp: Timestamp) {
        while self.latest_timestamp() < timestamp {
            self.advance_block();
        }
    }

    /// Advances the chain until it reaches `target_height`.
    pub fn advance_block_up_to(mut self, target_height: Height) -> Self {
        while self.latest_height() < target_height {
            self.advance_block();
        }
        self
    }

    /// Returns a proof of the value committed at `path` in the block at
    /// `height`, or `None` if there is no such block or value.
    pub fn get_proof(&self, height: Height, path: &Path) -> Option<CommitmentProofBytes> {
        let block = self.host.get_block(&height)?;
        let key = commitment_key(&self.commitment_prefix_bytes(), path);

        debug!(%height, %key, "generating proof");

        block.state.get(&key)?;
        Some(block.state.proof())
    }

    /// Returns a proof that nothing is committed at `path` in the block at
    /// `height`.
    pub fn get_absence_proof(&self, height: Height, path: &Path) -> Option<CommitmentProofBytes> {
        let block = self.host.get_block(&height)?;
        let key = commitment_key(&self.commitment_prefix_bytes(), path);

        match block.state.get(&key) {
            Some(_) => None,
            None => Some(block.state.proof()),
        }
    }

    pub fn with_client(self, client_id: &ClientId, record: MockClientRecord) -> Self {
        self.ibc_store
            .lock()
            .clients
            .insert(client_id.clone(), record);
        self
    }

    pub fn with_connection(self, connection_id: ConnectionId, connection_end: ConnectionEnd) -> Self {
        self.ibc_store
            .lock()
            .connections
            .insert(connection_id, connection_end);
        self
    }

    pub fn with_channel(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        channel_end: ChannelEnd,
    ) -> Self {
        let channel_end_path = ChannelEndPath::new(&port_id, &chan_id);
        self.store_channel(&channel_end_path, channel_end)
            .expect("error writing to store");
        self
    }

    pub fn with_send_sequence(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq_number: Sequence,
    ) -> Self {
        let seq_send_path = SeqSendPath::new(&port_id, &chan_id);
        self.store_next_sequence_send(&seq_send_path, seq_number)
            .expect("error writing to store");
        self
    }

    pub fn with_upgrade(mut self, port_id: PortId, chan_id: ChannelId, upgrade: Upgrade) -> Self {
        let upgrade_path = ChannelUpgradePath::new(&port_id, &chan_id);
        self.store_upgrade(&upgrade_path, upgrade)
            .expect("error writing to store");
        self
    }

    pub fn with_upgrade_error(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        error_receipt: ErrorReceipt,
    ) -> Self {
        let upgrade_error_path = ChannelUpgradeErrorPath::new(&port_id, &chan_id);
        self.store_upgrade_error_receipt(&upgrade_error_path, error_receipt)
            .expect("error writing to store");
        self
    }

    pub fn with_packet_commitment(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
        data: PacketCommitment,
    ) -> Self {
        let commitment_path = CommitmentPath::new(&port_id, &chan_id, seq);
        self.store_packet_commitment(&commitment_path, data)
            .expect("error writing to store");
        self
    }

    /// Sends a packet carrying `data` on the channel, provided the channel
    /// accepts new packets, and returns its sequence.
    pub fn send_packet(
        &mut self,
        port_id: &PortId,
        chan_id: &ChannelId,
        data: &[u8],
    ) -> Result<Sequence, ContextError> {
        send_packet_allowed(&*self, port_id, chan_id)?;

        let seq_send_path = SeqSendPath::new(port_id, chan_id);
        let sequence = self.get_next_sequence_send(&seq_send_path)?;

        let commitment_path = CommitmentPath::new(port_id, chan_id, sequence);
        self.store_packet_commitment(&commitment_path, data.to_vec().into())?;
        let next_sequence = sequence.increment().map_err(ChannelError::from)?;
        self.store_next_sequence_send(&seq_send_path, next_sequence)?;

        Ok(sequence)
    }

    /// Clears the commitment of a packet, as acknowledging or timing it out
    /// does.
    pub fn clear_packet(
        &mut self,
        port_id: &PortId,
        chan_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<UpgradeOutcome, ContextError> {
        on_packet_cleared(self, port_id, chan_id, sequence)
    }

    /// Processes a message and commits the resulting state in a new block.
    pub fn deliver(
        &mut self,
        router: &mut impl Router,
        msg: MsgEnvelope,
    ) -> Result<UpgradeOutcome, RelayerError> {
        let outcome = dispatch(self, router, msg).map_err(RelayerError::TransactionFailed)?;
        // Create a new block.
        self.advance_block();
        Ok(outcome)
    }

    pub fn channel(&self, port_id: &PortId, chan_id: &ChannelId) -> Option<ChannelEnd> {
        self.ibc_store
            .lock()
            .channels
            .get(port_id)
            .and_then(|map| map.get(chan_id))
            .cloned()
    }

    pub fn upgrade(&self, port_id: &PortId, chan_id: &ChannelId) -> Option<Upgrade> {
        self.ibc_store
            .lock()
            .upgrades
            .get(port_id)
            .and_then(|map| map.get(chan_id))
            .cloned()
    }

    pub fn counterparty_upgrade(&self, port_id: &PortId, chan_id: &ChannelId) -> Option<Upgrade> {
        self.ibc_store
            .lock()
            .counterparty_upgrades
            .get(port_id)
            .and_then(|map| map.get(chan_id))
            .cloned()
    }

    pub fn upgrade_error(&self, port_id: &PortId, chan_id: &ChannelId) -> Option<ErrorReceipt> {
        self.ibc_store
            .lock()
            .upgrade_errors
            .get(port_id)
            .and_then(|map| map.get(chan_id))
            .cloned()
    }

    pub fn get_events(&self) -> Vec<IbcEvent> {
        self.ibc_store.lock().events.clone()
    }

    pub fn get_logs(&self) -> Vec<String> {
        self.ibc_store.lock().logs.clone()
    }

    pub fn clear_events(&self) {
        let mut store = self.ibc_store.lock();
        store.events.clear();
        store.logs.clear();
    }
}
