use ibc_core_channel_types::channel::ChannelEnd;
use ibc_core_channel_types::commitment::PacketCommitment;
use ibc_core_channel_types::upgrade::{ErrorReceipt, Upgrade};
use ibc_core_client_context::prelude::*;
use ibc_core_client_types::Height;
use ibc_core_commitment_types::commitment::CommitmentPrefix;
use ibc_core_connection_types::ConnectionEnd;
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::IbcEvent;
use ibc_core_host_types::identifiers::{ConnectionId, Sequence};
use ibc_core_host_types::path::{
    ChannelEndPath, ChannelUpgradeErrorPath, ChannelUpgradePath, CommitmentPath,
    CounterpartyUpgradePath, SeqSendPath,
};
use ibc_primitives::prelude::*;
use ibc_primitives::{Signer, Timestamp};

/// Context to be implemented by the host that provides all "read-only" methods.
///
/// Trait used for the top-level `validate` entrypoint in the `ibc-core` crate.
pub trait ValidationContext {
    type V: ClientValidationContext;

    /// Retrieve the context that implements all clients' `ValidationContext`.
    fn get_client_validation_context(&self) -> &Self::V;

    /// Returns the current height of the local chain.
    fn host_height(&self) -> Result<Height, ContextError>;

    /// Returns the current timestamp of the local chain.
    fn host_timestamp(&self) -> Result<Timestamp, ContextError>;

    /// Returns the prefix that the local chain uses in the KV store.
    fn commitment_prefix(&self) -> CommitmentPrefix;

    /// Returns the ConnectionEnd for the given identifier `conn_id`.
    fn connection_end(&self, conn_id: &ConnectionId) -> Result<ConnectionEnd, ContextError>;

    /// Returns the `ChannelEnd` for the given `port_id` and `chan_id`.
    fn channel_end(&self, channel_end_path: &ChannelEndPath) -> Result<ChannelEnd, ContextError>;

    /// Returns the in-flight upgrade proposal of a channel, if any.
    ///
    /// A missing record is not an error: most channels are not upgrading.
    fn upgrade(&self, upgrade_path: &ChannelUpgradePath) -> Result<Option<Upgrade>, ContextError>;

    /// Returns the counterparty upgrade last proven on this chain, if any.
    fn counterparty_upgrade(
        &self,
        counterparty_upgrade_path: &CounterpartyUpgradePath,
    ) -> Result<Option<Upgrade>, ContextError>;

    /// Returns the latest upgrade error receipt of a channel, if any.
    fn upgrade_error_receipt(
        &self,
        upgrade_error_path: &ChannelUpgradeErrorPath,
    ) -> Result<Option<ErrorReceipt>, ContextError>;

    /// Returns the sequence number for the next packet to be sent for the given store path
    fn get_next_sequence_send(&self, seq_send_path: &SeqSendPath)
        -> Result<Sequence, ContextError>;

    /// Returns the packet commitment for the given store path
    fn get_packet_commitment(
        &self,
        commitment_path: &CommitmentPath,
    ) -> Result<PacketCommitment, ContextError>;

    /// Returns the sequences of all packet commitments still stored for the
    /// given channel, in ascending order.
    fn packet_commitment_sequences(
        &self,
        channel_end_path: &ChannelEndPath,
    ) -> Result<Vec<Sequence>, ContextError>;

    /// Validates the `signer` field of IBC messages, which represents the address
    /// of the user/relayer that signed the given message.
    fn validate_message_signer(&self, signer: &Signer) -> Result<(), ContextError>;

    /// Returns `true` if `signer` may cancel an upgrade without presenting a
    /// counterparty error receipt.
    fn is_upgrade_authority(&self, signer: &Signer) -> bool;
}

/// Context to be implemented by the host that provides all "write-only" methods.
///
/// Trait used for the top-level `execute` and `dispatch` entrypoints in the `ibc-core` crate.
pub trait ExecutionContext: ValidationContext {
    type E: ClientExecutionContext;

    /// Retrieve the context that implements all clients' `ExecutionContext`.
    fn get_client_execution_context(&mut self) -> &mut Self::E;

    /// Stores the given channel_end at a path associated with the port_id and channel_id.
    fn store_channel(
        &mut self,
        channel_end_path: &ChannelEndPath,
        channel_end: ChannelEnd,
    ) -> Result<(), ContextError>;

    /// Stores the upgrade proposal of a channel.
    fn store_upgrade(
        &mut self,
        upgrade_path: &ChannelUpgradePath,
        upgrade: Upgrade,
    ) -> Result<(), ContextError>;

    /// Deletes the upgrade proposal of a channel. Deleting a missing record
    /// is not an error.
    fn delete_upgrade(&mut self, upgrade_path: &ChannelUpgradePath) -> Result<(), ContextError>;

    /// Stores the counterparty upgrade proven during the handshake.
    fn store_counterparty_upgrade(
        &mut self,
        counterparty_upgrade_path: &CounterpartyUpgradePath,
        upgrade: Upgrade,
    ) -> Result<(), ContextError>;

    /// Deletes the stored counterparty upgrade. Deleting a missing record is
    /// not an error.
    fn delete_counterparty_upgrade(
        &mut self,
        counterparty_upgrade_path: &CounterpartyUpgradePath,
    ) -> Result<(), ContextError>;

    /// Stores the error receipt of a failed upgrade attempt, replacing any
    /// earlier receipt of the channel.
    fn store_upgrade_error_receipt(
        &mut self,
        upgrade_error_path: &ChannelUpgradeErrorPath,
        error_receipt: ErrorReceipt,
    ) -> Result<(), ContextError>;

    /// Stores the given packet commitment at the given store path
    fn store_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), ContextError>;

    /// Deletes the packet commitment at the given store path
    fn delete_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
    ) -> Result<(), ContextError>;

    /// Stores the given `nextSequenceSend` number at the given store path
    fn store_next_sequence_send(
        &mut self,
        seq_send_path: &SeqSendPath,
        seq: Sequence,
    ) -> Result<(), ContextError>;

    /// Emit the given IBC event
    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), ContextError>;

    /// Log the given message.
    fn log_message(&mut self, message: String) -> Result<(), ContextError>;
}

/// Convenient type alias for `ClientStateRef`, providing access to client
/// validation methods within the context.
pub type ClientStateRef<Ctx> =
    <<Ctx as ValidationContext>::V as ClientValidationContext>::ClientStateRef;

/// Convenient type alias for `ConsensusStateRef`, providing access to client
/// validation methods within the context.
pub type ConsensusStateRef<Ctx> =
    <<Ctx as ValidationContext>::V as ClientValidationContext>::ConsensusStateRef;
