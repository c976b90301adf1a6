use ibc_core_client_types::Height;
use ibc_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_core_host_types::identifiers::{ChannelId, PortId};
use ibc_primitives::prelude::*;
use ibc_primitives::Signer;

use crate::channel::State;
use crate::error::ChannelError;
use crate::upgrade::Upgrade;

///
/// Message definition for the fourth step in the channel upgrade handshake
/// (the `ChanUpgradeConfirm` datagram).
/// Per our convention, this message is sent to chain B.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelUpgradeConfirm {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    /// Either `Flushing` or `FlushComplete`
    pub counterparty_channel_state: State,
    pub counterparty_upgrade: Upgrade,
    pub proof_chan_end_on_a: CommitmentProofBytes,
    pub proof_upgrade_on_a: CommitmentProofBytes,
    pub proof_height_on_a: Height,
    pub signer: Signer,
}

impl MsgChannelUpgradeConfirm {
    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        match self.counterparty_channel_state {
            State::Flushing | State::FlushComplete => Ok(()),
            state => Err(ChannelError::InvalidState {
                expected: "FLUSHING or FLUSHCOMPLETE".to_string(),
                actual: state.to_string(),
            }),
        }
    }
}
