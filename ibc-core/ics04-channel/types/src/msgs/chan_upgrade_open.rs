use ibc_core_client_types::Height;
use ibc_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_core_host_types::identifiers::{ChannelId, PortId, Sequence};
use ibc_primitives::prelude::*;
use ibc_primitives::Signer;

use crate::channel::State;
use crate::error::ChannelError;

///
/// Message definition for the last step in the channel upgrade handshake
/// (the `ChanUpgradeOpen` datagram), which commits the upgraded fields on a
/// flush-complete channel end. It may be sent to either chain.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelUpgradeOpen {
    pub port_id: PortId,
    pub chan_id: ChannelId,
    /// Either `FlushComplete` or `Open`
    pub counterparty_channel_state: State,
    pub counterparty_upgrade_sequence: Sequence,
    pub proof_counterparty_chan_end: CommitmentProofBytes,
    pub proof_height: Height,
    pub signer: Signer,
}

impl MsgChannelUpgradeOpen {
    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        match self.counterparty_channel_state {
            State::FlushComplete | State::Open => Ok(()),
            state => Err(ChannelError::InvalidState {
                expected: "FLUSHCOMPLETE or OPEN".to_string(),
                actual: state.to_string(),
            }),
        }
    }
}
