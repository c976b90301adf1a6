use ibc_core_client_types::Height;
use ibc_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_core_host_types::identifiers::{ChannelId, PortId};
use ibc_primitives::Signer;

use crate::upgrade::Upgrade;

///
/// Message definition for the third step in the channel upgrade handshake
/// (the `ChanUpgradeAck` datagram).
/// Per our convention, this message is sent to chain A.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelUpgradeAck {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub counterparty_upgrade: Upgrade,
    pub proof_chan_end_on_b: CommitmentProofBytes,
    pub proof_upgrade_on_b: CommitmentProofBytes,
    pub proof_height_on_b: Height,
    pub signer: Signer,
}
