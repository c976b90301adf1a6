use ibc_core_client_types::Height;
use ibc_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_core_host_types::identifiers::{ChannelId, PortId};
use ibc_primitives::Signer;

use crate::channel::ChannelEnd;

///
/// Message definition for abandoning an upgrade whose timeout elapsed before
/// the counterparty finished flushing (the `ChanUpgradeTimeout` datagram).
///
/// `counterparty_channel` is the counterparty channel end as committed at
/// `proof_height`.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelUpgradeTimeout {
    pub port_id: PortId,
    pub chan_id: ChannelId,
    pub counterparty_channel: ChannelEnd,
    pub proof_counterparty_chan_end: CommitmentProofBytes,
    pub proof_height: Height,
    pub signer: Signer,
}
