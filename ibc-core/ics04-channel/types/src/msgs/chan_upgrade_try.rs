use ibc_core_client_types::Height;
use ibc_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use ibc_primitives::prelude::*;
use ibc_primitives::Signer;

use crate::error::ChannelError;
use crate::upgrade::Upgrade;

///
/// Message definition for the second step in the channel upgrade handshake
/// (the `ChanUpgradeTry` datagram).
/// Per our convention, this message is sent to chain B.
///
/// It carries the upgrade chain A proposed, along with proofs that chain A
/// committed both its channel end at `counterparty_upgrade_sequence` and the
/// proposal itself.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelUpgradeTry {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub proposed_connection_hops: Vec<ConnectionId>,
    pub counterparty_upgrade: Upgrade,
    pub counterparty_upgrade_sequence: Sequence,
    pub proof_chan_end_on_a: CommitmentProofBytes,
    pub proof_upgrade_on_a: CommitmentProofBytes,
    pub proof_height_on_a: Height,
    pub signer: Signer,
}

impl MsgChannelUpgradeTry {
    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        self.counterparty_upgrade.validate_basic()?;
        if self.proposed_connection_hops.len() != 1 {
            return Err(ChannelError::InvalidConnectionHopsLength {
                expected: 1,
                actual: self.proposed_connection_hops.len() as u64,
            });
        }
        Ok(())
    }
}
