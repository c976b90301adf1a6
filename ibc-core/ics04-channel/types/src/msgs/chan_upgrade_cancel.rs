use ibc_core_client_types::Height;
use ibc_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_core_host_types::identifiers::{ChannelId, PortId};
use ibc_primitives::Signer;

use crate::error::ChannelError;
use crate::upgrade::ErrorReceipt;

///
/// Message definition for cancelling an in-progress upgrade (the
/// `ChanUpgradeCancel` datagram).
///
/// A relayer cancels by proving the counterparty wrote an error receipt. The
/// upgrade authority may omit the receipt entirely, unless the channel has
/// already completed its flush.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelUpgradeCancel {
    pub port_id: PortId,
    pub chan_id: ChannelId,
    pub error_receipt: Option<ErrorReceipt>,
    pub proof_error_receipt: Option<CommitmentProofBytes>,
    pub proof_height: Option<Height>,
    pub signer: Signer,
}

impl MsgChannelUpgradeCancel {
    /// Returns the counterparty error receipt together with the proof of its
    /// commitment, if the message carries one.
    pub fn receipt_with_proof(
        &self,
    ) -> Result<Option<(&ErrorReceipt, &CommitmentProofBytes, Height)>, ChannelError> {
        match (&self.error_receipt, &self.proof_error_receipt, self.proof_height) {
            (None, None, None) => Ok(None),
            (Some(receipt), Some(proof), Some(height)) => Ok(Some((receipt, proof, height))),
            _ => Err(ChannelError::InvalidUpgradeErrorReceipt {
                description: "error receipt, proof and proof height must be given together"
                    .into(),
            }),
        }
    }
}
