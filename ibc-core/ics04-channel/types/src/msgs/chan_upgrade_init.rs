use ibc_core_host_types::identifiers::{ChannelId, PortId};
use ibc_primitives::Signer;

use crate::error::ChannelError;
use crate::upgrade::{UpgradeFields, UpgradeTimeout};

///
/// Message definition for the first step in the channel upgrade handshake
/// (the `ChanUpgradeInit` datagram).
/// Per our convention, this message is sent to chain A.
///
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelUpgradeInit {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub fields: UpgradeFields,
    pub timeout: UpgradeTimeout,
    pub signer: Signer,
}

impl MsgChannelUpgradeInit {
    pub fn new(
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
        fields: UpgradeFields,
        timeout: UpgradeTimeout,
        signer: Signer,
    ) -> Self {
        Self {
            port_id_on_a,
            chan_id_on_a,
            fields,
            timeout,
            signer,
        }
    }

    /// Checks the proposal on its own, before any state is read.
    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        self.fields.validate_basic()?;
        if !self.timeout.is_valid() {
            return Err(ChannelError::invalid_upgrade(
                "upgrade timeout must set a height or a timestamp",
            ));
        }
        Ok(())
    }
}
