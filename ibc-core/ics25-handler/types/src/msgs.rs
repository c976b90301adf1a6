use ibc_core_channel_types::msgs::ChannelUpgradeMsg;
use ibc_primitives::Signer;

/// Enumeration of all messages that the local ICS26 module is capable of routing.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum MsgEnvelope {
    ChannelUpgrade(ChannelUpgradeMsg),
}

impl MsgEnvelope {
    pub fn signer(&self) -> &Signer {
        match self {
            MsgEnvelope::ChannelUpgrade(msg) => msg.signer(),
        }
    }
}
