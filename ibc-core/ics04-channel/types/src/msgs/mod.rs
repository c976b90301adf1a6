//! Message definitions for the channel upgrade handshake datagrams.
//!
//! Per our convention, chain A is the end that proposes the upgrade and chain
//! B the end that answers it. The cancel, timeout and open datagrams may be
//! sent to either end.

mod chan_upgrade_ack;
mod chan_upgrade_cancel;
mod chan_upgrade_confirm;
mod chan_upgrade_init;
mod chan_upgrade_open;
mod chan_upgrade_timeout;
mod chan_upgrade_try;

pub use chan_upgrade_ack::*;
pub use chan_upgrade_cancel::*;
pub use chan_upgrade_confirm::*;
pub use chan_upgrade_init::*;
pub use chan_upgrade_open::*;
pub use chan_upgrade_timeout::*;
pub use chan_upgrade_try::*;
use ibc_core_host_types::identifiers::*;
use ibc_primitives::Signer;

/// All channel upgrade messages
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum ChannelUpgradeMsg {
    Init(MsgChannelUpgradeInit),
    Try(MsgChannelUpgradeTry),
    Ack(MsgChannelUpgradeAck),
    Confirm(MsgChannelUpgradeConfirm),
    Open(MsgChannelUpgradeOpen),
    Cancel(MsgChannelUpgradeCancel),
    Timeout(MsgChannelUpgradeTimeout),
}

impl ChannelUpgradeMsg {
    pub fn port_id(&self) -> &PortId {
        match self {
            Self::Init(msg) => &msg.port_id_on_a,
            Self::Try(msg) => &msg.port_id_on_b,
            Self::Ack(msg) => &msg.port_id_on_a,
            Self::Confirm(msg) => &msg.port_id_on_b,
            Self::Open(msg) => &msg.port_id,
            Self::Cancel(msg) => &msg.port_id,
            Self::Timeout(msg) => &msg.port_id,
        }
    }

    pub fn channel_id(&self) -> &ChannelId {
        match self {
            Self::Init(msg) => &msg.chan_id_on_a,
            Self::Try(msg) => &msg.chan_id_on_b,
            Self::Ack(msg) => &msg.chan_id_on_a,
            Self::Confirm(msg) => &msg.chan_id_on_b,
            Self::Open(msg) => &msg.chan_id,
            Self::Cancel(msg) => &msg.chan_id,
            Self::Timeout(msg) => &msg.chan_id,
        }
    }

    pub fn signer(&self) -> &Signer {
        match self {
            Self::Init(msg) => &msg.signer,
            Self::Try(msg) => &msg.signer,
            Self::Ack(msg) => &msg.signer,
            Self::Confirm(msg) => &msg.signer,
            Self::Open(msg) => &msg.signer,
            Self::Cancel(msg) => &msg.signer,
            Self::Timeout(msg) => &msg.signer,
        }
    }
}
