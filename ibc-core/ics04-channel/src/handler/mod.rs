//! Handlers of the channel upgrade handshake datagrams.
//!
//! Every datagram is processed in two steps: `*_validate` checks the message
//! against the host state without writing to it, and `*_execute` performs the
//! state transition. Steps whose failure belongs to the upgrade attempt
//! rather than to the message (an incompatible counterparty proposal, an
//! elapsed timeout, an application refusing the version) abort the attempt
//! in `*_execute` and report it through [`UpgradeOutcome::Aborted`].
//!
//! [`UpgradeOutcome::Aborted`]: ibc_core_channel_types::upgrade::UpgradeOutcome::Aborted

pub mod abort;
mod chan_upgrade_ack;
mod chan_upgrade_cancel;
mod chan_upgrade_confirm;
mod chan_upgrade_init;
mod chan_upgrade_open;
mod chan_upgrade_timeout;
mod chan_upgrade_try;
mod verify;

pub use abort::{abort_upgrade, restore_channel};
pub use chan_upgrade_ack::*;
pub use chan_upgrade_cancel::*;
pub use chan_upgrade_confirm::*;
pub use chan_upgrade_init::*;
pub use chan_upgrade_open::*;
pub use chan_upgrade_timeout::*;
pub use chan_upgrade_try::*;

use ibc_core_channel_types::channel::ChannelEnd;
use ibc_core_channel_types::events::UpgradeChannel;
use ibc_core_host::types::identifiers::{ChannelId, PortId};

/// Attributes identifying an upgrading channel in the events it emits.
pub(crate) fn upgrade_channel(
    port_id: &PortId,
    chan_id: &ChannelId,
    chan_end: &ChannelEnd,
) -> UpgradeChannel {
    UpgradeChannel::new(
        port_id.clone(),
        chan_id.clone(),
        chan_end.counterparty().port_id().clone(),
        chan_end.counterparty().channel_id().cloned(),
    )
}
