//! Application callbacks invoked during the channel upgrade handshake.

use core::fmt::Debug;

use ibc_core_channel_types::channel::Order;
use ibc_core_channel_types::error::ChannelError;
use ibc_core_channel_types::upgrade::UpgradeFields;
use ibc_core_channel_types::Version;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_core_router_types::module::ModuleExtras;

/// An application bound to a port. The upgrade handshake only ever
/// negotiates the version through these callbacks; ordering and connection
/// hops are settled by the core handlers.
pub trait Module: Debug {
    /// Validates a locally proposed upgrade and returns the version the
    /// application wants to propose.
    fn on_chan_upgrade_init_validate(
        &self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        proposed_fields: &UpgradeFields,
    ) -> Result<Version, ChannelError> {
        Ok(proposed_fields.version.clone())
    }

    fn on_chan_upgrade_init_execute(
        &mut self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        proposed_fields: &UpgradeFields,
    ) -> Result<(ModuleExtras, Version), ChannelError> {
        Ok((ModuleExtras::empty(), proposed_fields.version.clone()))
    }

    /// Answers a counterparty proposal with the version this end runs after
    /// the upgrade. An error aborts the upgrade attempt instead of rejecting
    /// the message.
    fn on_chan_upgrade_try_execute(
        &mut self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        proposed_fields: &UpgradeFields,
    ) -> Result<(ModuleExtras, Version), ChannelError> {
        Ok((ModuleExtras::empty(), proposed_fields.version.clone()))
    }

    /// Accepts or refuses the version the counterparty answered with. An
    /// error aborts the upgrade attempt.
    fn on_chan_upgrade_ack_execute(
        &mut self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty_version: &Version,
    ) -> Result<ModuleExtras, ChannelError> {
        Ok(ModuleExtras::empty())
    }

    /// Called once the upgraded fields are committed. It cannot fail.
    fn on_chan_upgrade_open_execute(
        &mut self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _ordering: Order,
        _connection_hops: &[ConnectionId],
        _version: &Version,
    ) -> ModuleExtras {
        ModuleExtras::empty()
    }
}
