use ibc_core::channel::types::channel::{ChannelEnd, Counterparty, Order, State};
use ibc_core::channel::types::upgrade::{Upgrade, UpgradeFields, UpgradeTimeout};
use ibc_core::channel::types::Version;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use ibc_core::primitives::prelude::*;

/// Returns a channel end on the transfer port, for testing purposes only!
pub fn dummy_channel_end(
    state: State,
    ordering: Order,
    counterparty_chan_id: ChannelId,
    connection_hop: ConnectionId,
    version: &str,
    upgrade_sequence: u64,
) -> ChannelEnd {
    ChannelEnd::new(
        state,
        ordering,
        Counterparty::new(PortId::transfer(), Some(counterparty_chan_id)),
        vec![connection_hop],
        Version::from(version),
        Sequence::from(upgrade_sequence),
    )
    .expect("Never fails")
}

pub fn dummy_upgrade_fields(
    ordering: Order,
    connection_hop: ConnectionId,
    version: &str,
) -> UpgradeFields {
    UpgradeFields::new(ordering, vec![connection_hop], Version::from(version))
}

pub fn dummy_upgrade(
    fields: UpgradeFields,
    timeout: UpgradeTimeout,
    latest_sequence_send: u64,
) -> Upgrade {
    Upgrade::new(fields, timeout, Sequence::from(latest_sequence_send))
}
