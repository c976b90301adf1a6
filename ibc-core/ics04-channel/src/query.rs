//! Read-only views of the upgrade state of a channel, as served to relayers
//! and applications.

use ibc_core_channel_types::channel::ChannelEnd;
use ibc_core_channel_types::upgrade::{ErrorReceipt, Upgrade, UpgradeState};
use ibc_core_handler_types::error::ContextError;
use ibc_core_host::types::identifiers::{ChannelId, PortId};
use ibc_core_host::types::path::{ChannelEndPath, ChannelUpgradeErrorPath, ChannelUpgradePath};
use ibc_core_host::ValidationContext;

pub fn query_channel<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<ChannelEnd, ContextError>
where
    Ctx: ValidationContext,
{
    ctx.channel_end(&ChannelEndPath::new(port_id, chan_id))
}

/// Returns the pending upgrade proposal of the channel, if any.
pub fn query_upgrade<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<Option<Upgrade>, ContextError>
where
    Ctx: ValidationContext,
{
    // the channel must exist even when no upgrade is pending
    ctx.channel_end(&ChannelEndPath::new(port_id, chan_id))?;
    ctx.upgrade(&ChannelUpgradePath::new(port_id, chan_id))
}

/// Returns the receipt of the latest aborted upgrade attempt, if any.
pub fn query_upgrade_error<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<Option<ErrorReceipt>, ContextError>
where
    Ctx: ValidationContext,
{
    ctx.channel_end(&ChannelEndPath::new(port_id, chan_id))?;
    ctx.upgrade_error_receipt(&ChannelUpgradeErrorPath::new(port_id, chan_id))
}

pub fn query_upgrade_state<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<UpgradeState, ContextError>
where
    Ctx: ValidationContext,
{
    let chan_end = ctx.channel_end(&ChannelEndPath::new(port_id, chan_id))?;
    let upgrade = ctx.upgrade(&ChannelUpgradePath::new(port_id, chan_id))?;

    Ok(UpgradeState::from_channel(&chan_end, upgrade.is_some()))
}
