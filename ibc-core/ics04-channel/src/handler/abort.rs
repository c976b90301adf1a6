//! Aborting an upgrade attempt and restoring the channel to the fields it
//! had before the attempt started.

use ibc_core_channel_types::channel::{ChannelEnd, State as ChannelState};
use ibc_core_channel_types::events::UpgradeErrorEvent;
use ibc_core_channel_types::upgrade::{UpgradeError, UpgradeOutcome};
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::IbcEvent;
use ibc_core_host::types::identifiers::{ChannelId, PortId};
use ibc_core_host::types::path::{
    ChannelEndPath, ChannelUpgradeErrorPath, ChannelUpgradePath, CounterpartyUpgradePath,
};
use ibc_core_host::ExecutionContext;
use ibc_primitives::prelude::*;

use super::upgrade_channel;

/// Ends the current upgrade attempt of a channel.
///
/// The error receipt of `upgrade_error` is written so the counterparty can
/// prove the abort, unless a receipt for the same or a later attempt is
/// already stored. The channel is then restored with
/// [`restore_channel`]. Aborting twice is harmless: the second call writes
/// no receipt and emits no event.
pub fn abort_upgrade<Ctx>(
    ctx: &mut Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
    upgrade_error: &UpgradeError,
) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    let error_receipt = upgrade_error.error_receipt();
    let upgrade_error_path = ChannelUpgradeErrorPath::new(port_id, chan_id);

    let receipt_is_new = ctx
        .upgrade_error_receipt(&upgrade_error_path)?
        .map_or(true, |latest| latest.sequence < error_receipt.sequence);

    // state changes
    let chan_end = {
        if receipt_is_new {
            ctx.store_upgrade_error_receipt(&upgrade_error_path, error_receipt.clone())?;
        }

        restore_channel(ctx, port_id, chan_id)?
    };

    // emit events and logs
    {
        ctx.log_message(format!(
            "upgrade aborted: channel {chan_id} on port {port_id} restored at upgrade sequence {}: {}",
            upgrade_error.sequence(),
            upgrade_error.error()
        ))?;

        if receipt_is_new {
            ctx.emit_ibc_event(IbcEvent::UpgradeErrorChannel(UpgradeErrorEvent::new(
                upgrade_channel(port_id, chan_id, &chan_end),
                error_receipt,
            )))?;
        }
    }

    Ok(())
}

/// Deletes the upgrade records of a channel and reopens it.
///
/// The ordering, connection hops and version of a channel only change when
/// an upgrade opens, so reopening restores the pre-upgrade fields. The
/// upgrade sequence is kept.
pub fn restore_channel<Ctx>(
    ctx: &mut Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<ChannelEnd, ContextError>
where
    Ctx: ExecutionContext,
{
    let chan_end_path = ChannelEndPath::new(port_id, chan_id);
    let mut chan_end = ctx.channel_end(&chan_end_path)?;

    chan_end.set_state(ChannelState::Open);
    ctx.store_channel(&chan_end_path, chan_end.clone())?;

    ctx.delete_upgrade(&ChannelUpgradePath::new(port_id, chan_id))?;
    ctx.delete_counterparty_upgrade(&CounterpartyUpgradePath::new(port_id, chan_id))?;

    Ok(chan_end)
}

/// Aborts the attempt and reports it as the outcome of the handler that
/// detected the failure.
pub(crate) fn abort_attempt<Ctx>(
    ctx: &mut Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
    upgrade_error: UpgradeError,
) -> Result<UpgradeOutcome, ContextError>
where
    Ctx: ExecutionContext,
{
    abort_upgrade(ctx, port_id, chan_id, &upgrade_error)?;
    Ok(UpgradeOutcome::Aborted(upgrade_error))
}
