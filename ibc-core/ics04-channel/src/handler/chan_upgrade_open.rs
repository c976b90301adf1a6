//! Protocol logic specific to ICS4 messages of type `MsgChannelUpgradeOpen`.

use ibc_core_channel_types::channel::State as ChannelState;
use ibc_core_channel_types::error::ChannelError;
use ibc_core_channel_types::events::UpgradeOpen;
use ibc_core_channel_types::msgs::MsgChannelUpgradeOpen;
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_core_host::types::identifiers::{ChannelId, PortId};
use ibc_core_host::types::path::{ChannelEndPath, ChannelUpgradePath, CounterpartyUpgradePath};
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_core_router::module::Module;
use ibc_primitives::prelude::*;

use super::upgrade_channel;
use super::verify::{expected_counterparty_channel, verify_counterparty_channel};

pub fn chan_upgrade_open_validate<ValCtx>(
    ctx: &ValCtx,
    _module: &dyn Module,
    msg: MsgChannelUpgradeOpen,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    validate(ctx, &msg)
}

pub fn chan_upgrade_open_execute<ExecCtx>(
    ctx: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgChannelUpgradeOpen,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    write_upgrade_open(ctx, module, &msg.port_id, &msg.chan_id)
}

/// Commits the negotiated fields of a flushed channel and reopens it.
pub(crate) fn write_upgrade_open<ExecCtx>(
    ctx: &mut ExecCtx,
    module: &mut dyn Module,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let chan_end_path = ChannelEndPath::new(port_id, chan_id);
    let upgrade_path = ChannelUpgradePath::new(port_id, chan_id);

    let mut chan_end = ctx.channel_end(&chan_end_path)?;
    let upgrade = ctx
        .upgrade(&upgrade_path)?
        .ok_or_else(|| ChannelError::MissingUpgrade {
            port_id: port_id.clone(),
            channel_id: chan_id.clone(),
        })?;

    // state changes
    {
        chan_end.apply_upgrade(&upgrade.fields);
        ctx.store_channel(&chan_end_path, chan_end.clone())?;

        ctx.delete_upgrade(&upgrade_path)?;
        ctx.delete_counterparty_upgrade(&CounterpartyUpgradePath::new(port_id, chan_id))?;
    }

    let extras = module.on_chan_upgrade_open_execute(
        port_id,
        chan_id,
        *chan_end.ordering(),
        chan_end.connection_hops(),
        chan_end.version(),
    );

    // emit events and logs
    {
        ctx.log_message(format!(
            "success: channel upgrade open with channel identifier {chan_id}, upgrade sequence {} and version {}",
            chan_end.upgrade_sequence(),
            chan_end.version()
        ))?;

        let core_event = IbcEvent::UpgradeOpenChannel(UpgradeOpen::new(
            upgrade_channel(port_id, chan_id, &chan_end),
            upgrade.fields,
            chan_end.upgrade_sequence(),
        ));
        ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
        ctx.emit_ibc_event(core_event)?;

        for module_event in extras.events {
            ctx.emit_ibc_event(IbcEvent::Module(module_event))?;
        }

        for log_message in extras.log {
            ctx.log_message(log_message)?;
        }
    }

    Ok(())
}

fn validate<Ctx>(ctx: &Ctx, msg: &MsgChannelUpgradeOpen) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx.validate_message_signer(&msg.signer)?;

    msg.validate_basic()?;

    let chan_end_path = ChannelEndPath::new(&msg.port_id, &msg.chan_id);
    let chan_end = ctx.channel_end(&chan_end_path)?;

    chan_end.verify_state_matches(&ChannelState::FlushComplete)?;

    let upgrade = ctx
        .upgrade(&ChannelUpgradePath::new(&msg.port_id, &msg.chan_id))?
        .ok_or_else(|| ChannelError::MissingUpgrade {
            port_id: msg.port_id.clone(),
            channel_id: msg.chan_id.clone(),
        })?;

    let local_sequence = chan_end.upgrade_sequence();

    let expected_counterparty = match msg.counterparty_channel_state {
        // The counterparty flushed too and still runs the old fields.
        ChannelState::FlushComplete => expected_counterparty_channel(
            ctx,
            &msg.port_id,
            &msg.chan_id,
            ChannelState::FlushComplete,
            &chan_end.fields(),
            local_sequence,
        )?,
        // The counterparty already opened with the upgraded fields, and may
        // have started a later attempt since.
        _ => {
            if msg.counterparty_upgrade_sequence < local_sequence {
                return Err(ChannelError::InvalidUpgradeSequence {
                    expected: local_sequence,
                    actual: msg.counterparty_upgrade_sequence,
                }
                .into());
            }

            expected_counterparty_channel(
                ctx,
                &msg.port_id,
                &msg.chan_id,
                ChannelState::Open,
                &upgrade.fields,
                msg.counterparty_upgrade_sequence,
            )?
        }
    };

    verify_counterparty_channel(
        ctx,
        &chan_end,
        expected_counterparty,
        &msg.proof_counterparty_chan_end,
        msg.proof_height,
    )?;

    Ok(())
}
