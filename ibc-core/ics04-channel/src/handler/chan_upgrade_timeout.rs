//! Protocol logic specific to ICS4 messages of type `MsgChannelUpgradeTimeout`.

use ibc_core_channel_types::channel::State as ChannelState;
use ibc_core_channel_types::error::ChannelError;
use ibc_core_channel_types::events::UpgradeTimeoutEvent;
use ibc_core_channel_types::msgs::MsgChannelUpgradeTimeout;
use ibc_core_channel_types::upgrade::UpgradeError;
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_core_host::types::path::{ChannelEndPath, ChannelUpgradePath};
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_core_router::module::Module;
use ibc_primitives::prelude::*;

use super::abort::abort_upgrade;
use super::upgrade_channel;
use super::verify::{expected_counterparty_channel, verify_counterparty_channel};

pub fn chan_upgrade_timeout_validate<ValCtx>(
    ctx: &ValCtx,
    _module: &dyn Module,
    msg: MsgChannelUpgradeTimeout,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    validate(ctx, &msg)
}

pub fn chan_upgrade_timeout_execute<ExecCtx>(
    ctx: &mut ExecCtx,
    _module: &mut dyn Module,
    msg: MsgChannelUpgradeTimeout,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let chan_end = ctx.channel_end(&ChannelEndPath::new(&msg.port_id, &msg.chan_id))?;
    let upgrade = ctx
        .upgrade(&ChannelUpgradePath::new(&msg.port_id, &msg.chan_id))?
        .ok_or_else(|| ChannelError::MissingUpgrade {
            port_id: msg.port_id.clone(),
            channel_id: msg.chan_id.clone(),
        })?;
    let upgrade_sequence = chan_end.upgrade_sequence();

    // state changes
    {
        abort_upgrade(
            ctx,
            &msg.port_id,
            &msg.chan_id,
            &UpgradeError::new(
                upgrade_sequence,
                ChannelError::UpgradeTimeout {
                    description: format!("upgrade timeout {} elapsed", upgrade.timeout),
                },
            ),
        )?;
    }

    // emit events and logs
    {
        ctx.log_message(format!(
            "success: channel upgrade timeout with channel identifier {} and upgrade sequence {upgrade_sequence}",
            msg.chan_id
        ))?;

        let core_event = IbcEvent::UpgradeTimeoutChannel(UpgradeTimeoutEvent::new(
            upgrade_channel(&msg.port_id, &msg.chan_id, &chan_end),
            upgrade.timeout,
            upgrade_sequence,
        ));
        ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
        ctx.emit_ibc_event(core_event)?;
    }

    Ok(())
}

fn validate<Ctx>(ctx: &Ctx, msg: &MsgChannelUpgradeTimeout) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx.validate_message_signer(&msg.signer)?;

    let chan_end = ctx.channel_end(&ChannelEndPath::new(&msg.port_id, &msg.chan_id))?;

    chan_end.verify_state_is_one_of(&[ChannelState::Flushing, ChannelState::FlushComplete])?;

    let upgrade = ctx
        .upgrade(&ChannelUpgradePath::new(&msg.port_id, &msg.chan_id))?
        .ok_or_else(|| ChannelError::MissingUpgrade {
            port_id: msg.port_id.clone(),
            channel_id: msg.chan_id.clone(),
        })?;

    let host_height = ctx.host_height()?;
    let host_timestamp = ctx.host_timestamp()?;
    if !upgrade.timeout.has_elapsed(&host_height, &host_timestamp) {
        return Err(ChannelError::UpgradeTimeoutNotReached {
            description: format!(
                "upgrade timeout {} not reached at host height {host_height}",
                upgrade.timeout
            ),
        }
        .into());
    }

    let counterparty_channel = &msg.counterparty_channel;

    // A counterparty that finished flushing is committed to the upgrade.
    counterparty_channel.verify_state_is_one_of(&[ChannelState::Open, ChannelState::Flushing])?;

    if counterparty_channel.is_open() {
        let upgraded_counterparty = expected_counterparty_channel(
            ctx,
            &msg.port_id,
            &msg.chan_id,
            ChannelState::Open,
            &upgrade.fields,
            counterparty_channel.upgrade_sequence(),
        )?;

        if upgraded_counterparty.fields() == counterparty_channel.fields() {
            return Err(ChannelError::UpgradeTimeoutFailed {
                description: "counterparty channel already opened with the upgraded fields"
                    .to_string(),
            }
            .into());
        }
    }

    if counterparty_channel.upgrade_sequence() < chan_end.upgrade_sequence() {
        return Err(ChannelError::InvalidUpgradeSequence {
            expected: chan_end.upgrade_sequence(),
            actual: counterparty_channel.upgrade_sequence(),
        }
        .into());
    }

    verify_counterparty_channel(
        ctx,
        &chan_end,
        counterparty_channel.clone(),
        &msg.proof_counterparty_chan_end,
        msg.proof_height,
    )?;

    Ok(())
}
