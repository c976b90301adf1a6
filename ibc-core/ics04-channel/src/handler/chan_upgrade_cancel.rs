//! Protocol logic specific to ICS4 messages of type `MsgChannelUpgradeCancel`.

use core::cmp::max;

use ibc_core_channel_types::channel::State as ChannelState;
use ibc_core_channel_types::error::ChannelError;
use ibc_core_channel_types::events::UpgradeCancelled;
use ibc_core_channel_types::msgs::MsgChannelUpgradeCancel;
use ibc_core_channel_types::upgrade::UpgradeError;
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_core_host::types::path::{ChannelEndPath, ChannelUpgradePath};
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_core_router::module::Module;
use ibc_primitives::prelude::*;

use super::abort::abort_upgrade;
use super::upgrade_channel;
use super::verify::verify_counterparty_error_receipt;

pub fn chan_upgrade_cancel_validate<ValCtx>(
    ctx: &ValCtx,
    _module: &dyn Module,
    msg: MsgChannelUpgradeCancel,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    validate(ctx, &msg)
}

pub fn chan_upgrade_cancel_execute<ExecCtx>(
    ctx: &mut ExecCtx,
    _module: &mut dyn Module,
    msg: MsgChannelUpgradeCancel,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let chan_end_path = ChannelEndPath::new(&msg.port_id, &msg.chan_id);
    let mut chan_end = ctx.channel_end(&chan_end_path)?;

    // A counterparty receipt for a later attempt moves this end up to it.
    let upgrade_sequence = match &msg.error_receipt {
        Some(receipt) => max(receipt.sequence, chan_end.upgrade_sequence()),
        None => chan_end.upgrade_sequence(),
    };

    // state changes
    {
        chan_end.set_upgrade_sequence(upgrade_sequence);
        ctx.store_channel(&chan_end_path, chan_end.clone())?;

        abort_upgrade(
            ctx,
            &msg.port_id,
            &msg.chan_id,
            &UpgradeError::new(
                upgrade_sequence,
                ChannelError::invalid_upgrade("upgrade cancelled"),
            ),
        )?;
    }

    // emit events and logs
    {
        ctx.log_message(format!(
            "success: channel upgrade cancel with channel identifier {} and upgrade sequence {upgrade_sequence}",
            msg.chan_id
        ))?;

        let core_event = IbcEvent::UpgradeCancelledChannel(UpgradeCancelled::new(
            upgrade_channel(&msg.port_id, &msg.chan_id, &chan_end),
            upgrade_sequence,
        ));
        ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
        ctx.emit_ibc_event(core_event)?;
    }

    Ok(())
}

fn validate<Ctx>(ctx: &Ctx, msg: &MsgChannelUpgradeCancel) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx.validate_message_signer(&msg.signer)?;

    let chan_end_path = ChannelEndPath::new(&msg.port_id, &msg.chan_id);
    let chan_end = ctx.channel_end(&chan_end_path)?;

    let upgrade_path = ChannelUpgradePath::new(&msg.port_id, &msg.chan_id);
    if ctx.upgrade(&upgrade_path)?.is_none() {
        return Err(ChannelError::MissingUpgrade {
            port_id: msg.port_id.clone(),
            channel_id: msg.chan_id.clone(),
        }
        .into());
    }

    let is_flush_complete = *chan_end.state() == ChannelState::FlushComplete;

    let Some((error_receipt, proof, proof_height)) = msg.receipt_with_proof()? else {
        // Once flushed, an end may only give up on an attempt the
        // counterparty gave up on first.
        if is_flush_complete {
            return Err(ChannelError::MissingUpgradeErrorReceipt {
                port_id: msg.port_id.clone(),
                channel_id: msg.chan_id.clone(),
            }
            .into());
        }
        if !ctx.is_upgrade_authority(&msg.signer) {
            return Err(ChannelError::UnauthorizedSigner {
                signer: msg.signer.to_string(),
            }
            .into());
        }
        return Ok(());
    };

    let local_sequence = chan_end.upgrade_sequence();
    let stale = if is_flush_complete {
        error_receipt.sequence != local_sequence
    } else {
        error_receipt.sequence < local_sequence
    };
    if stale {
        return Err(ChannelError::InvalidUpgradeSequence {
            expected: local_sequence,
            actual: error_receipt.sequence,
        }
        .into());
    }

    verify_counterparty_error_receipt(ctx, &chan_end, error_receipt, proof, proof_height)?;

    Ok(())
}
