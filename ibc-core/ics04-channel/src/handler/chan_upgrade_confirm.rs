//! Protocol logic specific to ICS4 messages of type `MsgChannelUpgradeConfirm`.

use ibc_core_channel_types::channel::State as ChannelState;
use ibc_core_channel_types::error::ChannelError;
use ibc_core_channel_types::events::UpgradeConfirm;
use ibc_core_channel_types::msgs::MsgChannelUpgradeConfirm;
use ibc_core_channel_types::upgrade::{UpgradeError, UpgradeOutcome};
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_core_host::types::path::{ChannelEndPath, ChannelUpgradePath, CounterpartyUpgradePath};
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_core_router::module::Module;
use ibc_primitives::prelude::*;

use super::abort::abort_attempt;
use super::chan_upgrade_open::write_upgrade_open;
use super::upgrade_channel;
use super::verify::{
    expected_counterparty_channel, verify_counterparty_channel, verify_counterparty_upgrade,
    verify_upgrade_compatibility,
};
use crate::flush::has_inflight_packets;

pub fn chan_upgrade_confirm_validate<ValCtx>(
    ctx_b: &ValCtx,
    _module: &dyn Module,
    msg: MsgChannelUpgradeConfirm,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    validate(ctx_b, &msg)
}

pub fn chan_upgrade_confirm_execute<ExecCtx>(
    ctx_b: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgChannelUpgradeConfirm,
) -> Result<UpgradeOutcome, ContextError>
where
    ExecCtx: ExecutionContext,
{
    let port_id_on_b = &msg.port_id_on_b;
    let chan_id_on_b = &msg.chan_id_on_b;
    let counterparty_upgrade = &msg.counterparty_upgrade;

    let chan_end_path_on_b = ChannelEndPath::new(port_id_on_b, chan_id_on_b);
    let mut chan_end_on_b = ctx_b.channel_end(&chan_end_path_on_b)?;
    let upgrade_sequence = chan_end_on_b.upgrade_sequence();

    let upgrade_on_b = ctx_b
        .upgrade(&ChannelUpgradePath::new(port_id_on_b, chan_id_on_b))?
        .ok_or_else(|| ChannelError::MissingUpgrade {
            port_id: port_id_on_b.clone(),
            channel_id: chan_id_on_b.clone(),
        })?;

    // Both ends must commit the same fields once flushed.
    if let Err(e) =
        verify_upgrade_compatibility(ctx_b, &upgrade_on_b.fields, &counterparty_upgrade.fields)
    {
        return abort_attempt(
            ctx_b,
            port_id_on_b,
            chan_id_on_b,
            UpgradeError::new(upgrade_sequence, e),
        );
    }

    let host_height = ctx_b.host_height()?;
    let host_timestamp = ctx_b.host_timestamp()?;
    if counterparty_upgrade
        .timeout
        .has_elapsed(&host_height, &host_timestamp)
    {
        return abort_attempt(
            ctx_b,
            port_id_on_b,
            chan_id_on_b,
            UpgradeError::new(
                upgrade_sequence,
                ChannelError::UpgradeTimeoutElapsed {
                    description: format!(
                        "counterparty upgrade timeout {} elapsed at host height {host_height}",
                        counterparty_upgrade.timeout
                    ),
                },
            ),
        );
    }

    // state changes
    {
        ctx_b.store_counterparty_upgrade(
            &CounterpartyUpgradePath::new(port_id_on_b, chan_id_on_b),
            counterparty_upgrade.clone(),
        )?;

        if !has_inflight_packets(ctx_b, port_id_on_b, chan_id_on_b)? {
            chan_end_on_b.set_state(ChannelState::FlushComplete);
            ctx_b.store_channel(&chan_end_path_on_b, chan_end_on_b.clone())?;
        }
    }

    // emit events and logs
    {
        ctx_b.log_message(format!(
            "success: channel upgrade confirm with channel identifier {chan_id_on_b}, upgrade sequence {upgrade_sequence} and state {}",
            chan_end_on_b.state()
        ))?;

        let core_event = IbcEvent::UpgradeConfirmChannel(UpgradeConfirm::new(
            upgrade_channel(port_id_on_b, chan_id_on_b, &chan_end_on_b),
            *chan_end_on_b.state(),
            upgrade_sequence,
        ));
        ctx_b.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
        ctx_b.emit_ibc_event(core_event)?;
    }

    // Both ends flushed: the fields can be committed right away.
    if *chan_end_on_b.state() == ChannelState::FlushComplete
        && msg.counterparty_channel_state == ChannelState::FlushComplete
    {
        write_upgrade_open(ctx_b, module, port_id_on_b, chan_id_on_b)?;
    }

    Ok(UpgradeOutcome::Success)
}

fn validate<Ctx>(ctx_b: &Ctx, msg: &MsgChannelUpgradeConfirm) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    msg.validate_basic()?;

    let chan_end_path_on_b = ChannelEndPath::new(&msg.port_id_on_b, &msg.chan_id_on_b);
    let chan_end_on_b = ctx_b.channel_end(&chan_end_path_on_b)?;

    chan_end_on_b.verify_state_matches(&ChannelState::Flushing)?;

    let upgrade_path_on_b = ChannelUpgradePath::new(&msg.port_id_on_b, &msg.chan_id_on_b);
    if ctx_b.upgrade(&upgrade_path_on_b)?.is_none() {
        return Err(ChannelError::MissingUpgrade {
            port_id: msg.port_id_on_b.clone(),
            channel_id: msg.chan_id_on_b.clone(),
        }
        .into());
    }

    // Verify proofs
    {
        let expected_chan_end_on_a = expected_counterparty_channel(
            ctx_b,
            &msg.port_id_on_b,
            &msg.chan_id_on_b,
            msg.counterparty_channel_state,
            &chan_end_on_b.fields(),
            chan_end_on_b.upgrade_sequence(),
        )?;

        verify_counterparty_channel(
            ctx_b,
            &chan_end_on_b,
            expected_chan_end_on_a,
            &msg.proof_chan_end_on_a,
            msg.proof_height_on_a,
        )?;

        verify_counterparty_upgrade(
            ctx_b,
            &chan_end_on_b,
            &msg.counterparty_upgrade,
            &msg.proof_upgrade_on_a,
            msg.proof_height_on_a,
        )?;
    }

    Ok(())
}
