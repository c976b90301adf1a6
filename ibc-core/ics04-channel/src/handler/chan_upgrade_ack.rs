//! Protocol logic specific to ICS4 messages of type `MsgChannelUpgradeAck`.

use ibc_core_channel_types::channel::State as ChannelState;
use ibc_core_channel_types::error::ChannelError;
use ibc_core_channel_types::events::UpgradeAck;
use ibc_core_channel_types::msgs::MsgChannelUpgradeAck;
use ibc_core_channel_types::upgrade::{UpgradeError, UpgradeOutcome};
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_core_host::types::path::{
    ChannelEndPath, ChannelUpgradePath, CounterpartyUpgradePath, SeqSendPath,
};
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_core_router::module::Module;
use ibc_primitives::prelude::*;

use super::abort::abort_attempt;
use super::upgrade_channel;
use super::verify::{
    expected_counterparty_channel, verify_counterparty_channel, verify_counterparty_upgrade,
    verify_upgrade_compatibility,
};
use crate::flush::has_inflight_packets;

pub fn chan_upgrade_ack_validate<ValCtx>(
    ctx_a: &ValCtx,
    _module: &dyn Module,
    msg: MsgChannelUpgradeAck,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    validate(ctx_a, &msg)
}

pub fn chan_upgrade_ack_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgChannelUpgradeAck,
) -> Result<UpgradeOutcome, ContextError>
where
    ExecCtx: ExecutionContext,
{
    let port_id_on_a = &msg.port_id_on_a;
    let chan_id_on_a = &msg.chan_id_on_a;
    let counterparty_upgrade = &msg.counterparty_upgrade;

    let chan_end_path_on_a = ChannelEndPath::new(port_id_on_a, chan_id_on_a);
    let upgrade_path_on_a = ChannelUpgradePath::new(port_id_on_a, chan_id_on_a);

    let mut chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;
    let mut upgrade_on_a =
        ctx_a
            .upgrade(&upgrade_path_on_a)?
            .ok_or_else(|| ChannelError::MissingUpgrade {
                port_id: port_id_on_a.clone(),
                channel_id: chan_id_on_a.clone(),
            })?;
    let upgrade_sequence = chan_end_on_a.upgrade_sequence();

    // The version the counterparty settled on is adopted, unless a crossing
    // hello already made this end settle on its own.
    if chan_end_on_a.is_open() {
        upgrade_on_a.fields.version = counterparty_upgrade.fields.version.clone();
    }

    if let Err(e) =
        verify_upgrade_compatibility(ctx_a, &upgrade_on_a.fields, &counterparty_upgrade.fields)
    {
        return abort_attempt(
            ctx_a,
            port_id_on_a,
            chan_id_on_a,
            UpgradeError::new(upgrade_sequence, e),
        );
    }

    let host_height = ctx_a.host_height()?;
    let host_timestamp = ctx_a.host_timestamp()?;
    if counterparty_upgrade
        .timeout
        .has_elapsed(&host_height, &host_timestamp)
    {
        return abort_attempt(
            ctx_a,
            port_id_on_a,
            chan_id_on_a,
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

    let extras = match module.on_chan_upgrade_ack_execute(
        port_id_on_a,
        chan_id_on_a,
        &counterparty_upgrade.fields.version,
    ) {
        Ok(extras) => extras,
        Err(e) => {
            return abort_attempt(
                ctx_a,
                port_id_on_a,
                chan_id_on_a,
                UpgradeError::new(upgrade_sequence, e),
            )
        }
    };

    // state changes
    {
        // Flushing starts now unless a crossing hello already started it.
        if chan_end_on_a.is_open() {
            let seq_send_path_on_a = SeqSendPath::new(port_id_on_a, chan_id_on_a);
            upgrade_on_a.latest_sequence_send =
                ctx_a.get_next_sequence_send(&seq_send_path_on_a)?.decrement();
            upgrade_on_a.timeout = counterparty_upgrade.timeout;
        }

        ctx_a.store_upgrade(&upgrade_path_on_a, upgrade_on_a.clone())?;
        ctx_a.store_counterparty_upgrade(
            &CounterpartyUpgradePath::new(port_id_on_a, chan_id_on_a),
            counterparty_upgrade.clone(),
        )?;

        if has_inflight_packets(ctx_a, port_id_on_a, chan_id_on_a)? {
            chan_end_on_a.set_state(ChannelState::Flushing);
        } else {
            chan_end_on_a.set_state(ChannelState::FlushComplete);
        }
        ctx_a.store_channel(&chan_end_path_on_a, chan_end_on_a.clone())?;
    }

    // emit events and logs
    {
        ctx_a.log_message(format!(
            "success: channel upgrade ack with channel identifier {chan_id_on_a}, upgrade sequence {upgrade_sequence} and state {}",
            chan_end_on_a.state()
        ))?;

        let core_event = IbcEvent::UpgradeAckChannel(UpgradeAck::new(
            upgrade_channel(port_id_on_a, chan_id_on_a, &chan_end_on_a),
            upgrade_on_a.fields,
            upgrade_sequence,
        ));
        ctx_a.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
        ctx_a.emit_ibc_event(core_event)?;

        for module_event in extras.events {
            ctx_a.emit_ibc_event(IbcEvent::Module(module_event))?;
        }

        for log_message in extras.log {
            ctx_a.log_message(log_message)?;
        }
    }

    Ok(UpgradeOutcome::Success)
}

fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgChannelUpgradeAck) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    msg.counterparty_upgrade.validate_basic()?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    chan_end_on_a.verify_state_is_one_of(&[ChannelState::Open, ChannelState::Flushing])?;

    let upgrade_path_on_a = ChannelUpgradePath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    if ctx_a.upgrade(&upgrade_path_on_a)?.is_none() {
        return Err(ChannelError::MissingUpgrade {
            port_id: msg.port_id_on_a.clone(),
            channel_id: msg.chan_id_on_a.clone(),
        }
        .into());
    }

    // Verify proofs
    {
        let expected_chan_end_on_b = expected_counterparty_channel(
            ctx_a,
            &msg.port_id_on_a,
            &msg.chan_id_on_a,
            ChannelState::Flushing,
            &chan_end_on_a.fields(),
            chan_end_on_a.upgrade_sequence(),
        )?;

        verify_counterparty_channel(
            ctx_a,
            &chan_end_on_a,
            expected_chan_end_on_b,
            &msg.proof_chan_end_on_b,
            msg.proof_height_on_b,
        )?;

        verify_counterparty_upgrade(
            ctx_a,
            &chan_end_on_a,
            &msg.counterparty_upgrade,
            &msg.proof_upgrade_on_b,
            msg.proof_height_on_b,
        )?;
    }

    Ok(())
}
