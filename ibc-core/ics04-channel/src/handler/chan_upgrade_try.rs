//! Protocol logic specific to ICS4 messages of type `MsgChannelUpgradeTry`.

use ibc_core_channel_types::channel::State as ChannelState;
use ibc_core_channel_types::error::ChannelError;
use ibc_core_channel_types::events::UpgradeTry;
use ibc_core_channel_types::msgs::MsgChannelUpgradeTry;
use ibc_core_channel_types::upgrade::{Upgrade, UpgradeError, UpgradeFields, UpgradeOutcome};
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_core_host::types::path::{
    ChannelEndPath, ChannelUpgradePath, CounterpartyUpgradePath, SeqSendPath,
};
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_core_router::module::Module;
use ibc_primitives::prelude::*;

use super::abort::{abort_attempt, abort_upgrade};
use super::upgrade_channel;
use super::verify::{
    expected_counterparty_channel, verify_counterparty_channel, verify_counterparty_upgrade,
    verify_proposed_connection, verify_upgrade_compatibility,
};

pub fn chan_upgrade_try_validate<ValCtx>(
    ctx_b: &ValCtx,
    _module: &dyn Module,
    msg: MsgChannelUpgradeTry,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    validate(ctx_b, &msg)
}

pub fn chan_upgrade_try_execute<ExecCtx>(
    ctx_b: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgChannelUpgradeTry,
) -> Result<UpgradeOutcome, ContextError>
where
    ExecCtx: ExecutionContext,
{
    let port_id_on_b = &msg.port_id_on_b;
    let chan_id_on_b = &msg.chan_id_on_b;
    let upgrade_sequence = msg.counterparty_upgrade_sequence;
    let counterparty_upgrade = &msg.counterparty_upgrade;

    let chan_end_path_on_b = ChannelEndPath::new(port_id_on_b, chan_id_on_b);
    let upgrade_path_on_b = ChannelUpgradePath::new(port_id_on_b, chan_id_on_b);
    let mut chan_end_on_b = ctx_b.channel_end(&chan_end_path_on_b)?;

    let proposed_fields = match ctx_b.upgrade(&upgrade_path_on_b)? {
        // crossing hellos: both ends proposed the same attempt
        Some(upgrade) if chan_end_on_b.upgrade_sequence() == upgrade_sequence => upgrade.fields,
        local_upgrade => {
            if local_upgrade.is_some() {
                abort_upgrade(
                    ctx_b,
                    port_id_on_b,
                    chan_id_on_b,
                    &UpgradeError::new(
                        chan_end_on_b.upgrade_sequence(),
                        ChannelError::InvalidUpgradeSequence {
                            expected: upgrade_sequence,
                            actual: chan_end_on_b.upgrade_sequence(),
                        },
                    ),
                )?;
                chan_end_on_b = ctx_b.channel_end(&chan_end_path_on_b)?;
            }

            chan_end_on_b.set_upgrade_sequence(upgrade_sequence);
            ctx_b.store_channel(&chan_end_path_on_b, chan_end_on_b.clone())?;

            UpgradeFields::new(
                counterparty_upgrade.fields.ordering,
                msg.proposed_connection_hops.clone(),
                counterparty_upgrade.fields.version.clone(),
            )
        }
    };

    if let Err(e) =
        verify_upgrade_compatibility(ctx_b, &proposed_fields, &counterparty_upgrade.fields)
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

    let (extras, version) =
        match module.on_chan_upgrade_try_execute(port_id_on_b, chan_id_on_b, &proposed_fields) {
            Ok(res) => res,
            Err(e) => {
                return abort_attempt(
                    ctx_b,
                    port_id_on_b,
                    chan_id_on_b,
                    UpgradeError::new(upgrade_sequence, e),
                )
            }
        };

    let upgraded_fields = UpgradeFields::new(
        proposed_fields.ordering,
        proposed_fields.connection_hops,
        version,
    );

    let seq_send_path_on_b = SeqSendPath::new(port_id_on_b, chan_id_on_b);
    let latest_sequence_send = ctx_b.get_next_sequence_send(&seq_send_path_on_b)?.decrement();

    // state changes
    {
        chan_end_on_b.set_state(ChannelState::Flushing);
        ctx_b.store_channel(&chan_end_path_on_b, chan_end_on_b.clone())?;

        ctx_b.store_upgrade(
            &upgrade_path_on_b,
            Upgrade::new(
                upgraded_fields.clone(),
                counterparty_upgrade.timeout,
                latest_sequence_send,
            ),
        )?;

        ctx_b.store_counterparty_upgrade(
            &CounterpartyUpgradePath::new(port_id_on_b, chan_id_on_b),
            counterparty_upgrade.clone(),
        )?;
    }

    // emit events and logs
    {
        ctx_b.log_message(format!(
            "success: channel upgrade try with channel identifier {chan_id_on_b} and upgrade sequence {upgrade_sequence}"
        ))?;

        let core_event = IbcEvent::UpgradeTryChannel(UpgradeTry::new(
            upgrade_channel(port_id_on_b, chan_id_on_b, &chan_end_on_b),
            upgraded_fields,
            upgrade_sequence,
        ));
        ctx_b.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
        ctx_b.emit_ibc_event(core_event)?;

        for module_event in extras.events {
            ctx_b.emit_ibc_event(IbcEvent::Module(module_event))?;
        }

        for log_message in extras.log {
            ctx_b.log_message(log_message)?;
        }
    }

    Ok(UpgradeOutcome::Success)
}

fn validate<Ctx>(ctx_b: &Ctx, msg: &MsgChannelUpgradeTry) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    msg.validate_basic()?;

    let chan_end_path_on_b = ChannelEndPath::new(&msg.port_id_on_b, &msg.chan_id_on_b);
    let chan_end_on_b = ctx_b.channel_end(&chan_end_path_on_b)?;

    chan_end_on_b.verify_state_matches(&ChannelState::Open)?;

    let local_sequence = chan_end_on_b.upgrade_sequence();
    let upgrade_path_on_b = ChannelUpgradePath::new(&msg.port_id_on_b, &msg.chan_id_on_b);

    match ctx_b.upgrade(&upgrade_path_on_b)? {
        Some(upgrade) if msg.counterparty_upgrade_sequence == local_sequence => {
            if upgrade.fields.connection_hops != msg.proposed_connection_hops {
                return Err(ChannelError::invalid_upgrade(
                    "proposed connection hops differ from the pending upgrade proposal",
                )
                .into());
            }
        }
        local_upgrade => {
            // Without a pending proposal at the same sequence, the
            // counterparty must be ahead of every attempt seen here.
            if msg.counterparty_upgrade_sequence <= local_sequence {
                let expected = match local_upgrade {
                    Some(_) => local_sequence,
                    None => local_sequence.increment().map_err(ChannelError::from)?,
                };
                return Err(ChannelError::InvalidUpgradeSequence {
                    expected,
                    actual: msg.counterparty_upgrade_sequence,
                }
                .into());
            }

            let proposed_fields = UpgradeFields::new(
                msg.counterparty_upgrade.fields.ordering,
                msg.proposed_connection_hops.clone(),
                msg.counterparty_upgrade.fields.version.clone(),
            );
            verify_proposed_connection(ctx_b, &proposed_fields)?;
        }
    }

    // Verify proofs
    {
        let expected_chan_end_on_a = expected_counterparty_channel(
            ctx_b,
            &msg.port_id_on_b,
            &msg.chan_id_on_b,
            ChannelState::Open,
            &chan_end_on_b.fields(),
            msg.counterparty_upgrade_sequence,
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
