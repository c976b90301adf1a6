//! Protocol logic specific to ICS4 messages of type `MsgChannelUpgradeInit`.

use ibc_core_channel_types::channel::State as ChannelState;
use ibc_core_channel_types::error::ChannelError;
use ibc_core_channel_types::events::UpgradeInit;
use ibc_core_channel_types::msgs::MsgChannelUpgradeInit;
use ibc_core_channel_types::upgrade::{Upgrade, UpgradeError, UpgradeFields};
use ibc_core_channel_types::Version;
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_core_host::types::path::{ChannelEndPath, ChannelUpgradePath, SeqSendPath};
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_core_router::module::Module;
use ibc_primitives::prelude::*;

use super::abort::abort_upgrade;
use super::upgrade_channel;
use super::verify::verify_proposed_connection;

pub fn chan_upgrade_init_validate<ValCtx>(
    ctx_a: &ValCtx,
    module: &dyn Module,
    msg: MsgChannelUpgradeInit,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    validate(ctx_a, &msg)?;

    let version =
        module.on_chan_upgrade_init_validate(&msg.port_id_on_a, &msg.chan_id_on_a, &msg.fields)?;

    proposed_fields(&msg, version).validate_basic()?;

    Ok(())
}

pub fn chan_upgrade_init_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgChannelUpgradeInit,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let (extras, version) =
        module.on_chan_upgrade_init_execute(&msg.port_id_on_a, &msg.chan_id_on_a, &msg.fields)?;

    let fields = proposed_fields(&msg, version);
    fields.validate_basic()?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let upgrade_path_on_a = ChannelUpgradePath::new(&msg.port_id_on_a, &msg.chan_id_on_a);

    // A proposal left over from an earlier attempt is abandoned, with a
    // receipt the counterparty can use to cancel its side of it.
    if ctx_a.upgrade(&upgrade_path_on_a)?.is_some() {
        let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;
        abort_upgrade(
            ctx_a,
            &msg.port_id_on_a,
            &msg.chan_id_on_a,
            &UpgradeError::new(
                chan_end_on_a.upgrade_sequence(),
                ChannelError::invalid_upgrade("superseded by a new upgrade proposal"),
            ),
        )?;
    }

    let mut chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;
    let upgrade_sequence = chan_end_on_a
        .upgrade_sequence()
        .increment()
        .map_err(ChannelError::from)?;

    let seq_send_path_on_a = SeqSendPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let latest_sequence_send = ctx_a.get_next_sequence_send(&seq_send_path_on_a)?.decrement();

    // state changes
    {
        chan_end_on_a.set_upgrade_sequence(upgrade_sequence);
        ctx_a.store_channel(&chan_end_path_on_a, chan_end_on_a.clone())?;

        ctx_a.store_upgrade(
            &upgrade_path_on_a,
            Upgrade::new(fields.clone(), msg.timeout, latest_sequence_send),
        )?;
    }

    // emit events and logs
    {
        ctx_a.log_message(format!(
            "success: channel upgrade init with channel identifier {} and upgrade sequence {upgrade_sequence}",
            msg.chan_id_on_a
        ))?;

        let core_event = IbcEvent::UpgradeInitChannel(UpgradeInit::new(
            upgrade_channel(&msg.port_id_on_a, &msg.chan_id_on_a, &chan_end_on_a),
            fields,
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

    Ok(())
}

fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgChannelUpgradeInit) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    msg.validate_basic()?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    chan_end_on_a.verify_state_matches(&ChannelState::Open)?;

    chan_end_on_a
        .upgrade_sequence()
        .increment()
        .map_err(ChannelError::from)?;

    if chan_end_on_a.fields() == msg.fields {
        return Err(ChannelError::invalid_upgrade(
            "proposed fields are identical to the current channel fields",
        )
        .into());
    }

    verify_proposed_connection(ctx_a, &msg.fields)?;

    Ok(())
}

/// The proposal with the version the application settled on.
fn proposed_fields(msg: &MsgChannelUpgradeInit, version: Version) -> UpgradeFields {
    UpgradeFields::new(
        msg.fields.ordering,
        msg.fields.connection_hops.clone(),
        version,
    )
}
