//! Coordinates the packets in flight while a channel upgrades.
//!
//! When an end starts flushing it records the latest sequence it sent in its
//! upgrade. Every packet up to that sequence whose commitment is still
//! stored must be acknowledged or timed out before the end may reach
//! `FLUSHCOMPLETE`. Sending is paused until the upgrade opens or aborts, and
//! received packets are only accepted up to the counterparty's watermark.

use ibc_core_channel_types::channel::State as ChannelState;
use ibc_core_channel_types::error::{ChannelError, PacketError};
use ibc_core_channel_types::events::FlushComplete;
use ibc_core_channel_types::upgrade::{UpgradeError, UpgradeOutcome};
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::IbcEvent;
use ibc_core_host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core_host::types::path::{
    ChannelEndPath, ChannelUpgradePath, CommitmentPath, CounterpartyUpgradePath,
};
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_primitives::prelude::*;

use crate::handler::abort::abort_upgrade;
use crate::handler::upgrade_channel;

/// Returns the sequences of the packets sent up to the upgrade watermark
/// whose commitments are still stored, in ascending order.
pub fn inflight_packets<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<Vec<Sequence>, ContextError>
where
    Ctx: ValidationContext,
{
    let upgrade = ctx
        .upgrade(&ChannelUpgradePath::new(port_id, chan_id))?
        .ok_or_else(|| ChannelError::MissingUpgrade {
            port_id: port_id.clone(),
            channel_id: chan_id.clone(),
        })?;

    let sequences = ctx
        .packet_commitment_sequences(&ChannelEndPath::new(port_id, chan_id))?
        .into_iter()
        .filter(|sequence| *sequence <= upgrade.latest_sequence_send)
        .collect();

    Ok(sequences)
}

pub fn has_inflight_packets<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<bool, ContextError>
where
    Ctx: ValidationContext,
{
    Ok(!inflight_packets(ctx, port_id, chan_id)?.is_empty())
}

/// Packets may only be sent on an open channel.
pub fn send_packet_allowed<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    let chan_end = ctx.channel_end(&ChannelEndPath::new(port_id, chan_id))?;

    if !chan_end.is_open() {
        return Err(PacketError::SendNotAllowed {
            port_id: port_id.clone(),
            channel_id: chan_id.clone(),
            state: *chan_end.state(),
        }
        .into());
    }

    Ok(())
}

/// Checks that a packet of the counterparty may be received. While flushing,
/// only packets the counterparty sent before it started flushing are
/// accepted.
pub fn recv_packet_allowed<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
    sequence: Sequence,
) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    if sequence.is_zero() {
        return Err(PacketError::ZeroPacketSequence.into());
    }

    let chan_end = ctx.channel_end(&ChannelEndPath::new(port_id, chan_id))?;

    chan_end.verify_state_is_one_of(&[
        ChannelState::Open,
        ChannelState::Flushing,
        ChannelState::FlushComplete,
    ])?;

    if chan_end.is_open() {
        return Ok(());
    }

    let counterparty_upgrade = ctx
        .counterparty_upgrade(&CounterpartyUpgradePath::new(port_id, chan_id))?
        .ok_or_else(|| ChannelError::MissingCounterpartyUpgrade {
            port_id: port_id.clone(),
            channel_id: chan_id.clone(),
        })?;

    if sequence > counterparty_upgrade.latest_sequence_send {
        return Err(PacketError::SequenceAboveUpgradeWatermark {
            sequence,
            watermark: counterparty_upgrade.latest_sequence_send,
        }
        .into());
    }

    Ok(())
}

/// Deletes the commitment of a packet that was acknowledged or timed out,
/// and advances the flush of the channel.
///
/// A flushing channel whose counterparty upgrade timed out is aborted. One
/// without packets left in flight moves to `FLUSHCOMPLETE`.
pub fn on_packet_cleared<Ctx>(
    ctx: &mut Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
    sequence: Sequence,
) -> Result<UpgradeOutcome, ContextError>
where
    Ctx: ExecutionContext,
{
    let commitment_path = CommitmentPath::new(port_id, chan_id, sequence);
    ctx.get_packet_commitment(&commitment_path)
        .map_err(|_| PacketError::MissingPacketCommitment(sequence))?;
    ctx.delete_packet_commitment(&commitment_path)?;

    let chan_end_path = ChannelEndPath::new(port_id, chan_id);
    let mut chan_end = ctx.channel_end(&chan_end_path)?;

    if *chan_end.state() != ChannelState::Flushing {
        return Ok(UpgradeOutcome::Success);
    }

    let counterparty_upgrade =
        ctx.counterparty_upgrade(&CounterpartyUpgradePath::new(port_id, chan_id))?;

    if let Some(counterparty_upgrade) = counterparty_upgrade {
        let host_height = ctx.host_height()?;
        let host_timestamp = ctx.host_timestamp()?;

        if counterparty_upgrade
            .timeout
            .has_elapsed(&host_height, &host_timestamp)
        {
            let upgrade_error = UpgradeError::new(
                chan_end.upgrade_sequence(),
                ChannelError::UpgradeTimeout {
                    description: format!(
                        "upgrade timeout {} elapsed before packets were flushed",
                        counterparty_upgrade.timeout
                    ),
                },
            );
            abort_upgrade(ctx, port_id, chan_id, &upgrade_error)?;
            return Ok(UpgradeOutcome::Aborted(upgrade_error));
        }
    }

    if has_inflight_packets(ctx, port_id, chan_id)? {
        return Ok(UpgradeOutcome::Success);
    }

    // state changes
    {
        chan_end.set_state(ChannelState::FlushComplete);
        ctx.store_channel(&chan_end_path, chan_end.clone())?;
    }

    // emit events and logs
    {
        ctx.log_message(format!(
            "success: channel {chan_id} on port {port_id} flushed its in-flight packets"
        ))?;

        ctx.emit_ibc_event(IbcEvent::FlushCompleteChannel(FlushComplete::new(
            upgrade_channel(port_id, chan_id, &chan_end),
            ChannelState::FlushComplete,
        )))?;
    }

    Ok(UpgradeOutcome::Success)
}
