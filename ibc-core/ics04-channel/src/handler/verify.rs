//! Verification of counterparty state shared by the upgrade handlers.

use ibc_core_channel_types::channel::{ChannelEnd, Counterparty, State as ChannelState};
use ibc_core_channel_types::error::ChannelError;
use ibc_core_channel_types::upgrade::{ErrorReceipt, Upgrade, UpgradeFields};
use ibc_core_client_context::prelude::*;
use ibc_core_client_context::types::Height;
use ibc_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_core_connection_types::{ConnectionEnd, State as ConnectionState};
use ibc_core_handler_types::error::ContextError;
use ibc_core_host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core_host::types::path::{
    ChannelEndPath, ChannelUpgradeErrorPath, ChannelUpgradePath, Path,
};
use ibc_core_host::ValidationContext;
use ibc_primitives::prelude::*;
use ibc_primitives::proto::Protobuf;

/// Builds the channel end the counterparty is expected to store, from the
/// fields of the upgrade as this end sees them. The single connection hop
/// is translated to the counterparty's end of that connection.
pub(crate) fn expected_counterparty_channel<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    chan_id: &ChannelId,
    state: ChannelState,
    fields: &UpgradeFields,
    upgrade_sequence: Sequence,
) -> Result<ChannelEnd, ContextError>
where
    Ctx: ValidationContext,
{
    let conn_end = ctx.connection_end(fields.connection_hop()?)?;
    let conn_id_on_cp = conn_end.counterparty().expect_connection_id()?;

    let expected = ChannelEnd::new(
        state,
        fields.ordering,
        Counterparty::new(port_id.clone(), Some(chan_id.clone())),
        vec![conn_id_on_cp.clone()],
        fields.version.clone(),
        upgrade_sequence,
    )?;

    Ok(expected)
}

/// Checks that the counterparty stores `expected` as its end of the channel.
pub(crate) fn verify_counterparty_channel<Ctx>(
    ctx: &Ctx,
    chan_end: &ChannelEnd,
    expected: ChannelEnd,
    proof: &CommitmentProofBytes,
    proof_height: Height,
) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    let remote = chan_end.counterparty();
    let path = ChannelEndPath::new(remote.port_id(), remote.expect_channel_id()?);

    verify_membership(
        ctx,
        chan_end,
        proof,
        proof_height,
        Path::ChannelEnd(path),
        expected.encode_vec(),
    )
}

/// Checks that the counterparty stores `upgrade` as its upgrade proposal.
pub(crate) fn verify_counterparty_upgrade<Ctx>(
    ctx: &Ctx,
    chan_end: &ChannelEnd,
    upgrade: &Upgrade,
    proof: &CommitmentProofBytes,
    proof_height: Height,
) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    let remote = chan_end.counterparty();
    let path = ChannelUpgradePath::new(remote.port_id(), remote.expect_channel_id()?);

    verify_membership(
        ctx,
        chan_end,
        proof,
        proof_height,
        Path::ChannelUpgrade(path),
        upgrade.clone().encode_vec(),
    )
}

/// Checks that the counterparty wrote `error_receipt` as its latest upgrade
/// error receipt.
pub(crate) fn verify_counterparty_error_receipt<Ctx>(
    ctx: &Ctx,
    chan_end: &ChannelEnd,
    error_receipt: &ErrorReceipt,
    proof: &CommitmentProofBytes,
    proof_height: Height,
) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    let remote = chan_end.counterparty();
    let path = ChannelUpgradeErrorPath::new(remote.port_id(), remote.expect_channel_id()?);

    verify_membership(
        ctx,
        chan_end,
        proof,
        proof_height,
        Path::ChannelUpgradeError(path),
        error_receipt.clone().encode_vec(),
    )
}

/// Checks that the connection an upgrade proposes to run over is open and
/// supports the proposed ordering.
pub(crate) fn verify_proposed_connection<Ctx>(
    ctx: &Ctx,
    proposed: &UpgradeFields,
) -> Result<ConnectionEnd, ContextError>
where
    Ctx: ValidationContext,
{
    let conn_end = ctx.connection_end(proposed.connection_hop()?)?;

    conn_end.verify_state_matches(&ConnectionState::Open)?;
    conn_end.verify_feature_supported(proposed.ordering.as_str())?;

    Ok(conn_end)
}

/// Checks that the proposed fields can be agreed on with the counterparty's:
/// both ends must use the same ordering and version, and the proposed
/// connection must be open and lead to the connection the counterparty
/// proposed.
///
/// A failure here ends the upgrade attempt, so it is reported as a
/// [`ChannelError`] the error receipt can be derived from.
pub(crate) fn verify_upgrade_compatibility<Ctx>(
    ctx: &Ctx,
    proposed: &UpgradeFields,
    counterparty: &UpgradeFields,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
{
    if proposed.ordering != counterparty.ordering {
        return Err(ChannelError::incompatible_upgrade(format!(
            "ordering mismatch: {} vs counterparty {}",
            proposed.ordering, counterparty.ordering
        )));
    }

    if proposed.version != counterparty.version {
        return Err(ChannelError::incompatible_upgrade(format!(
            "version mismatch: {} vs counterparty {}",
            proposed.version, counterparty.version
        )));
    }

    let proposed_conn_id = proposed.connection_hop()?;
    let proposed_conn_end = ctx.connection_end(proposed_conn_id).map_err(|e| {
        ChannelError::incompatible_upgrade(format!(
            "proposed connection {proposed_conn_id}: {e}"
        ))
    })?;
    if !proposed_conn_end.is_open() {
        return Err(ChannelError::incompatible_upgrade(format!(
            "proposed connection {proposed_conn_id} is not open"
        )));
    }

    let counterparty_hop = counterparty.connection_hop()?;
    if proposed_conn_end.counterparty().connection_id() != Some(counterparty_hop) {
        return Err(ChannelError::incompatible_upgrade(format!(
            "connection hop mismatch: {proposed_conn_id} does not lead to counterparty {counterparty_hop}"
        )));
    }

    Ok(())
}

/// Verifies a membership proof against the light client of the connection
/// the channel currently runs over.
fn verify_membership<Ctx>(
    ctx: &Ctx,
    chan_end: &ChannelEnd,
    proof: &CommitmentProofBytes,
    proof_height: Height,
    path: Path,
    value: Vec<u8>,
) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    let conn_end: ConnectionEnd = ctx.connection_end(chan_end.connection_hop()?)?;

    let client_id = conn_end.client_id();
    let client_val_ctx = ctx.get_client_validation_context();
    let client_state = client_val_ctx.client_state(client_id)?;

    client_state
        .status(client_val_ctx, client_id)?
        .verify_is_active()?;

    client_state.validate_proof_height(proof_height)?;

    let consensus_state = client_val_ctx.consensus_state(client_id, &proof_height)?;

    client_state
        .verify_membership(
            conn_end.counterparty().prefix(),
            proof,
            consensus_state.root(),
            path,
            value,
        )
        .map_err(ChannelError::FailedProofVerification)?;

    Ok(())
}
