use ibc_core::channel::flush::{inflight_packets, recv_packet_allowed};
use ibc_core::channel::handler::abort_upgrade;
use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::error::{ChannelError, PacketError};
use ibc_core::channel::types::upgrade::{ErrorReceipt, UpgradeError};
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::Sequence;
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::testapp::ibc::applications::mock_app::{MOCK_APP_VERSION_V1, MOCK_APP_VERSION_V2};
use rstest::*;

use super::{aborted_code, advance_until_elapsed, count_events, timeout_in_blocks};

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

fn send_packets(relayer: &mut RelayerContext, count: u64) {
    let chain_a = relayer.chain_a_mut();
    for _ in 0..count {
        chain_a
            .ctx
            .send_packet(&chain_a.port_id, &chain_a.chan_id, b"packet")
            .unwrap();
    }
}

/// Sends five packets on A, then runs the handshake until A is flushing.
fn flushing_with_five_packets(relayer: &mut RelayerContext, timeout_blocks: u64) {
    send_packets(relayer, 5);

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, timeout_blocks);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();
    relayer.upgrade_ack_on_a().unwrap();
}

#[rstest]
fn packets_in_flight_are_flushed_before_opening(mut relayer: RelayerContext) {
    flushing_with_five_packets(&mut relayer, 100);
    relayer.upgrade_confirm_on_b().unwrap();

    assert_eq!(*relayer.chain_a().channel().state(), State::Flushing);
    assert_eq!(*relayer.chain_b().channel().state(), State::FlushComplete);

    let chain_a = relayer.chain_a_mut();
    for seq in 1..=5u64 {
        let state = *chain_a.channel().state();
        assert_eq!(state, State::Flushing);

        let outcome = chain_a
            .ctx
            .clear_packet(&chain_a.port_id, &chain_a.chan_id, Sequence::from(seq))
            .unwrap();
        assert!(outcome.is_success());
    }
    assert_eq!(*chain_a.channel().state(), State::FlushComplete);
    assert_eq!(
        count_events(&chain_a.ctx, |e| matches!(e, IbcEvent::FlushCompleteChannel(_))),
        1
    );
    chain_a.ctx.advance_block();

    relayer.upgrade_open_on_a().unwrap();
    relayer.upgrade_open_on_b().unwrap();

    for chain in [relayer.chain_a(), relayer.chain_b()] {
        let chan_end = chain.channel();
        assert_eq!(*chan_end.state(), State::Open);
        assert_eq!(chan_end.version().as_str(), MOCK_APP_VERSION_V2);
        assert!(chain.upgrade().is_none());
    }
}

#[rstest]
fn packets_past_the_timeout_abort_the_upgrade(mut relayer: RelayerContext) {
    flushing_with_five_packets(&mut relayer, 10);
    let timeout = relayer.chain_a().upgrade().expect("proposal on A").timeout;

    let chain_a = relayer.chain_a_mut();
    advance_until_elapsed(&mut chain_a.ctx, &timeout);

    let outcome = chain_a
        .ctx
        .clear_packet(&chain_a.port_id, &chain_a.chan_id, Sequence::from(1))
        .unwrap();
    assert_eq!(aborted_code(&outcome), 34);

    let receipt = chain_a
        .ctx
        .upgrade_error(&chain_a.port_id, &chain_a.chan_id)
        .expect("receipt written");
    assert_eq!(receipt, ErrorReceipt::new(Sequence::from(1), 34));
    assert_eq!(
        receipt.message,
        "ABCI code: 34: restored channel to pre-upgrade state"
    );

    let chan_end = chain_a.channel();
    assert_eq!(*chan_end.state(), State::Open);
    assert_eq!(chan_end.version().as_str(), MOCK_APP_VERSION_V1);
    assert_eq!(chan_end.upgrade_sequence(), Sequence::from(1));
    assert!(chain_a.upgrade().is_none());
    assert!(chain_a
        .ctx
        .counterparty_upgrade(&chain_a.port_id, &chain_a.chan_id)
        .is_none());

    // the receipt lets B give up too
    chain_a.ctx.advance_block();
    relayer.upgrade_cancel_on_b().unwrap();
    assert_eq!(*relayer.chain_b().channel().state(), State::Open);
}

#[rstest]
fn inflight_packets_stop_at_the_upgrade_watermark(mut relayer: RelayerContext) {
    flushing_with_five_packets(&mut relayer, 100);

    // sending is paused while flushing, so nothing above the watermark exists
    let chain_a = relayer.chain_a();
    let inflight = inflight_packets(&chain_a.ctx, &chain_a.port_id, &chain_a.chan_id).unwrap();
    assert_eq!(inflight, (1..=5u64).map(Sequence::from).collect::<Vec<_>>());
}

#[rstest]
fn sending_is_paused_while_upgrading(mut relayer: RelayerContext) {
    flushing_with_five_packets(&mut relayer, 100);

    let chain_a = relayer.chain_a_mut();
    let res = chain_a
        .ctx
        .send_packet(&chain_a.port_id, &chain_a.chan_id, b"late");
    assert!(matches!(
        res,
        Err(ContextError::PacketError(PacketError::SendNotAllowed {
            state: State::Flushing,
            ..
        }))
    ));
}

#[rstest]
fn sending_resumes_after_the_upgrade(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_channel(fields, timeout).unwrap();

    let chain_a = relayer.chain_a_mut();
    let seq = chain_a
        .ctx
        .send_packet(&chain_a.port_id, &chain_a.chan_id, b"after")
        .unwrap();
    assert_eq!(seq, Sequence::from(1));
}

#[rstest]
fn received_packets_are_bounded_by_the_counterparty_watermark(mut relayer: RelayerContext) {
    flushing_with_five_packets(&mut relayer, 100);

    let chain_b = relayer.chain_b();
    assert_eq!(*chain_b.channel().state(), State::Flushing);

    let allowed = |seq: u64| {
        recv_packet_allowed(
            &chain_b.ctx,
            &chain_b.port_id,
            &chain_b.chan_id,
            Sequence::from(seq),
        )
    };

    assert!(allowed(1).is_ok());
    assert!(allowed(5).is_ok());
    assert!(matches!(
        allowed(6),
        Err(ContextError::PacketError(
            PacketError::SequenceAboveUpgradeWatermark { .. }
        ))
    ));
    assert!(matches!(
        allowed(0),
        Err(ContextError::PacketError(PacketError::ZeroPacketSequence))
    ));
}

#[rstest]
fn clearing_an_unknown_packet_fails(mut relayer: RelayerContext) {
    flushing_with_five_packets(&mut relayer, 100);

    let chain_a = relayer.chain_a_mut();
    let res = chain_a
        .ctx
        .clear_packet(&chain_a.port_id, &chain_a.chan_id, Sequence::from(9));
    assert!(matches!(
        res,
        Err(ContextError::PacketError(PacketError::MissingPacketCommitment(seq)))
            if seq == Sequence::from(9)
    ));
    assert_eq!(*chain_a.channel().state(), State::Flushing);
}

#[rstest]
fn aborting_twice_writes_one_receipt(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();

    let chain_a = relayer.chain_a_mut();
    let upgrade_error = UpgradeError::new(
        Sequence::from(1),
        ChannelError::invalid_upgrade("aborted by the host"),
    );

    for _ in 0..2 {
        abort_upgrade(
            &mut chain_a.ctx,
            &chain_a.port_id,
            &chain_a.chan_id,
            &upgrade_error,
        )
        .unwrap();
    }

    assert_eq!(
        count_events(&chain_a.ctx, |e| matches!(e, IbcEvent::UpgradeErrorChannel(_))),
        1
    );
    assert_eq!(
        chain_a.ctx.upgrade_error(&chain_a.port_id, &chain_a.chan_id),
        Some(ErrorReceipt::new(Sequence::from(1), 28))
    );
    assert_eq!(*chain_a.channel().state(), State::Open);
    assert!(chain_a.upgrade().is_none());
}
