use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::error::ChannelError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::Sequence;
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::relayer::utils::RelayerOps;
use ibc_testkit::testapp::ibc::applications::mock_app::MOCK_APP_VERSION_V2;
use rstest::*;

use super::{aborted_code, advance_until_elapsed, channel_error, count_events, timeout_in_blocks};

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

/// Runs the handshake up to ACK, with `packets` packets sent on A before it
/// proposed.
fn acked(mut relayer: RelayerContext, packets: usize, timeout_blocks: u64) -> RelayerContext {
    let chain_a = relayer.chain_a_mut();
    for _ in 0..packets {
        chain_a
            .ctx
            .send_packet(&chain_a.port_id, &chain_a.chan_id, b"data")
            .unwrap();
    }

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, timeout_blocks);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();
    relayer.upgrade_ack_on_a().unwrap();
    relayer
}

#[rstest]
fn chan_upgrade_confirm_opens_when_both_ends_flushed(relayer: RelayerContext) {
    let mut relayer = acked(relayer, 0, 100);

    let outcome = relayer.upgrade_confirm_on_b().unwrap();
    assert!(outcome.is_success());

    let chain_b = relayer.chain_b();
    assert_eq!(*chain_b.channel().state(), State::Open);
    assert_eq!(
        chain_b.channel().version().as_str(),
        MOCK_APP_VERSION_V2
    );
    assert!(chain_b.upgrade().is_none());
    assert_eq!(
        count_events(&chain_b.ctx, |e| matches!(e, IbcEvent::UpgradeConfirmChannel(_))),
        1
    );
    assert_eq!(
        count_events(&chain_b.ctx, |e| matches!(e, IbcEvent::UpgradeOpenChannel(_))),
        1
    );
}

#[rstest]
fn chan_upgrade_confirm_waits_for_the_counterparty_flush(relayer: RelayerContext) {
    let mut relayer = acked(relayer, 3, 100);
    assert_eq!(*relayer.chain_a().channel().state(), State::Flushing);

    relayer.upgrade_confirm_on_b().unwrap();

    let chain_b = relayer.chain_b();
    assert_eq!(*chain_b.channel().state(), State::FlushComplete);
    assert!(chain_b.upgrade().is_some());
    assert_eq!(
        chain_b
            .ctx
            .counterparty_upgrade(&chain_b.port_id, &chain_b.chan_id)
            .expect("counterparty proposal stored")
            .latest_sequence_send,
        Sequence::from(3)
    );
    assert_eq!(
        count_events(&chain_b.ctx, |e| matches!(e, IbcEvent::UpgradeOpenChannel(_))),
        0
    );
}

#[rstest]
fn chan_upgrade_confirm_fails_when_not_flushing(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();

    // B never answered A's proposal
    let err = channel_error(relayer.upgrade_confirm_on_b());
    assert!(matches!(err, ChannelError::InvalidState { .. }));
}

#[rstest]
fn chan_upgrade_confirm_rejects_a_misreported_counterparty_state(relayer: RelayerContext) {
    let mut relayer = acked(relayer, 3, 100);
    relayer.update_client_on_b().unwrap();

    let mut msg = RelayerOps::build_upgrade_confirm(
        relayer.chain_b(),
        relayer.chain_a(),
        relayer.signer().clone(),
    )
    .unwrap();
    // A is still flushing
    msg.counterparty_channel_state = State::FlushComplete;

    let err = channel_error(relayer.chain_b_mut().deliver(msg));
    assert!(matches!(err, ChannelError::FailedProofVerification(_)));
    assert_eq!(*relayer.chain_b().channel().state(), State::Flushing);
}

#[rstest]
fn chan_upgrade_confirm_aborts_on_an_elapsed_timeout(relayer: RelayerContext) {
    let mut relayer = acked(relayer, 0, 10);
    let timeout = relayer.chain_a().upgrade().expect("proposal on A").timeout;

    advance_until_elapsed(&mut relayer.chain_b_mut().ctx, &timeout);

    let outcome = relayer.upgrade_confirm_on_b().unwrap();
    assert_eq!(aborted_code(&outcome), 40);

    let chain_b = relayer.chain_b();
    assert_eq!(*chain_b.channel().state(), State::Open);
    assert_eq!(
        chain_b.channel().version(),
        relayer.chain_a().channel().version()
    );
    assert!(chain_b.upgrade().is_none());
}
