use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::error::ChannelError;
use ibc_core::channel::types::upgrade::{ErrorReceipt, UpgradeTimeout};
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::Sequence;
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::relayer::utils::RelayerOps;
use ibc_testkit::testapp::ibc::applications::mock_app::{MOCK_APP_VERSION_V1, MOCK_APP_VERSION_V2};
use rstest::*;

use super::{advance_until_elapsed, channel_error, timeout_in_blocks};

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

/// Runs the handshake up to ACK with one packet stuck on A, so that A keeps
/// flushing. Returns the timeout of the attempt.
fn stuck_flushing(relayer: &mut RelayerContext, timeout_blocks: u64) -> UpgradeTimeout {
    let chain_a = relayer.chain_a_mut();
    chain_a
        .ctx
        .send_packet(&chain_a.port_id, &chain_a.chan_id, b"data")
        .unwrap();

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, timeout_blocks);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();
    relayer.upgrade_ack_on_a().unwrap();
    assert_eq!(*relayer.chain_a().channel().state(), State::Flushing);

    timeout
}

#[rstest]
fn chan_upgrade_timeout_happy_path(mut relayer: RelayerContext) {
    let timeout = stuck_flushing(&mut relayer, 10);
    advance_until_elapsed(&mut relayer.chain_a_mut().ctx, &timeout);

    relayer.upgrade_timeout_on_a().unwrap();

    let chain_a = relayer.chain_a();
    let chan_end = chain_a.channel();
    assert_eq!(*chan_end.state(), State::Open);
    assert_eq!(chan_end.version().as_str(), MOCK_APP_VERSION_V1);
    assert!(chain_a.upgrade().is_none());
    assert_eq!(
        chain_a.ctx.upgrade_error(&chain_a.port_id, &chain_a.chan_id),
        Some(ErrorReceipt::new(Sequence::from(1), 34))
    );

    let events = chain_a.ctx.get_events();
    assert!(matches!(
        events.last(),
        Some(IbcEvent::UpgradeTimeoutChannel(event)) if event.timeout() == timeout
    ));

    // B cancels with the receipt A wrote on timeout
    relayer.upgrade_cancel_on_b().unwrap();

    let chain_b = relayer.chain_b();
    assert_eq!(*chain_b.channel().state(), State::Open);
    assert!(chain_b.upgrade().is_none());
    assert_eq!(
        chain_b.channel().version().as_str(),
        MOCK_APP_VERSION_V1
    );
}

#[rstest]
fn chan_upgrade_timeout_fails_before_the_timeout(mut relayer: RelayerContext) {
    stuck_flushing(&mut relayer, 100);

    let err = channel_error(relayer.upgrade_timeout_on_a());
    assert!(matches!(err, ChannelError::UpgradeTimeoutNotReached { .. }));
    assert_eq!(*relayer.chain_a().channel().state(), State::Flushing);
}

#[rstest]
fn chan_upgrade_timeout_fails_once_the_counterparty_flushed(mut relayer: RelayerContext) {
    let timeout = stuck_flushing(&mut relayer, 10);
    relayer.upgrade_confirm_on_b().unwrap();
    assert_eq!(*relayer.chain_b().channel().state(), State::FlushComplete);

    advance_until_elapsed(&mut relayer.chain_a_mut().ctx, &timeout);

    let err = channel_error(relayer.upgrade_timeout_on_a());
    assert!(matches!(err, ChannelError::InvalidState { .. }));
}

#[rstest]
fn chan_upgrade_timeout_fails_once_the_counterparty_opened(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 10);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();
    relayer.upgrade_ack_on_a().unwrap();
    relayer.upgrade_confirm_on_b().unwrap();
    assert_eq!(*relayer.chain_b().channel().state(), State::Open);

    advance_until_elapsed(&mut relayer.chain_a_mut().ctx, &timeout);

    let err = channel_error(relayer.upgrade_timeout_on_a());
    assert!(matches!(err, ChannelError::UpgradeTimeoutFailed { .. }));

    // A can still complete the upgrade
    relayer.upgrade_open_on_a().unwrap();
    assert_eq!(
        relayer.chain_a().channel().version().as_str(),
        MOCK_APP_VERSION_V2
    );
}

#[rstest]
fn chan_upgrade_timeout_fails_on_an_open_channel(mut relayer: RelayerContext) {
    let err = channel_error(relayer.upgrade_timeout_on_a());
    assert!(matches!(err, ChannelError::InvalidState { .. }));
}

#[rstest]
fn chan_upgrade_timeout_rejects_an_unproven_counterparty(mut relayer: RelayerContext) {
    let timeout = stuck_flushing(&mut relayer, 10);
    advance_until_elapsed(&mut relayer.chain_a_mut().ctx, &timeout);
    relayer.update_client_on_a().unwrap();

    let mut msg = RelayerOps::build_upgrade_timeout(
        relayer.chain_a(),
        relayer.chain_b(),
        relayer.signer().clone(),
    )
    .unwrap();
    msg.counterparty_channel.set_upgrade_sequence(Sequence::from(4));

    let err = channel_error(relayer.chain_a_mut().deliver(msg));
    assert!(matches!(err, ChannelError::FailedProofVerification(_)));
    assert!(relayer.chain_a().upgrade().is_some());
}
