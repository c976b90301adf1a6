use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::error::ChannelError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::Sequence;
use ibc_testkit::relayer::context::{RelayerConfig, RelayerContext};
use ibc_testkit::relayer::utils::RelayerOps;
use ibc_testkit::testapp::ibc::applications::mock_app::{
    MockModule, MOCK_APP_VERSION_V2, MOCK_APP_VERSION_V3,
};
use rstest::*;

use super::{aborted_code, advance_until_elapsed, channel_error, count_events, timeout_in_blocks};

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

#[rstest]
fn chan_upgrade_ack_happy_path(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();

    let outcome = relayer.upgrade_ack_on_a().unwrap();
    assert!(outcome.is_success());

    let chain_a = relayer.chain_a();
    assert_eq!(*chain_a.channel().state(), State::FlushComplete);

    let upgrade = chain_a.upgrade().expect("proposal on A");
    assert_eq!(upgrade.fields, fields);

    let upgrade_on_b = relayer.chain_b().upgrade().expect("proposal on B");
    assert_eq!(
        chain_a
            .ctx
            .counterparty_upgrade(&chain_a.port_id, &chain_a.chan_id),
        Some(upgrade_on_b)
    );
    assert_eq!(
        count_events(&chain_a.ctx, |e| matches!(e, IbcEvent::UpgradeAckChannel(_))),
        1
    );
}

#[rstest]
fn chan_upgrade_ack_starts_flushing_with_packets_in_flight(mut relayer: RelayerContext) {
    let chain_a = relayer.chain_a_mut();
    for _ in 0..2 {
        chain_a
            .ctx
            .send_packet(&chain_a.port_id, &chain_a.chan_id, b"data")
            .unwrap();
    }

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();
    relayer.upgrade_ack_on_a().unwrap();

    let chain_a = relayer.chain_a();
    assert_eq!(*chain_a.channel().state(), State::Flushing);
    assert_eq!(
        chain_a.upgrade().expect("proposal on A").latest_sequence_send,
        Sequence::from(2)
    );
}

#[rstest]
fn chan_upgrade_ack_fails_without_pending_proposal(mut relayer: RelayerContext) {
    // B holds a proposal A knows nothing about
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_b(fields, timeout).unwrap();

    let err = channel_error(relayer.upgrade_ack_on_a());
    assert!(matches!(err, ChannelError::MissingUpgrade { .. }));
}

#[rstest]
fn chan_upgrade_ack_fails_before_the_counterparty_tried(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();
    relayer.upgrade_init_on_b(fields, timeout).unwrap();

    // B only proposed; its channel is not flushing yet
    let err = channel_error(relayer.upgrade_ack_on_a());
    assert!(matches!(err, ChannelError::FailedProofVerification(_)));
    assert_eq!(*relayer.chain_a().channel().state(), State::Open);
}

#[rstest]
fn chan_upgrade_ack_rejects_a_tampered_proposal(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();
    relayer.update_client_on_a().unwrap();

    let mut msg = RelayerOps::build_upgrade_ack(
        relayer.chain_a(),
        relayer.chain_b(),
        relayer.signer().clone(),
    )
    .unwrap();
    msg.counterparty_upgrade.fields.version = MOCK_APP_VERSION_V3.into();

    let err = channel_error(relayer.chain_a_mut().deliver(msg));
    assert!(matches!(err, ChannelError::FailedProofVerification(_)));
}

#[test_log::test]
fn chan_upgrade_ack_aborts_when_the_application_refuses() {
    let mut relayer = RelayerConfig::builder()
        .module_a(MockModule::default().refusing_ack())
        .build();

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();

    let outcome = relayer.upgrade_ack_on_a().unwrap();
    assert_eq!(aborted_code(&outcome), 1);

    let chain_a = relayer.chain_a();
    assert_eq!(*chain_a.channel().state(), State::Open);
    assert!(chain_a.upgrade().is_none());
    assert!(chain_a
        .ctx
        .counterparty_upgrade(&chain_a.port_id, &chain_a.chan_id)
        .is_none());
    assert_eq!(
        chain_a
            .ctx
            .upgrade_error(&chain_a.port_id, &chain_a.chan_id)
            .expect("receipt written")
            .sequence,
        Sequence::from(1)
    );

    // B learns about the abort from A's receipt
    relayer.upgrade_cancel_on_b().unwrap();

    let chain_b = relayer.chain_b();
    assert_eq!(*chain_b.channel().state(), State::Open);
    assert!(chain_b.upgrade().is_none());
    assert_eq!(chain_b.channel().upgrade_sequence(), Sequence::from(1));
}

#[rstest]
fn chan_upgrade_ack_aborts_on_an_elapsed_timeout(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 5);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();

    advance_until_elapsed(&mut relayer.chain_a_mut().ctx, &timeout);

    let outcome = relayer.upgrade_ack_on_a().unwrap();
    assert_eq!(aborted_code(&outcome), 40);
    assert_eq!(*relayer.chain_a().channel().state(), State::Open);
    assert!(relayer.chain_a().upgrade().is_none());
}
