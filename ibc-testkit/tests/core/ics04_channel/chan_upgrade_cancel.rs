use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::error::ChannelError;
use ibc_core::channel::types::msgs::MsgChannelUpgradeCancel;
use ibc_core::channel::types::upgrade::ErrorReceipt;
use ibc_core::channel::types::Version;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::Sequence;
use ibc_core::host::types::path::ChannelEndPath;
use ibc_testkit::fixtures::core::signer::{dummy_account_id, dummy_upgrade_authority};
use ibc_testkit::relayer::context::{RelayerConfig, RelayerContext};
use ibc_testkit::relayer::utils::RelayerOps;
use ibc_testkit::testapp::ibc::applications::mock_app::{
    MockModule, MOCK_APP_VERSION_V1, MOCK_APP_VERSION_V2,
};
use rstest::*;

use super::{channel_error, count_events, timeout_in_blocks};

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

fn init_on_a(relayer: &mut RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
}

/// B only supports the current version, so it aborts A's proposal on TRY.
fn refused_by_b() -> RelayerContext {
    let mut relayer = RelayerConfig::builder()
        .module_b(MockModule::with_supported_versions(vec![Version::from(
            MOCK_APP_VERSION_V1,
        )]))
        .build();
    init_on_a(&mut relayer);
    let outcome = relayer.upgrade_try_on_b().unwrap();
    assert!(outcome.aborted().is_some());
    relayer
}

#[test_log::test]
fn chan_upgrade_cancel_with_counterparty_receipt() {
    let mut relayer = refused_by_b();

    relayer.upgrade_cancel_on_a().unwrap();

    let chain_a = relayer.chain_a();
    let chan_end = chain_a.channel();
    assert_eq!(*chan_end.state(), State::Open);
    assert_eq!(chan_end.version().as_str(), MOCK_APP_VERSION_V1);
    assert_eq!(chan_end.upgrade_sequence(), Sequence::from(1));
    assert!(chain_a.upgrade().is_none());

    assert_eq!(
        chain_a.ctx.upgrade_error(&chain_a.port_id, &chain_a.chan_id),
        Some(ErrorReceipt::new(Sequence::from(1), 28))
    );

    let events = chain_a.ctx.get_events();
    assert!(matches!(
        events.last(),
        Some(IbcEvent::UpgradeCancelledChannel(event))
            if *event.upgrade_sequence() == Sequence::from(1)
    ));
    assert_eq!(
        count_events(&chain_a.ctx, |e| matches!(e, IbcEvent::UpgradeErrorChannel(_))),
        1
    );
}

#[test_log::test]
fn chan_upgrade_cancel_moves_up_to_a_later_counterparty_attempt() {
    let mut relayer = refused_by_b();

    // B aborts a second, later attempt of its own
    let chain_b = relayer.chain_b_mut();
    let mut chan_end_on_b = chain_b.channel();
    chan_end_on_b.set_upgrade_sequence(Sequence::from(3));
    chain_b.ctx = chain_b
        .ctx
        .clone()
        .with_channel(chain_b.port_id.clone(), chain_b.chan_id.clone(), chan_end_on_b)
        .with_upgrade_error(
            chain_b.port_id.clone(),
            chain_b.chan_id.clone(),
            ErrorReceipt::new(Sequence::from(3), 1),
        );
    chain_b.ctx.advance_block();

    relayer.upgrade_cancel_on_a().unwrap();

    let chain_a = relayer.chain_a();
    assert_eq!(chain_a.channel().upgrade_sequence(), Sequence::from(3));
    assert_eq!(
        chain_a
            .ctx
            .upgrade_error(&chain_a.port_id, &chain_a.chan_id)
            .expect("receipt written")
            .sequence,
        Sequence::from(3)
    );
}

#[rstest]
fn chan_upgrade_cancel_by_the_authority(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);

    relayer
        .authority_cancel_on_a(dummy_upgrade_authority())
        .unwrap();

    let chain_a = relayer.chain_a();
    assert_eq!(*chain_a.channel().state(), State::Open);
    assert!(chain_a.upgrade().is_none());
    assert_eq!(
        chain_a.ctx.upgrade_error(&chain_a.port_id, &chain_a.chan_id),
        Some(ErrorReceipt::new(Sequence::from(1), 28))
    );
}

#[rstest]
fn chan_upgrade_cancel_without_receipt_requires_the_authority(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);

    let err = channel_error(relayer.authority_cancel_on_a(dummy_account_id()));
    assert!(matches!(err, ChannelError::UnauthorizedSigner { .. }));
    assert!(relayer.chain_a().upgrade().is_some());
}

#[rstest]
fn chan_upgrade_cancel_without_receipt_fails_once_flushed(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);
    relayer.upgrade_try_on_b().unwrap();
    relayer.upgrade_ack_on_a().unwrap();
    assert_eq!(*relayer.chain_a().channel().state(), State::FlushComplete);

    let err = channel_error(relayer.authority_cancel_on_a(dummy_upgrade_authority()));
    assert!(matches!(err, ChannelError::MissingUpgradeErrorReceipt { .. }));
}

#[rstest]
fn chan_upgrade_cancel_fails_without_upgrade(mut relayer: RelayerContext) {
    let err = channel_error(relayer.authority_cancel_on_a(dummy_upgrade_authority()));
    assert!(matches!(err, ChannelError::MissingUpgrade { .. }));
}

#[rstest]
fn chan_upgrade_cancel_twice_fails(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);
    relayer
        .authority_cancel_on_a(dummy_upgrade_authority())
        .unwrap();

    let err = channel_error(relayer.authority_cancel_on_a(dummy_upgrade_authority()));
    assert!(matches!(err, ChannelError::MissingUpgrade { .. }));
    assert_eq!(
        count_events(&relayer.chain_a().ctx, |e| matches!(
            e,
            IbcEvent::UpgradeCancelledChannel(_)
        )),
        1
    );
}

#[rstest]
#[case::flushing(false)]
#[case::flush_complete(true)]
fn chan_upgrade_cancel_rejects_a_stale_receipt(
    mut relayer: RelayerContext,
    #[case] flushed: bool,
) {
    init_on_a(&mut relayer);
    if flushed {
        relayer.upgrade_try_on_b().unwrap();
        relayer.upgrade_ack_on_a().unwrap();
    }
    relayer.update_client_on_a().unwrap();

    let chain_a = relayer.chain_a();
    let chain_b = relayer.chain_b();
    let proof_height = chain_b.ctx.latest_height();
    let proof = RelayerOps::proof(
        chain_b,
        proof_height,
        ChannelEndPath::new(&chain_b.port_id, &chain_b.chan_id).into(),
    )
    .unwrap();

    let msg = MsgChannelUpgradeCancel {
        port_id: chain_a.port_id.clone(),
        chan_id: chain_a.chan_id.clone(),
        error_receipt: Some(ErrorReceipt::new(Sequence::from(0), 28)),
        proof_error_receipt: Some(proof),
        proof_height: Some(proof_height),
        signer: relayer.signer().clone(),
    };

    let err = channel_error(relayer.chain_a_mut().deliver(msg));
    assert!(matches!(
        err,
        ChannelError::InvalidUpgradeSequence { expected, actual }
            if expected == Sequence::from(1) && actual == Sequence::from(0)
    ));
}

#[rstest]
fn chan_upgrade_cancel_rejects_an_unproven_receipt(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);
    relayer.update_client_on_a().unwrap();

    // B never wrote a receipt
    let chain_a = relayer.chain_a();
    let chain_b = relayer.chain_b();
    let proof_height = chain_b.ctx.latest_height();
    let proof = RelayerOps::proof(
        chain_b,
        proof_height,
        ChannelEndPath::new(&chain_b.port_id, &chain_b.chan_id).into(),
    )
    .unwrap();

    let msg = MsgChannelUpgradeCancel {
        port_id: chain_a.port_id.clone(),
        chan_id: chain_a.chan_id.clone(),
        error_receipt: Some(ErrorReceipt::new(Sequence::from(1), 28)),
        proof_error_receipt: Some(proof),
        proof_height: Some(proof_height),
        signer: relayer.signer().clone(),
    };

    let err = channel_error(relayer.chain_a_mut().deliver(msg));
    assert!(matches!(err, ChannelError::FailedProofVerification(_)));
    assert!(relayer.chain_a().upgrade().is_some());
}

#[rstest]
fn chan_upgrade_cancel_rejects_a_receipt_without_proof(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);

    let chain_a = relayer.chain_a();
    let msg = MsgChannelUpgradeCancel {
        port_id: chain_a.port_id.clone(),
        chan_id: chain_a.chan_id.clone(),
        error_receipt: Some(ErrorReceipt::new(Sequence::from(1), 28)),
        proof_error_receipt: None,
        proof_height: None,
        signer: relayer.signer().clone(),
    };

    let err = channel_error(relayer.chain_a_mut().deliver(msg));
    assert!(matches!(err, ChannelError::InvalidUpgradeErrorReceipt { .. }));
}
