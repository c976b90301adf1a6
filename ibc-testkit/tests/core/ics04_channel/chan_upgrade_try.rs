use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::error::ChannelError;
use ibc_core::channel::types::upgrade::UpgradeTimeout;
use ibc_core::channel::types::Version;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::Sequence;
use ibc_testkit::relayer::context::{RelayerConfig, RelayerContext};
use ibc_testkit::relayer::utils::RelayerOps;
use ibc_testkit::testapp::ibc::applications::mock_app::{
    MockModule, MOCK_APP_VERSION_V1, MOCK_APP_VERSION_V2,
};
use rstest::*;

use super::{aborted_code, channel_error, count_events, timeout_in_blocks};

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

fn init_on_a(relayer: &mut RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
}

#[rstest]
fn chan_upgrade_try_happy_path(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);
    let upgrade_on_a = relayer.chain_a().upgrade().expect("proposal on A");

    let outcome = relayer.upgrade_try_on_b().unwrap();
    assert!(outcome.is_success());

    let chain_b = relayer.chain_b();
    let chan_end = chain_b.channel();
    assert_eq!(*chan_end.state(), State::Flushing);
    assert_eq!(chan_end.upgrade_sequence(), Sequence::from(1));
    assert_eq!(chan_end.version().as_str(), MOCK_APP_VERSION_V1);

    let upgrade = chain_b.upgrade().expect("proposal on B");
    assert_eq!(upgrade.fields, upgrade_on_a.fields);
    assert_eq!(upgrade.timeout, upgrade_on_a.timeout);
    assert_eq!(upgrade.latest_sequence_send, Sequence::from(0));

    assert_eq!(
        chain_b
            .ctx
            .counterparty_upgrade(&chain_b.port_id, &chain_b.chan_id),
        Some(upgrade_on_a)
    );
    assert_eq!(
        count_events(&chain_b.ctx, |e| matches!(e, IbcEvent::UpgradeTryChannel(_))),
        1
    );
}

#[rstest]
fn chan_upgrade_try_fails_without_counterparty_proposal(relayer: RelayerContext) {
    let chain_a = relayer.chain_a();
    let chain_b = relayer.chain_b();

    assert!(RelayerOps::build_upgrade_try(chain_b, chain_a, relayer.signer().clone()).is_err());
}

#[rstest]
fn chan_upgrade_try_rejects_an_inflated_counterparty_sequence(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);
    relayer.update_client_on_b().unwrap();

    let mut msg = RelayerOps::build_upgrade_try(
        relayer.chain_b(),
        relayer.chain_a(),
        relayer.signer().clone(),
    )
    .unwrap();
    msg.counterparty_upgrade_sequence = Sequence::from(5);

    let err = channel_error(relayer.chain_b_mut().deliver(msg));
    assert!(matches!(err, ChannelError::FailedProofVerification(_)));

    let chan_end_on_b = relayer.chain_b().channel();
    assert_eq!(chan_end_on_b.upgrade_sequence(), Sequence::from(0));
    assert_eq!(*chan_end_on_b.state(), State::Open);
    assert!(relayer.chain_b().upgrade().is_none());
}

#[rstest]
fn chan_upgrade_try_rejects_a_tampered_proposal(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);
    relayer.update_client_on_b().unwrap();

    let mut msg = RelayerOps::build_upgrade_try(
        relayer.chain_b(),
        relayer.chain_a(),
        relayer.signer().clone(),
    )
    .unwrap();
    msg.counterparty_upgrade.latest_sequence_send = Sequence::from(42);

    let err = channel_error(relayer.chain_b_mut().deliver(msg));
    assert!(matches!(err, ChannelError::FailedProofVerification(_)));
}

#[rstest]
fn chan_upgrade_try_rejects_a_replayed_attempt(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);
    relayer.update_client_on_b().unwrap();

    let msg = RelayerOps::build_upgrade_try(
        relayer.chain_b(),
        relayer.chain_a(),
        relayer.signer().clone(),
    )
    .unwrap();

    relayer.chain_b_mut().deliver(msg.clone()).unwrap();
    relayer.upgrade_ack_on_a().unwrap();
    relayer.upgrade_confirm_on_b().unwrap();
    relayer.upgrade_open_on_a().unwrap();

    let err = channel_error(relayer.chain_b_mut().deliver(msg));
    assert!(matches!(
        err,
        ChannelError::InvalidUpgradeSequence { expected, actual }
            if expected == Sequence::from(2) && actual == Sequence::from(1)
    ));
    assert_eq!(
        relayer.chain_b().channel().upgrade_sequence(),
        Sequence::from(1)
    );
}

#[rstest]
fn chan_upgrade_try_fails_on_a_non_open_channel(mut relayer: RelayerContext) {
    init_on_a(&mut relayer);
    relayer.upgrade_try_on_b().unwrap();

    let err = channel_error(relayer.upgrade_try_on_b());
    assert!(matches!(err, ChannelError::InvalidState { .. }));
}

#[test_log::test]
fn chan_upgrade_try_aborts_when_the_application_refuses() {
    let mut relayer = RelayerConfig::builder()
        .module_b(MockModule::with_supported_versions(vec![Version::from(
            MOCK_APP_VERSION_V1,
        )]))
        .build();
    init_on_a(&mut relayer);

    let outcome = relayer.upgrade_try_on_b().unwrap();
    assert_eq!(aborted_code(&outcome), 1);

    let chain_b = relayer.chain_b();
    let chan_end = chain_b.channel();
    assert_eq!(*chan_end.state(), State::Open);
    // the attempt is recorded even though it was refused
    assert_eq!(chan_end.upgrade_sequence(), Sequence::from(1));
    assert!(chain_b.upgrade().is_none());

    let receipt = chain_b
        .ctx
        .upgrade_error(&chain_b.port_id, &chain_b.chan_id)
        .expect("receipt written");
    assert_eq!(receipt.sequence, Sequence::from(1));
    assert_eq!(
        receipt.message,
        "ABCI code: 1: restored channel to pre-upgrade state"
    );
    assert_eq!(
        count_events(&chain_b.ctx, |e| matches!(e, IbcEvent::UpgradeErrorChannel(_))),
        1
    );
}

#[rstest]
#[case::height(true)]
#[case::timestamp(false)]
fn chan_upgrade_try_aborts_on_an_elapsed_timeout(
    mut relayer: RelayerContext,
    #[case] by_height: bool,
) {
    let chain_b = relayer.chain_b();
    let timeout = if by_height {
        UpgradeTimeout::at_height(chain_b.ctx.latest_height())
    } else {
        UpgradeTimeout::at_timestamp(chain_b.ctx.latest_timestamp())
    };

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();

    let outcome = relayer.upgrade_try_on_b().unwrap();
    assert_eq!(aborted_code(&outcome), 40);

    let chain_b = relayer.chain_b();
    assert_eq!(*chain_b.channel().state(), State::Open);
    assert!(chain_b.upgrade().is_none());
    assert_eq!(
        chain_b
            .ctx
            .upgrade_error(&chain_b.port_id, &chain_b.chan_id)
            .expect("receipt written")
            .sequence,
        Sequence::from(1)
    );
}
