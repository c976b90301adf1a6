use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::error::ChannelError;
use ibc_core::channel::types::upgrade::UpgradeTimeout;
use ibc_core::channel::types::Version;
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::error::IdentifierError;
use ibc_core::host::types::identifiers::{ConnectionId, Sequence};
use ibc_core::host::types::path::ChannelEndPath;
use ibc_core::host::ExecutionContext;
use ibc_testkit::relayer::context::{RelayerConfig, RelayerContext};
use ibc_testkit::relayer::error::RelayerError;
use ibc_testkit::testapp::ibc::applications::mock_app::{
    MockModule, MOCK_APP_VERSION_V1, MOCK_APP_VERSION_V2,
};
use rstest::*;

use super::{channel_error, count_events, timeout_in_blocks};

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

#[rstest]
fn chan_upgrade_init_happy_path(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    let outcome = relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();
    assert!(outcome.is_success());

    let chain_a = relayer.chain_a();
    let chan_end = chain_a.channel();
    assert_eq!(*chan_end.state(), State::Open);
    assert_eq!(chan_end.upgrade_sequence(), Sequence::from(1));
    // the channel keeps running its current fields
    assert_eq!(chan_end.version().as_str(), MOCK_APP_VERSION_V1);

    let upgrade = chain_a.upgrade().expect("proposal stored");
    assert_eq!(upgrade.fields, fields);
    assert_eq!(upgrade.timeout, timeout);
    assert_eq!(upgrade.latest_sequence_send, Sequence::from(0));

    let events = chain_a.ctx.get_events();
    assert_eq!(events.len(), 2);
    match &events[1] {
        IbcEvent::UpgradeInitChannel(event) => {
            assert_eq!(*event.upgrade_sequence(), Sequence::from(1));
            assert_eq!(event.version(), &fields.version);
        }
        event => panic!("unexpected event {event:?}"),
    }
}

#[rstest]
fn chan_upgrade_init_records_the_latest_sent_packet(mut relayer: RelayerContext) {
    let chain_a = relayer.chain_a_mut();
    for data in [b"first", b"secnd", b"third"] {
        chain_a
            .ctx
            .send_packet(&chain_a.port_id, &chain_a.chan_id, data)
            .unwrap();
    }

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();

    let upgrade = relayer.chain_a().upgrade().expect("proposal stored");
    assert_eq!(upgrade.latest_sequence_send, Sequence::from(3));
}

#[rstest]
fn chan_upgrade_init_replaces_a_pending_proposal(mut relayer: RelayerContext) {
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    relayer
        .upgrade_init_on_a(relayer.upgrade_fields_to(MOCK_APP_VERSION_V2), timeout)
        .unwrap();

    let mut fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    fields.connection_hops = vec![ConnectionId::new(1)];
    relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();

    let chain_a = relayer.chain_a();
    assert_eq!(chain_a.channel().upgrade_sequence(), Sequence::from(2));
    assert_eq!(chain_a.upgrade().expect("proposal stored").fields, fields);

    let receipt = chain_a
        .ctx
        .upgrade_error(&chain_a.port_id, &chain_a.chan_id)
        .expect("first proposal was aborted");
    assert_eq!(receipt.sequence, Sequence::from(1));
    assert_eq!(
        count_events(&chain_a.ctx, |e| matches!(e, IbcEvent::UpgradeErrorChannel(_))),
        1
    );
}

#[rstest]
fn chan_upgrade_init_fails_with_identical_fields(mut relayer: RelayerContext) {
    let fields = relayer.chain_a().channel().fields();
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    let err = channel_error(relayer.upgrade_init_on_a(fields, timeout));
    assert!(matches!(err, ChannelError::InvalidUpgrade { .. }));
    assert_eq!(
        relayer.chain_a().channel().upgrade_sequence(),
        Sequence::from(0)
    );
}

#[rstest]
fn chan_upgrade_init_fails_without_connection_hops(mut relayer: RelayerContext) {
    let mut fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    fields.connection_hops = vec![];
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    let err = channel_error(relayer.upgrade_init_on_a(fields, timeout));
    assert!(matches!(
        err,
        ChannelError::InvalidConnectionHopsLength {
            expected: 1,
            actual: 0
        }
    ));
    assert!(relayer.chain_a().upgrade().is_none());
}

#[rstest]
fn chan_upgrade_init_fails_without_timeout(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);

    let err = channel_error(relayer.upgrade_init_on_a(fields, UpgradeTimeout::default()));
    assert!(matches!(err, ChannelError::InvalidUpgrade { .. }));
    assert!(relayer.chain_a().upgrade().is_none());
}

#[rstest]
fn chan_upgrade_init_fails_with_blank_version(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to("   ");
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    let err = channel_error(relayer.upgrade_init_on_a(fields, timeout));
    assert!(matches!(err, ChannelError::InvalidVersion { .. }));
}

#[rstest]
fn chan_upgrade_init_fails_on_unknown_connection(mut relayer: RelayerContext) {
    let mut fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    fields.connection_hops = vec![ConnectionId::new(7)];
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    let res = relayer.upgrade_init_on_a(fields, timeout);
    assert!(matches!(
        res,
        Err(RelayerError::TransactionFailed(ContextError::HostError(_)))
    ));
}

#[rstest]
fn chan_upgrade_init_fails_while_upgrading(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();
    relayer.upgrade_ack_on_a().unwrap();

    let err = channel_error(relayer.upgrade_init_on_a(fields, timeout));
    assert!(matches!(err, ChannelError::InvalidState { .. }));
    assert_eq!(*relayer.chain_a().channel().state(), State::FlushComplete);
}

#[test_log::test]
fn chan_upgrade_init_fails_when_the_application_refuses() {
    let mut relayer = RelayerConfig::builder()
        .module_a(MockModule::with_supported_versions(vec![Version::from(
            MOCK_APP_VERSION_V1,
        )]))
        .build();

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    let err = channel_error(relayer.upgrade_init_on_a(fields, timeout));
    assert!(matches!(err, ChannelError::AppModule { .. }));
    assert!(relayer.chain_a().upgrade().is_none());
}

#[rstest]
fn chan_upgrade_init_fails_when_the_sequence_cannot_advance(mut relayer: RelayerContext) {
    let chain_a = relayer.chain_a_mut();
    let mut chan_end = chain_a.channel();
    chan_end.set_upgrade_sequence(Sequence::from(u64::MAX));
    chain_a
        .ctx
        .store_channel(
            &ChannelEndPath::new(&chain_a.port_id, &chain_a.chan_id),
            chan_end,
        )
        .unwrap();

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    let res = relayer.upgrade_init_on_a(fields, timeout);

    assert!(matches!(
        channel_error(res),
        ChannelError::InvalidIdentifier(IdentifierError::SequenceOverflow { .. })
    ));

    let chain_a = relayer.chain_a();
    assert_eq!(
        chain_a.channel().upgrade_sequence(),
        Sequence::from(u64::MAX)
    );
    assert!(chain_a.upgrade().is_none());
}
