use ibc_core::channel::types::channel::{Order, State};
use ibc_core::channel::types::upgrade::{UpgradeFields, UpgradeOutcome};
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::{ConnectionId, Sequence};
use ibc_testkit::relayer::context::{RelayerConfig, RelayerContext};
use ibc_testkit::relayer::utils::RelayerOps;
use ibc_testkit::testapp::ibc::applications::mock_app::{
    MOCK_APP_VERSION_V1, MOCK_APP_VERSION_V2, MOCK_APP_VERSION_V3, UPGRADE_APPLIED_EVENT,
};
use rstest::*;

use super::{aborted_code, count_events, timeout_in_blocks};

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

fn assert_upgraded(relayer: &RelayerContext, fields: &UpgradeFields, sequence: u64) {
    for chain in [relayer.chain_a(), relayer.chain_b()] {
        let chan_end = chain.channel();
        assert_eq!(*chan_end.state(), State::Open);
        assert_eq!(chan_end.fields(), *fields);
        assert_eq!(chan_end.upgrade_sequence(), Sequence::from(sequence));
        assert!(chain.upgrade().is_none());
        assert!(chain
            .ctx
            .counterparty_upgrade(&chain.port_id, &chain.chan_id)
            .is_none());
    }
}

#[rstest]
fn version_upgrade_happy_path(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();
    assert_eq!(*relayer.chain_a().channel().state(), State::Open);
    assert_eq!(
        relayer.chain_a().channel().upgrade_sequence(),
        Sequence::from(1)
    );

    let outcome = relayer.upgrade_try_on_b().unwrap();
    assert!(outcome.is_success());
    assert_eq!(*relayer.chain_b().channel().state(), State::Flushing);

    relayer.upgrade_ack_on_a().unwrap();
    assert_eq!(*relayer.chain_a().channel().state(), State::FlushComplete);

    // Both ends flushed, so B opens as soon as it confirms.
    relayer.upgrade_confirm_on_b().unwrap();
    assert_eq!(*relayer.chain_b().channel().state(), State::Open);
    assert_eq!(
        relayer.chain_b().channel().version().as_str(),
        MOCK_APP_VERSION_V2
    );

    relayer.upgrade_open_on_a().unwrap();

    assert_upgraded(&relayer, &fields, 1);
}

#[rstest]
fn open_emits_core_and_module_events(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    relayer.upgrade_channel(fields, timeout).unwrap();

    for chain in [relayer.chain_a(), relayer.chain_b()] {
        let events = chain.ctx.get_events();
        assert_eq!(
            count_events(&chain.ctx, |e| matches!(e, IbcEvent::UpgradeOpenChannel(_))),
            1
        );
        assert!(events.iter().any(|e| matches!(
            e,
            IbcEvent::Module(event) if event.kind == UPGRADE_APPLIED_EVENT
        )));
        assert!(chain
            .ctx
            .get_logs()
            .iter()
            .any(|log| log.contains("success: channel upgrade open")));
    }

    let a_events = relayer.chain_a().ctx.get_events();
    assert!(matches!(a_events[1], IbcEvent::UpgradeInitChannel(_)));
    assert!(a_events
        .iter()
        .any(|e| matches!(e, IbcEvent::UpgradeAckChannel(_))));

    let b_events = relayer.chain_b().ctx.get_events();
    assert!(b_events
        .iter()
        .any(|e| matches!(e, IbcEvent::UpgradeTryChannel(_))));
    assert!(b_events
        .iter()
        .any(|e| matches!(e, IbcEvent::UpgradeConfirmChannel(_))));
}

#[rstest]
fn consecutive_upgrades_bump_the_sequence(mut relayer: RelayerContext) {
    let to_v2 = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_channel(to_v2, timeout).unwrap();

    let back_to_v1 = relayer.upgrade_fields_to(MOCK_APP_VERSION_V1);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_channel(back_to_v1.clone(), timeout).unwrap();

    assert_upgraded(&relayer, &back_to_v1, 2);
}

#[rstest]
fn upgrade_can_move_the_channel_to_another_connection(mut relayer: RelayerContext) {
    let mut fields = relayer.chain_a().channel().fields();
    fields.connection_hops = vec![ConnectionId::new(1)];
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    relayer.upgrade_channel(fields.clone(), timeout).unwrap();

    assert_upgraded(&relayer, &fields, 1);
}

#[test_log::test]
fn upgrade_can_change_the_ordering() {
    let mut relayer = RelayerConfig::builder().ordering(Order::Unordered).build();

    let mut fields = relayer.chain_a().channel().fields();
    fields.ordering = Order::Ordered;
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    relayer.upgrade_channel(fields.clone(), timeout).unwrap();

    assert_upgraded(&relayer, &fields, 1);
}

#[rstest]
fn reversed_roles_complete_the_upgrade(relayer: RelayerContext) {
    let mut relayer = relayer.reverse();

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    relayer.upgrade_channel(fields.clone(), timeout).unwrap();

    assert_upgraded(&relayer, &fields, 1);
}

#[rstest]
fn crossing_hellos_agree_on_the_same_attempt(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();
    relayer.upgrade_init_on_b(fields.clone(), timeout).unwrap();

    // Both ends hold a proposal at sequence 1; B answers A's proposal with
    // its own.
    let outcome = relayer.upgrade_try_on_b().unwrap();
    assert!(outcome.is_success());
    assert_eq!(*relayer.chain_b().channel().state(), State::Flushing);
    assert!(relayer
        .chain_b()
        .ctx
        .upgrade_error(&relayer.chain_b().port_id, &relayer.chain_b().chan_id)
        .is_none());

    relayer.upgrade_ack_on_a().unwrap();
    relayer.upgrade_confirm_on_b().unwrap();
    relayer.upgrade_open_on_a().unwrap();

    assert_upgraded(&relayer, &fields, 1);
}

#[rstest]
fn crossing_hellos_with_different_orderings_abort(mut relayer: RelayerContext) {
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    let mut ordered = relayer.chain_a().channel().fields();
    ordered.ordering = Order::Ordered;
    relayer.upgrade_init_on_a(ordered, timeout).unwrap();

    let unordered = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    relayer.upgrade_init_on_b(unordered, timeout).unwrap();

    let outcome = relayer.upgrade_try_on_b().unwrap();
    assert_eq!(aborted_code(&outcome), 31);

    let chain_b = relayer.chain_b();
    let receipt = chain_b
        .ctx
        .upgrade_error(&chain_b.port_id, &chain_b.chan_id)
        .expect("receipt written");
    assert_eq!(receipt.sequence, Sequence::from(1));
    assert_eq!(
        receipt.message,
        "ABCI code: 31: restored channel to pre-upgrade state"
    );
    assert_eq!(*chain_b.channel().state(), State::Open);
    assert!(chain_b.upgrade().is_none());
}

#[rstest]
fn try_supersedes_a_stale_local_proposal(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);

    // A proposes twice and ends up at sequence 2, B proposes once.
    relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();
    relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();
    relayer.upgrade_init_on_b(fields.clone(), timeout).unwrap();

    assert_eq!(
        relayer.chain_a().channel().upgrade_sequence(),
        Sequence::from(2)
    );

    let outcome = relayer.upgrade_try_on_b().unwrap();
    assert!(outcome.is_success());

    let chain_b = relayer.chain_b();
    let chan_end_on_b = chain_b.channel();
    assert_eq!(*chan_end_on_b.state(), State::Flushing);
    assert_eq!(chan_end_on_b.upgrade_sequence(), Sequence::from(2));

    let receipt = chain_b
        .ctx
        .upgrade_error(&chain_b.port_id, &chain_b.chan_id)
        .expect("stale proposal was aborted");
    assert_eq!(receipt.sequence, Sequence::from(1));
    assert_eq!(
        receipt.message,
        "ABCI code: 29: restored channel to pre-upgrade state"
    );

    relayer.upgrade_ack_on_a().unwrap();
    relayer.upgrade_confirm_on_b().unwrap();
    relayer.upgrade_open_on_a().unwrap();

    assert_upgraded(&relayer, &fields, 2);
}

/// Proposes `fields_a` on A and `fields_b` on B, then delivers on each end
/// the TRY built from the other before either is processed.
fn crossing_tries(
    relayer: &mut RelayerContext,
    fields_a: UpgradeFields,
    fields_b: UpgradeFields,
) -> (UpgradeOutcome, UpgradeOutcome) {
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields_a, timeout).unwrap();
    relayer.upgrade_init_on_b(fields_b, timeout).unwrap();

    relayer.update_client_on_a().unwrap();
    relayer.update_client_on_b().unwrap();

    let try_on_a = RelayerOps::build_upgrade_try(
        relayer.chain_a(),
        relayer.chain_b(),
        relayer.signer().clone(),
    )
    .unwrap();
    let try_on_b = RelayerOps::build_upgrade_try(
        relayer.chain_b(),
        relayer.chain_a(),
        relayer.signer().clone(),
    )
    .unwrap();

    let outcome_b = relayer.chain_b_mut().deliver(try_on_b).unwrap();
    let outcome_a = relayer.chain_a_mut().deliver(try_on_a).unwrap();
    (outcome_a, outcome_b)
}

#[rstest]
fn crossing_tries_with_the_same_version_open_both_ends(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);

    let (outcome_a, outcome_b) = crossing_tries(&mut relayer, fields.clone(), fields.clone());
    assert!(outcome_a.is_success());
    assert!(outcome_b.is_success());
    assert_eq!(*relayer.chain_a().channel().state(), State::Flushing);
    assert_eq!(*relayer.chain_b().channel().state(), State::Flushing);

    relayer.upgrade_ack_on_a().unwrap();
    assert_eq!(*relayer.chain_a().channel().state(), State::FlushComplete);
    assert_eq!(
        relayer.chain_a().upgrade().expect("proposal on A").fields,
        fields
    );

    // B is flushing too, so it confirms and opens in one step
    relayer.upgrade_confirm_on_b().unwrap();
    assert_eq!(*relayer.chain_b().channel().state(), State::Open);

    relayer.upgrade_open_on_a().unwrap();

    assert_upgraded(&relayer, &fields, 1);
}

#[rstest]
fn crossing_tries_with_different_versions_abort_both_ends(mut relayer: RelayerContext) {
    let fields_a = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let fields_b = relayer.upgrade_fields_to(MOCK_APP_VERSION_V3);

    let (outcome_a, outcome_b) = crossing_tries(&mut relayer, fields_a, fields_b);
    assert_eq!(aborted_code(&outcome_a), 31);
    assert_eq!(aborted_code(&outcome_b), 31);

    for chain in [relayer.chain_a(), relayer.chain_b()] {
        let chan_end = chain.channel();
        assert_eq!(*chan_end.state(), State::Open);
        assert_eq!(chan_end.version().as_str(), MOCK_APP_VERSION_V1);
        assert_eq!(chan_end.upgrade_sequence(), Sequence::from(1));
        assert!(chain.upgrade().is_none());

        let receipt = chain
            .ctx
            .upgrade_error(&chain.port_id, &chain.chan_id)
            .expect("receipt written");
        assert_eq!(receipt.sequence, Sequence::from(1));
        assert_eq!(
            receipt.message,
            "ABCI code: 31: restored channel to pre-upgrade state"
        );
    }
}

#[rstest]
fn crossing_hellos_with_different_versions_abort(mut relayer: RelayerContext) {
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer
        .upgrade_init_on_a(relayer.upgrade_fields_to(MOCK_APP_VERSION_V2), timeout)
        .unwrap();
    relayer
        .upgrade_init_on_b(relayer.upgrade_fields_to(MOCK_APP_VERSION_V3), timeout)
        .unwrap();

    let outcome = relayer.upgrade_try_on_b().unwrap();
    assert_eq!(aborted_code(&outcome), 31);
    assert_eq!(*relayer.chain_b().channel().state(), State::Open);

    // A gives up its side with the receipt B wrote
    relayer.upgrade_cancel_on_a().unwrap();

    let chain_a = relayer.chain_a();
    assert_eq!(*chain_a.channel().state(), State::Open);
    assert_eq!(chain_a.channel().version().as_str(), MOCK_APP_VERSION_V1);
    assert!(chain_a.upgrade().is_none());
}
