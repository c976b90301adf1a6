use ibc_core::channel::query::{query_channel, query_upgrade, query_upgrade_error, query_upgrade_state};
use ibc_core::channel::types::upgrade::{ErrorReceipt, UpgradeState};
use ibc_core::handler::types::error::ContextError;
use ibc_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_testkit::fixtures::core::signer::dummy_upgrade_authority;
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::relayer::utils::ChainEnd;
use ibc_testkit::testapp::ibc::applications::mock_app::MOCK_APP_VERSION_V2;
use rstest::*;

use super::timeout_in_blocks;

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

fn upgrade_state(chain: &ChainEnd) -> UpgradeState {
    query_upgrade_state(&chain.ctx, &chain.port_id, &chain.chan_id).unwrap()
}

#[rstest]
fn upgrade_state_follows_the_handshake(mut relayer: RelayerContext) {
    let chain_a = relayer.chain_a_mut();
    chain_a
        .ctx
        .send_packet(&chain_a.port_id, &chain_a.chan_id, b"data")
        .unwrap();

    assert_eq!(upgrade_state(relayer.chain_a()), UpgradeState::NotUpgrading);

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    assert_eq!(upgrade_state(relayer.chain_a()), UpgradeState::Init);
    assert_eq!(upgrade_state(relayer.chain_b()), UpgradeState::NotUpgrading);

    relayer.upgrade_try_on_b().unwrap();
    assert_eq!(upgrade_state(relayer.chain_b()), UpgradeState::Flushing);

    relayer.upgrade_ack_on_a().unwrap();
    assert_eq!(upgrade_state(relayer.chain_a()), UpgradeState::Flushing);

    relayer.upgrade_confirm_on_b().unwrap();
    assert_eq!(upgrade_state(relayer.chain_b()), UpgradeState::FlushComplete);

    let chain_a = relayer.chain_a_mut();
    chain_a
        .ctx
        .clear_packet(&chain_a.port_id, &chain_a.chan_id, Sequence::from(1))
        .unwrap();
    assert_eq!(upgrade_state(relayer.chain_a()), UpgradeState::FlushComplete);

    relayer.chain_a_mut().ctx.advance_block();
    relayer.upgrade_open_on_a().unwrap();
    relayer.upgrade_open_on_b().unwrap();
    assert_eq!(upgrade_state(relayer.chain_a()), UpgradeState::NotUpgrading);
    assert_eq!(upgrade_state(relayer.chain_b()), UpgradeState::NotUpgrading);
}

#[rstest]
fn query_upgrade_returns_the_pending_proposal(mut relayer: RelayerContext) {
    let chain_a = relayer.chain_a();
    assert!(query_upgrade(&chain_a.ctx, &chain_a.port_id, &chain_a.chan_id)
        .unwrap()
        .is_none());

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields.clone(), timeout).unwrap();

    let chain_a = relayer.chain_a();
    let upgrade = query_upgrade(&chain_a.ctx, &chain_a.port_id, &chain_a.chan_id)
        .unwrap()
        .expect("proposal stored");
    assert_eq!(upgrade.fields, fields);
    assert_eq!(upgrade.timeout, timeout);
}

#[rstest]
fn query_upgrade_error_returns_the_latest_receipt(mut relayer: RelayerContext) {
    let chain_b = relayer.chain_b();
    assert!(
        query_upgrade_error(&chain_b.ctx, &chain_b.port_id, &chain_b.chan_id)
            .unwrap()
            .is_none()
    );

    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let timeout = timeout_in_blocks(&relayer.chain_b().ctx, 100);
    relayer.upgrade_init_on_a(fields, timeout).unwrap();
    relayer.upgrade_try_on_b().unwrap();

    // A gives up on its side after B agreed
    relayer
        .authority_cancel_on_a(dummy_upgrade_authority())
        .unwrap();
    relayer.upgrade_cancel_on_b().unwrap();

    let chain_b = relayer.chain_b();
    let receipt = query_upgrade_error(&chain_b.ctx, &chain_b.port_id, &chain_b.chan_id)
        .unwrap()
        .expect("receipt written");
    assert_eq!(receipt, ErrorReceipt::new(Sequence::from(1), 28));
}

#[rstest]
fn queries_fail_on_a_missing_channel(relayer: RelayerContext) {
    let chain_a = relayer.chain_a();
    let missing = ChannelId::new(9);

    assert!(matches!(
        query_channel(&chain_a.ctx, &chain_a.port_id, &missing),
        Err(ContextError::HostError(_))
    ));
    assert!(query_upgrade(&chain_a.ctx, &chain_a.port_id, &missing).is_err());
    assert!(query_upgrade_error(&chain_a.ctx, &chain_a.port_id, &missing).is_err());
    assert!(query_upgrade_state(&chain_a.ctx, &chain_a.port_id, &missing).is_err());
}
