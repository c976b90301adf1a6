use ibc_core::channel::types::msgs::MsgChannelUpgradeInit;
use ibc_core::channel::types::upgrade::UpgradeFields;
use ibc_core::entrypoint::dispatch;
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::msgs::MsgEnvelope;
use ibc_core::host::types::identifiers::PortId;
use ibc_core::router::types::error::RouterError;
use ibc_core::router::types::module::ModuleId;
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::testapp::ibc::applications::mock_app::{MockModule, MOCK_APP_VERSION_V2};
use ibc_testkit::testapp::ibc::core::router::MockRouter;
use rstest::*;

use super::ics04_channel::timeout_in_blocks;

#[fixture]
fn relayer() -> RelayerContext {
    RelayerContext::new()
}

fn init_msg_on(relayer: &RelayerContext, port_id: PortId, fields: UpgradeFields) -> MsgEnvelope {
    let chain_a = relayer.chain_a();
    let msg = MsgChannelUpgradeInit::new(
        port_id,
        chain_a.chan_id.clone(),
        fields,
        timeout_in_blocks(&relayer.chain_b().ctx, 100),
        relayer.signer().clone(),
    );
    MsgEnvelope::ChannelUpgrade(msg.into())
}

#[rstest]
fn dispatch_rejects_an_unbound_port(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let unbound = PortId::new("unbound".to_string()).unwrap();
    let msg = init_msg_on(&relayer, unbound.clone(), fields);

    let chain_a = relayer.chain_a_mut();
    let res = dispatch(&mut chain_a.ctx, &mut chain_a.router, msg);

    assert!(matches!(
        res,
        Err(ContextError::RouterError(RouterError::UnknownPort { port_id })) if port_id == unbound
    ));
}

#[rstest]
fn dispatch_rejects_a_port_without_module(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let port_id = relayer.chain_a().port_id.clone();
    let msg = init_msg_on(&relayer, port_id.clone(), fields);

    let mut router = MockRouter::default();
    router.scope_port_to_module(port_id, ModuleId::new("unregistered".to_string()));

    let chain_a = relayer.chain_a_mut();
    let res = dispatch(&mut chain_a.ctx, &mut router, msg);

    assert!(matches!(
        res,
        Err(ContextError::RouterError(RouterError::ModuleNotFound))
    ));
    assert!(chain_a.upgrade().is_none());
}

#[rstest]
fn dispatch_routes_to_the_module_bound_to_the_port(mut relayer: RelayerContext) {
    let fields = relayer.upgrade_fields_to(MOCK_APP_VERSION_V2);
    let port_id = relayer.chain_a().port_id.clone();
    let msg = init_msg_on(&relayer, port_id, fields.clone());

    let mut router = MockRouter::new_with_module(MockModule::default());

    let chain_a = relayer.chain_a_mut();
    let outcome = dispatch(&mut chain_a.ctx, &mut router, msg).unwrap();

    assert!(outcome.is_success());
    assert_eq!(
        chain_a.upgrade().expect("proposal stored").fields,
        fields
    );
}
