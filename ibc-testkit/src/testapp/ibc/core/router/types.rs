use alloc::collections::BTreeMap;
use alloc::sync::Arc;

use ibc_core::host::types::identifiers::PortId;
use ibc_core::primitives::prelude::*;
use ibc_core::router::module::Module;
use ibc_core::router::types::module::ModuleId;

use crate::testapp::ibc::applications::mock_app::{MockModule, MOCK_MODULE_ID};

#[derive(Debug, Default)]
pub struct MockRouter {
    pub router: BTreeMap<ModuleId, Arc<dyn Module>>,

    /// Maps ports to the the module that owns it
    pub port_to_module: BTreeMap<PortId, ModuleId>,
}

impl MockRouter {
    /// A router binding the transfer port to a [`MockModule`].
    pub fn new_with_mock_app() -> Self {
        Self::new_with_module(MockModule::default())
    }

    pub fn new_with_module(module: MockModule) -> Self {
        let mut router = Self::default();

        let module_id = ModuleId::new(MOCK_MODULE_ID.to_string());

        router.scope_port_to_module(PortId::transfer(), module_id.clone());

        router.add_route(module_id, module).expect("Never fails");

        router
    }

    pub fn add_route(
        &mut self,
        module_id: ModuleId,
        module: impl Module + 'static,
    ) -> Result<(), String> {
        match self.router.insert(module_id, Arc::new(module)) {
            None => Ok(()),
            Some(_) => Err("Duplicate module_id".to_owned()),
        }
    }

    pub fn scope_port_to_module(&mut self, port_id: PortId, module_id: ModuleId) {
        self.port_to_module.insert(port_id, module_id);
    }
}
