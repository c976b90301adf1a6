//! Binds the applications taking part in channel upgrades to their ports.

use ibc_core_host_types::identifiers::PortId;
use ibc_core_router_types::error::RouterError;
use ibc_core_router_types::module::ModuleId;

use crate::module::Module;

pub trait Router {
    fn get_route(&self, module_id: &ModuleId) -> Option<&dyn Module>;

    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module>;

    /// Returns the module bound to `port_id`, if any.
    fn lookup_module(&self, port_id: &PortId) -> Option<ModuleId>;

    /// Resolves the module an upgrade datagram on `port_id` is routed to.
    fn module_id_for(&self, port_id: &PortId) -> Result<ModuleId, RouterError> {
        self.lookup_module(port_id)
            .ok_or_else(|| RouterError::UnknownPort {
                port_id: port_id.clone(),
            })
    }
}
