use displaydoc::Display;
use ibc_core_host_types::error::HostError;
use ibc_core_host_types::identifiers::PortId;
use ibc_primitives::prelude::*;

/// Error type for the router module.
#[derive(Debug, Display, derive_more::From)]
pub enum RouterError {
    /// host error: `{0}`
    Host(HostError),
    /// no module bound to port `{port_id}`
    UnknownPort { port_id: PortId },
    /// module not found
    ModuleNotFound,
}

#[cfg(feature = "std")]
impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Host(e) => Some(e),
            _ => None,
        }
    }
}
