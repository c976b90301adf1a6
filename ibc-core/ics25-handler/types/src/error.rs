//! Defines the context error type

use derive_more::From;
use displaydoc::Display;
use ibc_core_channel_types::error::{ChannelError, PacketError};
use ibc_core_client_types::error::ClientError;
use ibc_core_connection_types::error::ConnectionError;
use ibc_core_host_types::error::HostError;
use ibc_core_router_types::error::RouterError;
use ibc_primitives::prelude::*;

/// Top-level error
#[derive(Debug, Display, From)]
pub enum ContextError {
    /// ICS02 Client error: {0}
    ClientError(ClientError),
    /// ICS03 Connection error: {0}
    ConnectionError(ConnectionError),
    /// ICS04 Channel error: {0}
    ChannelError(ChannelError),
    /// ICS04 Packet error: {0}
    PacketError(PacketError),
    /// ICS26 Routing error: {0}
    RouterError(RouterError),
    /// ICS24 Host error: {0}
    HostError(HostError),
}

impl ContextError {
    /// The ABCI code a failed message reports. Only channel errors carry a
    /// registered code.
    pub fn abci_code(&self) -> u32 {
        match self {
            Self::ChannelError(e) => e.abci_code(),
            Self::PacketError(PacketError::Channel(e)) => e.abci_code(),
            _ => ibc_core_channel_types::error::INTERNAL_ABCI_CODE,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ClientError(e) => Some(e),
            Self::ConnectionError(e) => Some(e),
            Self::ChannelError(e) => Some(e),
            Self::PacketError(e) => Some(e),
            Self::RouterError(e) => Some(e),
            Self::HostError(e) => Some(e),
        }
    }
}
