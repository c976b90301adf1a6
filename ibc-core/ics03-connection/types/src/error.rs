//! Defines the connection error type

use displaydoc::Display;
use ibc_core_client_types::error::ClientError;
use ibc_core_host_types::identifiers::ConnectionId;
use ibc_primitives::prelude::*;

#[derive(Debug, Display)]
pub enum ConnectionError {
    /// client error: `{0}`
    Client(ClientError),
    /// invalid connection state: expected `{expected}`, actual `{actual}`
    InvalidState { expected: String, actual: String },
    /// empty supported versions
    EmptyVersions,
    /// single version must be negotiated on connection before opening channel
    InvalidVersionLength,
    /// feature \"`{feature}`\" not supported
    FeatureNotSupported { feature: String },
    /// missing connection `{0}`
    MissingConnection(ConnectionId),
    /// missing counterparty connection identifier
    MissingCounterpartyConnectionId,
}

impl From<ClientError> for ConnectionError {
    fn from(e: ClientError) -> Self {
        Self::Client(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Client(e) => Some(e),
            _ => None,
        }
    }
}
