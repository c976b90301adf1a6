use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_core_commitment_types::commitment::CommitmentPrefix;
use ibc_core_host_types::identifiers::{ClientId, ConnectionId};
use ibc_primitives::prelude::*;

use crate::error::ConnectionError;
use crate::version::Version;

/// The local end of a connection. A channel end names exactly one of these
/// as its connection hop.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionEnd {
    pub state: State,
    client_id: ClientId,
    counterparty: Counterparty,
    versions: Vec<Version>,
}

impl ConnectionEnd {
    pub fn new(
        state: State,
        client_id: ClientId,
        counterparty: Counterparty,
        versions: Vec<Version>,
    ) -> Result<Self, ConnectionError> {
        // `Init` ends carry the candidate versions, later states the single
        // negotiated one.
        if versions.is_empty() {
            return Err(ConnectionError::EmptyVersions);
        }
        if state != State::Init && versions.len() != 1 {
            return Err(ConnectionError::InvalidVersionLength);
        }

        Ok(Self {
            state,
            client_id,
            counterparty,
            versions,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// Checks if the state of this connection end matches with an expected state.
    pub fn verify_state_matches(&self, expected: &State) -> Result<(), ConnectionError> {
        if !self.state.eq(expected) {
            return Err(ConnectionError::InvalidState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Checks that the negotiated version of an open connection supports the
    /// given feature, e.g. a channel ordering.
    pub fn verify_feature_supported(&self, feature: &str) -> Result<(), ConnectionError> {
        match self.versions.as_slice() {
            [version] => version.verify_feature_supported(feature),
            _ => Err(ConnectionError::InvalidVersionLength),
        }
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.counterparty
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Counterparty {
    pub client_id: ClientId,
    pub connection_id: Option<ConnectionId>,
    pub prefix: CommitmentPrefix,
}

impl Counterparty {
    pub fn new(
        client_id: ClientId,
        connection_id: Option<ConnectionId>,
        prefix: CommitmentPrefix,
    ) -> Self {
        Self {
            client_id,
            connection_id,
            prefix,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn connection_id(&self) -> Option<&ConnectionId> {
        self.connection_id.as_ref()
    }

    /// The counterparty connection identifier, which an open connection
    /// always knows.
    pub fn expect_connection_id(&self) -> Result<&ConnectionId, ConnectionError> {
        self.connection_id
            .as_ref()
            .ok_or(ConnectionError::MissingCounterpartyConnectionId)
    }

    pub fn prefix(&self) -> &CommitmentPrefix {
        &self.prefix
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Uninitialized,
    Init,
    TryOpen,
    Open,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}
