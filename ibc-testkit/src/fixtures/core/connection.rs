use ibc_core::commitment_types::commitment::CommitmentPrefix;
use ibc_core::connection_types::version::Version as ConnectionVersion;
use ibc_core::connection_types::{ConnectionEnd, Counterparty, State};
use ibc_core::host::types::identifiers::{ClientId, ConnectionId};
use ibc_core::primitives::prelude::*;

use crate::testapp::ibc::clients::mock::client_state::MOCK_CLIENT_TYPE;
use crate::testapp::ibc::core::types::MOCK_COMMITMENT_PREFIX;

pub fn dummy_client_id(counter: u64) -> ClientId {
    ClientId::new(MOCK_CLIENT_TYPE, counter).expect("Never fails")
}

/// Returns an open connection end whose counterparty is another mock chain,
/// for testing purposes only!
pub fn dummy_open_connection_end(
    client_id: ClientId,
    counterparty_client_id: ClientId,
    counterparty_conn_id: ConnectionId,
) -> ConnectionEnd {
    let prefix = CommitmentPrefix::try_from(MOCK_COMMITMENT_PREFIX.to_vec()).expect("Never fails");

    ConnectionEnd::new(
        State::Open,
        client_id,
        Counterparty::new(counterparty_client_id, Some(counterparty_conn_id), prefix),
        ConnectionVersion::compatibles(),
    )
    .expect("Never fails")
}
