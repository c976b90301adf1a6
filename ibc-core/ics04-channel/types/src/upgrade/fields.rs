use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use ibc_core_host_types::identifiers::ConnectionId;
use ibc_primitives::prelude::*;
use ibc_proto::ibc::core::channel::v1::UpgradeFields as RawUpgradeFields;
use ibc_proto::Protobuf;

use crate::channel::{verify_connection_hops_length, Order};
use crate::error::ChannelError;
use crate::Version;

/// The channel parameters proposed by an upgrade.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeFields {
    pub ordering: Order,
    pub connection_hops: Vec<ConnectionId>,
    pub version: Version,
}

impl UpgradeFields {
    pub fn new(ordering: Order, connection_hops: Vec<ConnectionId>, version: Version) -> Self {
        Self {
            ordering,
            connection_hops,
            version,
        }
    }

    /// Stateless checks, run before anything is written.
    ///
    /// The ordering must be a known value, there must be exactly one
    /// connection hop, and the version cannot be blank.
    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        if !matches!(self.ordering, Order::Ordered | Order::Unordered) {
            return Err(ChannelError::InvalidOrderType {
                expected: "ORDER_ORDERED or ORDER_UNORDERED".to_string(),
                actual: self.ordering.to_string(),
            });
        }

        verify_connection_hops_length(&self.connection_hops, 1)?;

        if self.version.is_blank() {
            return Err(ChannelError::InvalidVersion {
                version: self.version.to_string(),
            });
        }

        Ok(())
    }

    /// Returns the single connection hop of the proposal.
    pub fn connection_hop(&self) -> Result<&ConnectionId, ChannelError> {
        verify_connection_hops_length(&self.connection_hops, 1)?;
        self.connection_hops
            .first()
            .ok_or(ChannelError::InvalidConnectionHopsLength {
                expected: 1,
                actual: 0,
            })
    }
}

impl Display for UpgradeFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let hops: Vec<&str> = self.connection_hops.iter().map(|h| h.as_str()).collect();
        write!(
            f,
            "UpgradeFields {{ ordering: {}, connection_hops: [{}], version: {} }}",
            self.ordering,
            hops.join(", "),
            self.version
        )
    }
}

impl Protobuf<RawUpgradeFields> for UpgradeFields {}

impl TryFrom<RawUpgradeFields> for UpgradeFields {
    type Error = ChannelError;

    fn try_from(raw: RawUpgradeFields) -> Result<Self, Self::Error> {
        let connection_hops = raw
            .connection_hops
            .iter()
            .map(|hop| ConnectionId::from_str(hop))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            Order::from_i32(raw.ordering)?,
            connection_hops,
            raw.version.into(),
        ))
    }
}

impl From<UpgradeFields> for RawUpgradeFields {
    fn from(value: UpgradeFields) -> Self {
        RawUpgradeFields {
            ordering: value.ordering.into(),
            connection_hops: value
                .connection_hops
                .iter()
                .map(|hop| hop.as_str().to_string())
                .collect(),
            version: value.version.to_string(),
        }
    }
}
