//! Implementation of IBC channel ends, extended with the upgrade sequence and
//! the flushing states entered while an upgrade is negotiated.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use ibc_primitives::prelude::*;
use ibc_proto::ibc::core::channel::v1::{
    Channel as RawChannel, Counterparty as RawCounterparty,
};
use ibc_proto::Protobuf;

use crate::error::ChannelError;
use crate::upgrade::UpgradeFields;
use crate::Version;

/// One end of a channel
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelEnd {
    pub state: State,
    pub ordering: Order,
    pub remote: Counterparty,
    pub connection_hops: Vec<ConnectionId>,
    pub version: Version,
    pub upgrade_sequence: Sequence,
}

impl Display for ChannelEnd {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let hops: Vec<&str> = self.connection_hops.iter().map(|h| h.as_str()).collect();
        write!(
            f,
            "ChannelEnd {{ state: {}, ordering: {}, remote: {}, connection_hops: [{}], version: {}, upgrade_sequence: {} }}",
            self.state,
            self.ordering,
            self.remote,
            hops.join(", "),
            self.version,
            self.upgrade_sequence
        )
    }
}

impl Protobuf<RawChannel> for ChannelEnd {}

impl TryFrom<RawChannel> for ChannelEnd {
    type Error = ChannelError;

    fn try_from(value: RawChannel) -> Result<Self, Self::Error> {
        let chan_state = State::from_i32(value.state)?;

        let chan_ordering = Order::from_i32(value.ordering)?;

        let remote: Counterparty = value
            .counterparty
            .ok_or(ChannelError::MissingCounterparty)?
            .try_into()?;

        let connection_hops = value
            .connection_hops
            .into_iter()
            .map(|conn_id| ConnectionId::from_str(conn_id.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        ChannelEnd::new(
            chan_state,
            chan_ordering,
            remote,
            connection_hops,
            value.version.into(),
            value.upgrade_sequence.into(),
        )
    }
}

impl From<ChannelEnd> for RawChannel {
    fn from(value: ChannelEnd) -> Self {
        RawChannel {
            state: value.state.into(),
            ordering: value.ordering.into(),
            counterparty: Some(value.remote.into()),
            connection_hops: value
                .connection_hops
                .iter()
                .map(|v| v.as_str().to_string())
                .collect(),
            version: value.version.to_string(),
            upgrade_sequence: value.upgrade_sequence.value(),
        }
    }
}

impl ChannelEnd {
    /// Creates a new `ChannelEnd` with performing basic validation on its arguments.
    pub fn new(
        state: State,
        ordering: Order,
        remote: Counterparty,
        connection_hops: Vec<ConnectionId>,
        version: Version,
        upgrade_sequence: Sequence,
    ) -> Result<Self, ChannelError> {
        let channel_end = Self {
            state,
            ordering,
            remote,
            connection_hops,
            version,
            upgrade_sequence,
        };
        channel_end.validate_basic()?;
        Ok(channel_end)
    }

    /// Updates the ChannelEnd to assume a new State 's'.
    pub fn set_state(&mut self, s: State) {
        self.state = s;
    }

    pub fn set_upgrade_sequence(&mut self, sequence: Sequence) {
        self.upgrade_sequence = sequence;
    }

    /// Commits the negotiated upgrade fields and reopens the channel.
    pub fn apply_upgrade(&mut self, fields: &UpgradeFields) {
        self.ordering = fields.ordering;
        self.connection_hops = fields.connection_hops.clone();
        self.version = fields.version.clone();
        self.state = State::Open;
    }

    /// Returns `true` if this `ChannelEnd` is in state [`State::Open`].
    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// Returns `true` while the channel drains in-flight packets of an upgrade.
    pub fn is_flushing(&self) -> bool {
        self.state.is_flushing()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn ordering(&self) -> &Order {
        &self.ordering
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.remote
    }

    pub fn connection_hops(&self) -> &Vec<ConnectionId> {
        &self.connection_hops
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn upgrade_sequence(&self) -> Sequence {
        self.upgrade_sequence
    }

    /// Returns the fields this channel currently operates with.
    pub fn fields(&self) -> UpgradeFields {
        UpgradeFields::new(
            self.ordering,
            self.connection_hops.clone(),
            self.version.clone(),
        )
    }

    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        if self.state == State::Uninitialized {
            return Err(ChannelError::InvalidState {
                expected: "Channel state cannot be Uninitialized".to_string(),
                actual: self.state.to_string(),
            });
        }

        if self.ordering == Order::None {
            return Err(ChannelError::InvalidOrderType {
                expected: "Channel ordering cannot be None".to_string(),
                actual: self.ordering.to_string(),
            });
        }

        Ok(())
    }

    /// Checks if the state of this channel end matches the expected state.
    pub fn verify_state_matches(&self, expected: &State) -> Result<(), ChannelError> {
        if !self.state.eq(expected) {
            return Err(ChannelError::InvalidState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    /// Checks that the channel is in one of the given states.
    pub fn verify_state_is_one_of(&self, expected: &[State]) -> Result<(), ChannelError> {
        if !expected.contains(&self.state) {
            let expected: Vec<&str> = expected.iter().map(|s| s.as_str()).collect();
            return Err(ChannelError::InvalidState {
                expected: expected.join(" or "),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    /// Checks if the `connection_hops` has a length of `expected`.
    ///
    /// Note: Current IBC version only supports one connection hop.
    pub fn verify_connection_hops_length(&self) -> Result<(), ChannelError> {
        verify_connection_hops_length(&self.connection_hops, 1)
    }

    /// Returns the single connection hop of this channel.
    pub fn connection_hop(&self) -> Result<&ConnectionId, ChannelError> {
        self.verify_connection_hops_length()?;
        self.connection_hops
            .first()
            .ok_or(ChannelError::InvalidConnectionHopsLength {
                expected: 1,
                actual: 0,
            })
    }
}

/// Checks if the `connection_hops` has a length of `expected`.
pub(crate) fn verify_connection_hops_length(
    connection_hops: &[ConnectionId],
    expected: u64,
) -> Result<(), ChannelError> {
    let actual = connection_hops.len() as u64;
    if actual != expected {
        return Err(ChannelError::InvalidConnectionHopsLength { expected, actual });
    }
    Ok(())
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counterparty {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
}

impl Counterparty {
    pub fn new(port_id: PortId, channel_id: Option<ChannelId>) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }

    /// An open channel always knows its counterparty channel identifier.
    pub fn expect_channel_id(&self) -> Result<&ChannelId, ChannelError> {
        self.channel_id.as_ref().ok_or(ChannelError::MissingCounterparty)
    }
}

impl Display for Counterparty {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match &self.channel_id {
            Some(channel_id) => write!(
                f,
                "Counterparty(port_id: {}, channel_id: {})",
                self.port_id, channel_id
            ),
            None => write!(
                f,
                "Counterparty(port_id: {}, channel_id: None)",
                self.port_id
            ),
        }
    }
}

impl Protobuf<RawCounterparty> for Counterparty {}

impl TryFrom<RawCounterparty> for Counterparty {
    type Error = ChannelError;

    fn try_from(raw_counterparty: RawCounterparty) -> Result<Self, Self::Error> {
        let channel_id: Option<ChannelId> = if raw_counterparty.channel_id.is_empty() {
            None
        } else {
            Some(raw_counterparty.channel_id.parse()?)
        };

        Ok(Counterparty::new(
            raw_counterparty.port_id.parse()?,
            channel_id,
        ))
    }
}

impl From<Counterparty> for RawCounterparty {
    fn from(value: Counterparty) -> Self {
        RawCounterparty {
            port_id: value.port_id.as_str().to_string(),
            channel_id: value
                .channel_id
                .map_or_else(|| "".to_string(), |v| v.to_string()),
        }
    }
}

/// Represents the channel ordering
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    None,
    Unordered,
    Ordered,
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

impl Order {
    /// Yields the Order as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            // Names of the ibc-go proto enum variants
            Self::None => "ORDER_NONE_UNSPECIFIED",
            Self::Unordered => "ORDER_UNORDERED",
            Self::Ordered => "ORDER_ORDERED",
        }
    }

    // Parses the Order out from a i32.
    pub fn from_i32(nr: i32) -> Result<Self, ChannelError> {
        match nr {
            0 => Ok(Self::None),
            1 => Ok(Self::Unordered),
            2 => Ok(Self::Ordered),
            _ => Err(ChannelError::InvalidOrderType {
                expected: "Must be one of 0, 1, 2".to_string(),
                actual: nr.to_string(),
            }),
        }
    }
}

impl From<Order> for i32 {
    fn from(value: Order) -> Self {
        match value {
            Order::None => 0,
            Order::Unordered => 1,
            Order::Ordered => 2,
        }
    }
}

impl FromStr for Order {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_start_matches("order_") {
            "uninitialized" | "none_unspecified" => Ok(Self::None),
            "unordered" => Ok(Self::Unordered),
            "ordered" => Ok(Self::Ordered),
            _ => Err(ChannelError::InvalidOrderType {
                expected: "Must be one of 'uninitialized', 'unordered', 'ordered'".to_string(),
                actual: s.to_string(),
            }),
        }
    }
}

/// Represents the state of a [`ChannelEnd`]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Init,
    TryOpen,
    Open,
    Closed,
    /// The channel drains the packets sent before the upgrade started.
    Flushing,
    /// All in-flight packets are cleared; the upgrade awaits the counterparty.
    FlushComplete,
}

impl State {
    /// Yields the state as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Flushing => "FLUSHING",
            Self::FlushComplete => "FLUSHCOMPLETE",
        }
    }

    // Parses the State out from a i32.
    pub fn from_i32(s: i32) -> Result<Self, ChannelError> {
        match s {
            0 => Ok(Self::Uninitialized),
            1 => Ok(Self::Init),
            2 => Ok(Self::TryOpen),
            3 => Ok(Self::Open),
            4 => Ok(Self::Closed),
            5 => Ok(Self::Flushing),
            6 => Ok(Self::FlushComplete),
            _ => Err(ChannelError::InvalidState {
                expected: "Must be one of: 0, 1, 2, 3, 4, 5, 6".to_string(),
                actual: s.to_string(),
            }),
        }
    }

    /// Returns whether or not this channel state is `Open`.
    pub fn is_open(self) -> bool {
        self == State::Open
    }

    /// Returns whether or not an upgrade is flushing packets on this channel.
    pub fn is_flushing(self) -> bool {
        matches!(self, State::Flushing | State::FlushComplete)
    }
}

impl From<State> for i32 {
    fn from(value: State) -> Self {
        match value {
            State::Uninitialized => 0,
            State::Init => 1,
            State::TryOpen => 2,
            State::Open => 3,
            State::Closed => 4,
            State::Flushing => 5,
            State::FlushComplete => 6,
        }
    }
}

/// Provides a `to_string` method.
impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}
