//! Defines the store paths read and written by the channel upgrade handshake.
//!
//! Every path here is provable: its value is committed to in the host's state
//! root so that the counterparty can verify it through its light client.
use core::str::FromStr;

use derive_more::{Display, From};
use ibc_primitives::prelude::*;

use crate::identifiers::{ChannelId, ConnectionId, PortId, Sequence};

pub const CONNECTION_PREFIX: &str = "connections";
pub const CHANNEL_PREFIX: &str = "channels";
pub const CHANNEL_END_PREFIX: &str = "channelEnds";
pub const PORT_PREFIX: &str = "ports";
pub const SEQUENCE_PREFIX: &str = "sequences";
pub const NEXT_SEQ_SEND_PREFIX: &str = "nextSequenceSend";
pub const PACKET_COMMITMENT_PREFIX: &str = "commitments";

/// Channel upgrade keys
/// - The sub-store holding every upgrade related record
pub const CHANNEL_UPGRADE_PREFIX: &str = "channelUpgrades";
/// - The key identifying the in-progress upgrade proposal of a channel
pub const UPGRADE_PATH: &str = "upgrades";
/// - The key identifying the latest upgrade error receipt of a channel
pub const UPGRADE_ERROR_PATH: &str = "upgradeError";
/// - The key identifying the counterparty's upgrade as last proven locally
pub const COUNTERPARTY_UPGRADE_PATH: &str = "counterpartyUpgrade";

/// The Path enum abstracts out the different sub-paths.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Display)]
pub enum Path {
    Connection(ConnectionPath),
    ChannelEnd(ChannelEndPath),
    SeqSend(SeqSendPath),
    Commitment(CommitmentPath),
    ChannelUpgrade(ChannelUpgradePath),
    ChannelUpgradeError(ChannelUpgradeErrorPath),
    CounterpartyUpgrade(CounterpartyUpgradePath),
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{CONNECTION_PREFIX}/{_0}")]
pub struct ConnectionPath(pub ConnectionId);

impl ConnectionPath {
    pub fn new(connection_id: &ConnectionId) -> ConnectionPath {
        ConnectionPath(connection_id.clone())
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{CHANNEL_END_PREFIX}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}")]
pub struct ChannelEndPath(pub PortId, pub ChannelId);

impl ChannelEndPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> ChannelEndPath {
        ChannelEndPath(port_id.clone(), channel_id.clone())
    }

    /// Returns the parent group path under which all the packet commitments
    /// of the channel are stored:
    /// "commitments/ports/{port_id}/channels/{channel_id}/sequences"
    pub fn commitments_path(&self) -> String {
        format!(
            "{PACKET_COMMITMENT_PREFIX}/{PORT_PREFIX}/{}/{CHANNEL_PREFIX}/{}/{SEQUENCE_PREFIX}",
            self.0, self.1,
        )
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{NEXT_SEQ_SEND_PREFIX}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}")]
pub struct SeqSendPath(pub PortId, pub ChannelId);

impl SeqSendPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> SeqSendPath {
        SeqSendPath(port_id.clone(), channel_id.clone())
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{PACKET_COMMITMENT_PREFIX}/{PORT_PREFIX}/{port_id}/{CHANNEL_PREFIX}/{channel_id}/{SEQUENCE_PREFIX}/{sequence}"
)]
pub struct CommitmentPath {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

impl CommitmentPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId, sequence: Sequence) -> CommitmentPath {
        CommitmentPath {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            sequence,
        }
    }
}

/// Stores the upgrade proposal of a channel while a handshake is in flight.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{CHANNEL_UPGRADE_PREFIX}/{UPGRADE_PATH}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}"
)]
pub struct ChannelUpgradePath(pub PortId, pub ChannelId);

impl ChannelUpgradePath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> ChannelUpgradePath {
        ChannelUpgradePath(port_id.clone(), channel_id.clone())
    }
}

/// Stores the latest error receipt of a channel. Its presence is what lets
/// the counterparty prove an abort.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{CHANNEL_UPGRADE_PREFIX}/{UPGRADE_ERROR_PATH}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}"
)]
pub struct ChannelUpgradeErrorPath(pub PortId, pub ChannelId);

impl ChannelUpgradeErrorPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> ChannelUpgradeErrorPath {
        ChannelUpgradeErrorPath(port_id.clone(), channel_id.clone())
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{CHANNEL_UPGRADE_PREFIX}/{COUNTERPARTY_UPGRADE_PATH}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}"
)]
pub struct CounterpartyUpgradePath(pub PortId, pub ChannelId);

impl CounterpartyUpgradePath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> CounterpartyUpgradePath {
        CounterpartyUpgradePath(port_id.clone(), channel_id.clone())
    }
}

impl Path {
    pub fn into_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

#[derive(Debug, displaydoc::Display)]
pub enum PathError {
    /// `{path}` could not be parsed into a Path
    ParseFailure { path: String },
}

#[cfg(feature = "std")]
impl std::error::Error for PathError {}

/// The FromStr trait allows paths encoded as strings to be parsed into Paths.
impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components: Vec<&str> = s.split('/').collect();

        parse_connections(&components)
            .or_else(|| parse_channel_ends(&components))
            .or_else(|| parse_seq_sends(&components))
            .or_else(|| parse_commitments(&components))
            .or_else(|| parse_channel_upgrades(&components))
            .ok_or(PathError::ParseFailure {
                path: s.to_string(),
            })
    }
}

fn parse_connections(components: &[&str]) -> Option<Path> {
    let [CONNECTION_PREFIX, connection_id] = components else {
        return None;
    };

    let connection_id = ConnectionId::from_str(connection_id).ok()?;

    Some(ConnectionPath(connection_id).into())
}

/// Parses the `ports/{port_id}/channels/{channel_id}` tail shared by all
/// channel scoped paths.
fn parse_port_channel(components: &[&str]) -> Option<(PortId, ChannelId)> {
    let [PORT_PREFIX, port_id, CHANNEL_PREFIX, channel_id] = components else {
        return None;
    };

    let port_id = PortId::from_str(port_id).ok()?;
    let channel_id = ChannelId::from_str(channel_id).ok()?;

    Some((port_id, channel_id))
}

fn parse_channel_ends(components: &[&str]) -> Option<Path> {
    let (&CHANNEL_END_PREFIX, rest) = components.split_first()? else {
        return None;
    };

    let (port_id, channel_id) = parse_port_channel(rest)?;

    Some(ChannelEndPath(port_id, channel_id).into())
}

fn parse_seq_sends(components: &[&str]) -> Option<Path> {
    let (&NEXT_SEQ_SEND_PREFIX, rest) = components.split_first()? else {
        return None;
    };

    let (port_id, channel_id) = parse_port_channel(rest)?;

    Some(SeqSendPath(port_id, channel_id).into())
}

fn parse_commitments(components: &[&str]) -> Option<Path> {
    let [PACKET_COMMITMENT_PREFIX, port_and_channel @ .., SEQUENCE_PREFIX, sequence] = components
    else {
        return None;
    };

    let (port_id, channel_id) = parse_port_channel(port_and_channel)?;
    let sequence = Sequence::from_str(sequence).ok()?;

    Some(
        CommitmentPath {
            port_id,
            channel_id,
            sequence,
        }
        .into(),
    )
}

fn parse_channel_upgrades(components: &[&str]) -> Option<Path> {
    let [CHANNEL_UPGRADE_PREFIX, kind, rest @ ..] = components else {
        return None;
    };

    let (port_id, channel_id) = parse_port_channel(rest)?;

    match *kind {
        UPGRADE_PATH => Some(ChannelUpgradePath(port_id, channel_id).into()),
        UPGRADE_ERROR_PATH => Some(ChannelUpgradeErrorPath(port_id, channel_id).into()),
        COUNTERPARTY_UPGRADE_PATH => Some(CounterpartyUpgradePath(port_id, channel_id).into()),
        _ => None,
    }
}
