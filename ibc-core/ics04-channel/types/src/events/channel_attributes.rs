//! This module holds all the abci event attributes for IBC events emitted
//! during the channel upgrade handshake.
use derive_more::From;
use ibc_core_host_types::identifiers::{ChannelId, PortId, Sequence};
use ibc_primitives::prelude::*;
use tendermint::abci;

use crate::channel::{Order, State};
use crate::timeout::{TimeoutHeight, TimeoutTimestamp};
use crate::upgrade::ErrorReceipt;
use crate::Version;

const PORT_ID_ATTRIBUTE_KEY: &str = "port_id";
const CHANNEL_ID_ATTRIBUTE_KEY: &str = "channel_id";
const COUNTERPARTY_PORT_ID_ATTRIBUTE_KEY: &str = "counterparty_port_id";
const COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY: &str = "counterparty_channel_id";
const UPGRADE_SEQUENCE_ATTRIBUTE_KEY: &str = "upgrade_sequence";
const UPGRADE_CONNECTION_HOPS_ATTRIBUTE_KEY: &str = "upgrade_connection_hops";
const UPGRADE_VERSION_ATTRIBUTE_KEY: &str = "upgrade_version";
const UPGRADE_ORDERING_ATTRIBUTE_KEY: &str = "upgrade_ordering";
const UPGRADE_ERROR_RECEIPT_ATTRIBUTE_KEY: &str = "upgrade_error_receipt";
const UPGRADE_TIMEOUT_HEIGHT_ATTRIBUTE_KEY: &str = "upgrade_timeout_height";
const UPGRADE_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY: &str = "upgrade_timeout_timestamp";
const CHANNEL_STATE_ATTRIBUTE_KEY: &str = "channel_state";

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct PortIdAttribute {
    pub port_id: PortId,
}

impl From<PortIdAttribute> for abci::EventAttribute {
    fn from(attr: PortIdAttribute) -> Self {
        (PORT_ID_ATTRIBUTE_KEY, attr.port_id.as_str()).into()
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct ChannelIdAttribute {
    pub channel_id: ChannelId,
}

impl From<ChannelIdAttribute> for abci::EventAttribute {
    fn from(attr: ChannelIdAttribute) -> Self {
        (CHANNEL_ID_ATTRIBUTE_KEY, attr.channel_id.as_str()).into()
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct CounterpartyPortIdAttribute {
    pub counterparty_port_id: PortId,
}

impl From<CounterpartyPortIdAttribute> for abci::EventAttribute {
    fn from(attr: CounterpartyPortIdAttribute) -> Self {
        (
            COUNTERPARTY_PORT_ID_ATTRIBUTE_KEY,
            attr.counterparty_port_id.as_str(),
        )
            .into()
    }
}

/// The counterparty channel id is only known once the remote end exists, so
/// an unset id is emitted as an empty value.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct CounterpartyChannelIdAttribute {
    pub counterparty_channel_id: Option<ChannelId>,
}

impl From<CounterpartyChannelIdAttribute> for abci::EventAttribute {
    fn from(attr: CounterpartyChannelIdAttribute) -> Self {
        match attr.counterparty_channel_id {
            Some(channel_id) => {
                (COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY, channel_id.as_str()).into()
            }
            None => (COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY, "").into(),
        }
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct UpgradeSequenceAttribute {
    pub upgrade_sequence: Sequence,
}

impl From<UpgradeSequenceAttribute> for abci::EventAttribute {
    fn from(attr: UpgradeSequenceAttribute) -> Self {
        (
            UPGRADE_SEQUENCE_ATTRIBUTE_KEY,
            attr.upgrade_sequence.to_string(),
        )
            .into()
    }
}

/// Hops are joined with a comma, as ibc-go does.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeConnectionHopsAttribute {
    pub upgrade_connection_hops: Vec<String>,
}

impl<I: ToString> FromIterator<I> for UpgradeConnectionHopsAttribute {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            upgrade_connection_hops: iter.into_iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl From<UpgradeConnectionHopsAttribute> for abci::EventAttribute {
    fn from(attr: UpgradeConnectionHopsAttribute) -> Self {
        (
            UPGRADE_CONNECTION_HOPS_ATTRIBUTE_KEY,
            attr.upgrade_connection_hops.join(","),
        )
            .into()
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct UpgradeVersionAttribute {
    pub upgrade_version: Version,
}

impl From<UpgradeVersionAttribute> for abci::EventAttribute {
    fn from(attr: UpgradeVersionAttribute) -> Self {
        (UPGRADE_VERSION_ATTRIBUTE_KEY, attr.upgrade_version.as_str()).into()
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct UpgradeOrderingAttribute {
    pub upgrade_ordering: Order,
}

impl From<UpgradeOrderingAttribute> for abci::EventAttribute {
    fn from(attr: UpgradeOrderingAttribute) -> Self {
        (UPGRADE_ORDERING_ATTRIBUTE_KEY, attr.upgrade_ordering.as_str()).into()
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct UpgradeErrorReceiptAttribute {
    pub error_receipt: ErrorReceipt,
}

impl From<UpgradeErrorReceiptAttribute> for abci::EventAttribute {
    fn from(attr: UpgradeErrorReceiptAttribute) -> Self {
        (
            UPGRADE_ERROR_RECEIPT_ATTRIBUTE_KEY,
            attr.error_receipt.message.as_str(),
        )
            .into()
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct UpgradeTimeoutHeightAttribute {
    pub timeout_height: TimeoutHeight,
}

impl From<UpgradeTimeoutHeightAttribute> for abci::EventAttribute {
    fn from(attr: UpgradeTimeoutHeightAttribute) -> Self {
        match attr.timeout_height {
            TimeoutHeight::Never => (UPGRADE_TIMEOUT_HEIGHT_ATTRIBUTE_KEY, "0-0").into(),
            TimeoutHeight::At(height) => {
                (UPGRADE_TIMEOUT_HEIGHT_ATTRIBUTE_KEY, height.to_string()).into()
            }
        }
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct UpgradeTimeoutTimestampAttribute {
    pub timeout_timestamp: TimeoutTimestamp,
}

impl From<UpgradeTimeoutTimestampAttribute> for abci::EventAttribute {
    fn from(attr: UpgradeTimeoutTimestampAttribute) -> Self {
        (
            UPGRADE_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY,
            attr.timeout_timestamp.nanoseconds().to_string(),
        )
            .into()
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, From, PartialEq, Eq)]
pub struct ChannelStateAttribute {
    pub channel_state: State,
}

impl From<ChannelStateAttribute> for abci::EventAttribute {
    fn from(attr: ChannelStateAttribute) -> Self {
        (CHANNEL_STATE_ATTRIBUTE_KEY, attr.channel_state.as_str()).into()
    }
}
