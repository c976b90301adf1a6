//! Types for the IBC events emitted by the channel upgrade handshake.

mod channel_attributes;

use ibc_core_host_types::identifiers::{ChannelId, PortId, Sequence};
use ibc_primitives::prelude::*;
use tendermint::abci;

use self::channel_attributes::{
    ChannelIdAttribute, ChannelStateAttribute, CounterpartyChannelIdAttribute,
    CounterpartyPortIdAttribute, PortIdAttribute, UpgradeConnectionHopsAttribute,
    UpgradeErrorReceiptAttribute, UpgradeOrderingAttribute, UpgradeSequenceAttribute,
    UpgradeTimeoutHeightAttribute, UpgradeTimeoutTimestampAttribute, UpgradeVersionAttribute,
};
use crate::channel::{Order, State};
use crate::upgrade::{ErrorReceipt, UpgradeFields, UpgradeTimeout};
use crate::Version;

/// Channel upgrade event types corresponding to ibc-go's channel events:
/// https://github.com/cosmos/ibc-go/blob/v8.0.0/modules/core/04-channel/types/events.go
const CHANNEL_UPGRADE_INIT_EVENT: &str = "channel_upgrade_init";
const CHANNEL_UPGRADE_TRY_EVENT: &str = "channel_upgrade_try";
const CHANNEL_UPGRADE_ACK_EVENT: &str = "channel_upgrade_ack";
const CHANNEL_UPGRADE_CONFIRM_EVENT: &str = "channel_upgrade_confirm";
const CHANNEL_UPGRADE_OPEN_EVENT: &str = "channel_upgrade_open";
const CHANNEL_UPGRADE_TIMEOUT_EVENT: &str = "channel_upgrade_timeout";
const CHANNEL_UPGRADE_CANCELLED_EVENT: &str = "channel_upgrade_cancelled";
const CHANNEL_UPGRADE_ERROR_EVENT: &str = "channel_upgrade_error";
const CHANNEL_FLUSH_COMPLETE_EVENT: &str = "channel_flush_complete";

/// Identifies the upgrading channel end and its counterparty. Every upgrade
/// event starts with these attributes.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeChannel {
    port_id_attr: PortIdAttribute,
    chan_id_attr: ChannelIdAttribute,
    counterparty_port_id_attr: CounterpartyPortIdAttribute,
    counterparty_chan_id_attr: CounterpartyChannelIdAttribute,
}

impl UpgradeChannel {
    pub fn new(
        port_id: PortId,
        chan_id: ChannelId,
        counterparty_port_id: PortId,
        counterparty_chan_id: Option<ChannelId>,
    ) -> Self {
        Self {
            port_id_attr: port_id.into(),
            chan_id_attr: chan_id.into(),
            counterparty_port_id_attr: counterparty_port_id.into(),
            counterparty_chan_id_attr: counterparty_chan_id.into(),
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id_attr.port_id
    }

    pub fn chan_id(&self) -> &ChannelId {
        &self.chan_id_attr.channel_id
    }

    pub fn counterparty_port_id(&self) -> &PortId {
        &self.counterparty_port_id_attr.counterparty_port_id
    }

    pub fn counterparty_chan_id(&self) -> Option<&ChannelId> {
        self.counterparty_chan_id_attr
            .counterparty_channel_id
            .as_ref()
    }

    fn into_attributes(self) -> Vec<abci::EventAttribute> {
        vec![
            self.port_id_attr.into(),
            self.chan_id_attr.into(),
            self.counterparty_port_id_attr.into(),
            self.counterparty_chan_id_attr.into(),
        ]
    }
}

/// The negotiated fields carried by the init, try, ack and open events.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
struct UpgradeFieldsAttributes {
    connection_hops_attr: UpgradeConnectionHopsAttribute,
    version_attr: UpgradeVersionAttribute,
    ordering_attr: UpgradeOrderingAttribute,
}

impl From<UpgradeFields> for UpgradeFieldsAttributes {
    fn from(fields: UpgradeFields) -> Self {
        Self {
            connection_hops_attr: fields.connection_hops.iter().collect(),
            version_attr: fields.version.into(),
            ordering_attr: fields.ordering.into(),
        }
    }
}

impl UpgradeFieldsAttributes {
    fn into_attributes(self) -> [abci::EventAttribute; 3] {
        [
            self.connection_hops_attr.into(),
            self.version_attr.into(),
            self.ordering_attr.into(),
        ]
    }
}

macro_rules! upgrade_fields_event {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[cfg_attr(
            feature = "borsh",
            derive(borsh::BorshSerialize, borsh::BorshDeserialize)
        )]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            channel: UpgradeChannel,
            fields_attrs: UpgradeFieldsAttributes,
            upgrade_sequence_attr: UpgradeSequenceAttribute,
        }

        impl $name {
            pub fn new(channel: UpgradeChannel, fields: UpgradeFields, upgrade_sequence: Sequence) -> Self {
                Self {
                    channel,
                    fields_attrs: fields.into(),
                    upgrade_sequence_attr: upgrade_sequence.into(),
                }
            }

            pub fn channel(&self) -> &UpgradeChannel {
                &self.channel
            }

            pub fn connection_hops(&self) -> &[String] {
                &self.fields_attrs.connection_hops_attr.upgrade_connection_hops
            }

            pub fn version(&self) -> &Version {
                &self.fields_attrs.version_attr.upgrade_version
            }

            pub fn ordering(&self) -> &Order {
                &self.fields_attrs.ordering_attr.upgrade_ordering
            }

            pub fn upgrade_sequence(&self) -> &Sequence {
                &self.upgrade_sequence_attr.upgrade_sequence
            }

            pub fn event_type(&self) -> &str {
                $kind
            }
        }

        impl From<$name> for abci::Event {
            fn from(e: $name) -> Self {
                let mut attributes = e.channel.into_attributes();
                attributes.extend(e.fields_attrs.into_attributes());
                attributes.push(e.upgrade_sequence_attr.into());
                abci::Event {
                    kind: $kind.to_string(),
                    attributes,
                }
            }
        }
    };
}

upgrade_fields_event!(
    /// Emitted when a channel end proposes an upgrade.
    UpgradeInit,
    CHANNEL_UPGRADE_INIT_EVENT
);
upgrade_fields_event!(
    /// Emitted when a channel end answers a counterparty proposal and starts
    /// flushing.
    UpgradeTry,
    CHANNEL_UPGRADE_TRY_EVENT
);
upgrade_fields_event!(
    /// Emitted when the proposing end accepts the counterparty's answer.
    UpgradeAck,
    CHANNEL_UPGRADE_ACK_EVENT
);
upgrade_fields_event!(
    /// Emitted once the upgraded fields are committed and the channel reopens.
    UpgradeOpen,
    CHANNEL_UPGRADE_OPEN_EVENT
);

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeConfirm {
    channel: UpgradeChannel,
    channel_state_attr: ChannelStateAttribute,
    upgrade_sequence_attr: UpgradeSequenceAttribute,
}

impl UpgradeConfirm {
    pub fn new(channel: UpgradeChannel, channel_state: State, upgrade_sequence: Sequence) -> Self {
        Self {
            channel,
            channel_state_attr: channel_state.into(),
            upgrade_sequence_attr: upgrade_sequence.into(),
        }
    }

    pub fn channel(&self) -> &UpgradeChannel {
        &self.channel
    }

    pub fn channel_state(&self) -> &State {
        &self.channel_state_attr.channel_state
    }

    pub fn upgrade_sequence(&self) -> &Sequence {
        &self.upgrade_sequence_attr.upgrade_sequence
    }

    pub fn event_type(&self) -> &str {
        CHANNEL_UPGRADE_CONFIRM_EVENT
    }
}

impl From<UpgradeConfirm> for abci::Event {
    fn from(e: UpgradeConfirm) -> Self {
        let mut attributes = e.channel.into_attributes();
        attributes.push(e.channel_state_attr.into());
        attributes.push(e.upgrade_sequence_attr.into());
        abci::Event {
            kind: CHANNEL_UPGRADE_CONFIRM_EVENT.to_string(),
            attributes,
        }
    }
}

/// Emitted when an upgrade attempt is abandoned because its timeout elapsed
/// on the counterparty.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeTimeoutEvent {
    channel: UpgradeChannel,
    timeout_height_attr: UpgradeTimeoutHeightAttribute,
    timeout_timestamp_attr: UpgradeTimeoutTimestampAttribute,
    upgrade_sequence_attr: UpgradeSequenceAttribute,
}

impl UpgradeTimeoutEvent {
    pub fn new(channel: UpgradeChannel, timeout: UpgradeTimeout, upgrade_sequence: Sequence) -> Self {
        Self {
            channel,
            timeout_height_attr: timeout.height.into(),
            timeout_timestamp_attr: timeout.timestamp.into(),
            upgrade_sequence_attr: upgrade_sequence.into(),
        }
    }

    pub fn channel(&self) -> &UpgradeChannel {
        &self.channel
    }

    pub fn timeout(&self) -> UpgradeTimeout {
        UpgradeTimeout::new(
            self.timeout_height_attr.timeout_height,
            self.timeout_timestamp_attr.timeout_timestamp,
        )
    }

    pub fn upgrade_sequence(&self) -> &Sequence {
        &self.upgrade_sequence_attr.upgrade_sequence
    }

    pub fn event_type(&self) -> &str {
        CHANNEL_UPGRADE_TIMEOUT_EVENT
    }
}

impl From<UpgradeTimeoutEvent> for abci::Event {
    fn from(e: UpgradeTimeoutEvent) -> Self {
        let mut attributes = e.channel.into_attributes();
        attributes.push(e.timeout_height_attr.into());
        attributes.push(e.timeout_timestamp_attr.into());
        attributes.push(e.upgrade_sequence_attr.into());
        abci::Event {
            kind: CHANNEL_UPGRADE_TIMEOUT_EVENT.to_string(),
            attributes,
        }
    }
}

#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeCancelled {
    channel: UpgradeChannel,
    upgrade_sequence_attr: UpgradeSequenceAttribute,
}

impl UpgradeCancelled {
    pub fn new(channel: UpgradeChannel, upgrade_sequence: Sequence) -> Self {
        Self {
            channel,
            upgrade_sequence_attr: upgrade_sequence.into(),
        }
    }

    pub fn channel(&self) -> &UpgradeChannel {
        &self.channel
    }

    pub fn upgrade_sequence(&self) -> &Sequence {
        &self.upgrade_sequence_attr.upgrade_sequence
    }

    pub fn event_type(&self) -> &str {
        CHANNEL_UPGRADE_CANCELLED_EVENT
    }
}

impl From<UpgradeCancelled> for abci::Event {
    fn from(e: UpgradeCancelled) -> Self {
        let mut attributes = e.channel.into_attributes();
        attributes.push(e.upgrade_sequence_attr.into());
        abci::Event {
            kind: CHANNEL_UPGRADE_CANCELLED_EVENT.to_string(),
            attributes,
        }
    }
}

/// Emitted whenever an upgrade attempt is aborted and an error receipt is
/// written.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeErrorEvent {
    channel: UpgradeChannel,
    upgrade_sequence_attr: UpgradeSequenceAttribute,
    error_receipt_attr: UpgradeErrorReceiptAttribute,
}

impl UpgradeErrorEvent {
    pub fn new(channel: UpgradeChannel, error_receipt: ErrorReceipt) -> Self {
        Self {
            channel,
            upgrade_sequence_attr: error_receipt.sequence.into(),
            error_receipt_attr: error_receipt.into(),
        }
    }

    pub fn channel(&self) -> &UpgradeChannel {
        &self.channel
    }

    pub fn upgrade_sequence(&self) -> &Sequence {
        &self.upgrade_sequence_attr.upgrade_sequence
    }

    pub fn error_receipt(&self) -> &ErrorReceipt {
        &self.error_receipt_attr.error_receipt
    }

    pub fn event_type(&self) -> &str {
        CHANNEL_UPGRADE_ERROR_EVENT
    }
}

impl From<UpgradeErrorEvent> for abci::Event {
    fn from(e: UpgradeErrorEvent) -> Self {
        let mut attributes = e.channel.into_attributes();
        attributes.push(e.upgrade_sequence_attr.into());
        attributes.push(e.error_receipt_attr.into());
        abci::Event {
            kind: CHANNEL_UPGRADE_ERROR_EVENT.to_string(),
            attributes,
        }
    }
}

/// Emitted when the last in-flight packet of an upgrading channel clears.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlushComplete {
    channel: UpgradeChannel,
    channel_state_attr: ChannelStateAttribute,
}

impl FlushComplete {
    pub fn new(channel: UpgradeChannel, channel_state: State) -> Self {
        Self {
            channel,
            channel_state_attr: channel_state.into(),
        }
    }

    pub fn channel(&self) -> &UpgradeChannel {
        &self.channel
    }

    pub fn channel_state(&self) -> &State {
        &self.channel_state_attr.channel_state
    }

    pub fn event_type(&self) -> &str {
        CHANNEL_FLUSH_COMPLETE_EVENT
    }
}

impl From<FlushComplete> for abci::Event {
    fn from(e: FlushComplete) -> Self {
        let mut attributes = e.channel.into_attributes();
        attributes.push(e.channel_state_attr.into());
        abci::Event {
            kind: CHANNEL_FLUSH_COMPLETE_EVENT.to_string(),
            attributes,
        }
    }
}
