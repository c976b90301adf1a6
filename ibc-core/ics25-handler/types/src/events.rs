//! Defines events emitted during handling of IBC messages

use ibc_core_channel_types::events as ChannelEvents;
use ibc_core_router_types::event::ModuleEvent;
use ibc_primitives::prelude::*;
use tendermint::abci;

const MESSAGE_EVENT: &str = "message";

/// Events created by the IBC component of a chain, destined for a relayer.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum IbcEvent {
    UpgradeInitChannel(ChannelEvents::UpgradeInit),
    UpgradeTryChannel(ChannelEvents::UpgradeTry),
    UpgradeAckChannel(ChannelEvents::UpgradeAck),
    UpgradeConfirmChannel(ChannelEvents::UpgradeConfirm),
    UpgradeOpenChannel(ChannelEvents::UpgradeOpen),
    UpgradeTimeoutChannel(ChannelEvents::UpgradeTimeoutEvent),
    UpgradeCancelledChannel(ChannelEvents::UpgradeCancelled),
    UpgradeErrorChannel(ChannelEvents::UpgradeErrorEvent),
    FlushCompleteChannel(ChannelEvents::FlushComplete),

    Module(ModuleEvent),
    Message(MessageEvent),
}

impl From<IbcEvent> for abci::Event {
    fn from(event: IbcEvent) -> Self {
        match event {
            IbcEvent::UpgradeInitChannel(event) => event.into(),
            IbcEvent::UpgradeTryChannel(event) => event.into(),
            IbcEvent::UpgradeAckChannel(event) => event.into(),
            IbcEvent::UpgradeConfirmChannel(event) => event.into(),
            IbcEvent::UpgradeOpenChannel(event) => event.into(),
            IbcEvent::UpgradeTimeoutChannel(event) => event.into(),
            IbcEvent::UpgradeCancelledChannel(event) => event.into(),
            IbcEvent::UpgradeErrorChannel(event) => event.into(),
            IbcEvent::FlushCompleteChannel(event) => event.into(),
            IbcEvent::Module(event) => event.into(),
            IbcEvent::Message(event) => abci::Event {
                kind: MESSAGE_EVENT.to_string(),
                attributes: vec![("module", event.module_attribute(), true).into()],
            },
        }
    }
}

impl IbcEvent {
    pub fn event_type(&self) -> &str {
        match self {
            IbcEvent::UpgradeInitChannel(event) => event.event_type(),
            IbcEvent::UpgradeTryChannel(event) => event.event_type(),
            IbcEvent::UpgradeAckChannel(event) => event.event_type(),
            IbcEvent::UpgradeConfirmChannel(event) => event.event_type(),
            IbcEvent::UpgradeOpenChannel(event) => event.event_type(),
            IbcEvent::UpgradeTimeoutChannel(event) => event.event_type(),
            IbcEvent::UpgradeCancelledChannel(event) => event.event_type(),
            IbcEvent::UpgradeErrorChannel(event) => event.event_type(),
            IbcEvent::FlushCompleteChannel(event) => event.event_type(),
            IbcEvent::Module(module_event) => module_event.kind.as_str(),
            IbcEvent::Message(_) => MESSAGE_EVENT,
        }
    }
}

/// An event type that is emitted by the Cosmos SDK.
///
/// We need to emit it as well, as currently [hermes] relies on it.
///
/// [hermes]: https://github.com/informalsystems/hermes
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEvent {
    Channel,
    // stores the module name
    Module(String),
}

impl MessageEvent {
    /// The ABCI event attribute has only one attribute, with key `module`.
    /// This method gets the associated value.
    pub fn module_attribute(&self) -> String {
        match self {
            MessageEvent::Channel => "ibc_channel".to_string(),
            MessageEvent::Module(module_name) => module_name.clone(),
        }
    }
}
