//! An application whose only concern is the version it runs on a channel.

use ibc_core::channel::types::channel::Order;
use ibc_core::channel::types::error::ChannelError;
use ibc_core::channel::types::upgrade::UpgradeFields;
use ibc_core::channel::types::Version;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_core::primitives::prelude::*;
use ibc_core::router::module::Module;
use ibc_core::router::types::event::{ModuleEvent, ModuleEventAttribute};
use ibc_core::router::types::module::ModuleExtras;

pub const MOCK_MODULE_ID: &str = "mockmodule";

pub const MOCK_APP_VERSION_V1: &str = "mock-app-1";

pub const MOCK_APP_VERSION_V2: &str = "mock-app-2";

pub const MOCK_APP_VERSION_V3: &str = "mock-app-3";

pub const UPGRADE_APPLIED_EVENT: &str = "channel_upgrade_applied";

/// Accepts any upgrade to one of its supported versions.
#[derive(Clone, Debug)]
pub struct MockModule {
    supported_versions: Vec<Version>,
    refuse_ack: bool,
}

impl Default for MockModule {
    fn default() -> Self {
        Self {
            supported_versions: vec![
                Version::from(MOCK_APP_VERSION_V1),
                Version::from(MOCK_APP_VERSION_V2),
                Version::from(MOCK_APP_VERSION_V3),
            ],
            refuse_ack: false,
        }
    }
}

impl MockModule {
    pub fn with_supported_versions(versions: Vec<Version>) -> Self {
        Self {
            supported_versions: versions,
            ..Self::default()
        }
    }

    /// Makes the module refuse every counterparty version on ACK.
    pub fn refusing_ack(self) -> Self {
        Self {
            refuse_ack: true,
            ..self
        }
    }

    fn ensure_supported(&self, version: &Version) -> Result<(), ChannelError> {
        if !self.supported_versions.contains(version) {
            return Err(ChannelError::AppModule {
                description: format!("unsupported application version {version}"),
            });
        }
        Ok(())
    }
}

impl Module for MockModule {
    fn on_chan_upgrade_init_validate(
        &self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        proposed_fields: &UpgradeFields,
    ) -> Result<Version, ChannelError> {
        self.ensure_supported(&proposed_fields.version)?;
        Ok(proposed_fields.version.clone())
    }

    fn on_chan_upgrade_init_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        proposed_fields: &UpgradeFields,
    ) -> Result<(ModuleExtras, Version), ChannelError> {
        let version = self.on_chan_upgrade_init_validate(port_id, channel_id, proposed_fields)?;
        Ok((ModuleExtras::empty(), version))
    }

    fn on_chan_upgrade_try_execute(
        &mut self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        proposed_fields: &UpgradeFields,
    ) -> Result<(ModuleExtras, Version), ChannelError> {
        self.ensure_supported(&proposed_fields.version)?;
        Ok((ModuleExtras::empty(), proposed_fields.version.clone()))
    }

    fn on_chan_upgrade_ack_execute(
        &mut self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        counterparty_version: &Version,
    ) -> Result<ModuleExtras, ChannelError> {
        if self.refuse_ack {
            return Err(ChannelError::AppModule {
                description: format!("refused counterparty version {counterparty_version}"),
            });
        }
        self.ensure_supported(counterparty_version)?;
        Ok(ModuleExtras::empty())
    }

    fn on_chan_upgrade_open_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        ordering: Order,
        _connection_hops: &[ConnectionId],
        version: &Version,
    ) -> ModuleExtras {
        let attributes: Vec<ModuleEventAttribute> = vec![
            ("port_id", port_id).into(),
            ("channel_id", channel_id).into(),
            ("ordering", ordering).into(),
            ("version", version).into(),
        ];

        ModuleExtras::empty()
            .with_event(ModuleEvent {
                kind: UPGRADE_APPLIED_EVENT.to_string(),
                attributes,
            })
            .with_log(format!(
                "application on {port_id}/{channel_id} now runs {version}"
            ))
    }
}
