use ibc_core::channel::types::channel::{Order, State as ChannelState};
use ibc_core::channel::types::upgrade::{UpgradeFields, UpgradeOutcome, UpgradeTimeout};
use ibc_core::client::ClientExecutionContext;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use ibc_core::host::ExecutionContext;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use typed_builder::TypedBuilder;

use crate::fixtures::core::channel::dummy_channel_end;
use crate::fixtures::core::connection::{dummy_client_id, dummy_open_connection_end};
use crate::fixtures::core::context::MockContextConfig;
use crate::fixtures::core::signer::dummy_account_id;
use crate::relayer::error::RelayerError;
use crate::relayer::utils::{ChainEnd, RelayerOps};
use crate::testapp::ibc::applications::mock_app::{MockModule, MOCK_APP_VERSION_V1};
use crate::testapp::ibc::clients::mock::client_state::MockClientState;
use crate::testapp::ibc::clients::mock::consensus_state::MockConsensusState;
use crate::testapp::ibc::core::router::MockRouter;
use crate::testapp::ibc::core::types::MockContext;

/// Number of open connections between the two chains. The channel runs over
/// `connection-0`; the others are available to upgrades that move it.
pub const CONNECTION_COUNT: u64 = 2;

/// Two chains sharing an open channel on the transfer port.
#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = RelayerContext))]
pub struct RelayerConfig {
    #[builder(default = Order::Unordered)]
    ordering: Order,

    #[builder(default = MOCK_APP_VERSION_V1.to_string(), setter(into))]
    version: String,

    #[builder(default)]
    module_a: MockModule,

    #[builder(default)]
    module_b: MockModule,

    #[builder(default = MockContextConfig::builder().chain_id("mockgaia-0").build())]
    ctx_a: MockContext,

    #[builder(default = MockContextConfig::builder().chain_id("mockgaia-1").build())]
    ctx_b: MockContext,
}

/// Drives a channel upgrade between chain A and chain B, relaying every
/// datagram with proofs taken from the latest block of its source.
#[derive(Debug)]
pub struct RelayerContext {
    chain_a: ChainEnd,
    chain_b: ChainEnd,
    signer: Signer,
}

impl From<RelayerConfig> for RelayerContext {
    fn from(config: RelayerConfig) -> Self {
        let chain_a = open_channel_end(
            config.ctx_a,
            config.module_a,
            config.ordering,
            &config.version,
        );
        let chain_b = open_channel_end(
            config.ctx_b,
            config.module_b,
            config.ordering,
            &config.version,
        );

        let mut relayer = Self {
            chain_a,
            chain_b,
            signer: dummy_account_id(),
        };

        relayer.create_client_on_a();
        relayer.create_client_on_b();

        relayer
    }
}

fn open_channel_end(
    ctx: MockContext,
    module: MockModule,
    ordering: Order,
    version: &str,
) -> ChainEnd {
    let client_id = dummy_client_id(0);
    let port_id = PortId::transfer();
    let chan_id = ChannelId::new(0);
    let conn_id = ConnectionId::new(0);

    let mut ctx = (0..CONNECTION_COUNT).fold(ctx, |ctx, counter| {
        ctx.with_connection(
            ConnectionId::new(counter),
            dummy_open_connection_end(
                client_id.clone(),
                client_id.clone(),
                ConnectionId::new(counter),
            ),
        )
    });

    ctx = ctx
        .with_channel(
            port_id.clone(),
            chan_id.clone(),
            dummy_channel_end(
                ChannelState::Open,
                ordering,
                chan_id.clone(),
                conn_id.clone(),
                version,
                0,
            ),
        )
        .with_send_sequence(port_id.clone(), chan_id.clone(), Sequence::from(1));

    ctx.advance_block();

    ChainEnd {
        ctx,
        router: MockRouter::new_with_module(module),
        client_id,
        conn_id,
        port_id,
        chan_id,
    }
}

fn create_client(dst: &mut ChainEnd, src: &ChainEnd) {
    let src_block = src.ctx.host.latest_block().expect("Never fails");

    let client_ctx = dst.ctx.get_client_execution_context();
    client_ctx
        .store_client_state(
            dst.client_id.clone(),
            MockClientState::new(src_block.height),
        )
        .expect("Never fails");
    client_ctx
        .store_consensus_state(
            dst.client_id.clone(),
            src_block.height,
            MockConsensusState::from(src_block),
        )
        .expect("Never fails");
}

impl RelayerContext {
    pub fn new() -> Self {
        RelayerConfig::builder().build()
    }

    pub fn chain_a(&self) -> &ChainEnd {
        &self.chain_a
    }

    pub fn chain_b(&self) -> &ChainEnd {
        &self.chain_b
    }

    pub fn chain_a_mut(&mut self) -> &mut ChainEnd {
        &mut self.chain_a
    }

    pub fn chain_b_mut(&mut self) -> &mut ChainEnd {
        &mut self.chain_b
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Swaps the roles of the two chains.
    pub fn reverse(self) -> Self {
        Self {
            chain_a: self.chain_b,
            chain_b: self.chain_a,
            signer: self.signer,
        }
    }

    pub fn create_client_on_a(&mut self) {
        create_client(&mut self.chain_a, &self.chain_b)
    }

    pub fn create_client_on_b(&mut self) {
        create_client(&mut self.chain_b, &self.chain_a)
    }

    pub fn update_client_on_a(&mut self) -> Result<(), RelayerError> {
        RelayerOps::update_client(&mut self.chain_a, &self.chain_b)
    }

    pub fn update_client_on_b(&mut self) -> Result<(), RelayerError> {
        RelayerOps::update_client(&mut self.chain_b, &self.chain_a)
    }

    /// Fields an upgrade to `version` would propose, keeping the current
    /// ordering and connection of the channel.
    pub fn upgrade_fields_to(&self, version: &str) -> UpgradeFields {
        let mut fields = self.chain_a.channel().fields();
        fields.version = version.into();
        fields
    }

    pub fn upgrade_init_on_a(
        &mut self,
        fields: UpgradeFields,
        timeout: UpgradeTimeout,
    ) -> Result<UpgradeOutcome, RelayerError> {
        let msg =
            RelayerOps::build_upgrade_init(&self.chain_a, fields, timeout, self.signer.clone());
        self.chain_a.deliver(msg)
    }

    pub fn upgrade_init_on_b(
        &mut self,
        fields: UpgradeFields,
        timeout: UpgradeTimeout,
    ) -> Result<UpgradeOutcome, RelayerError> {
        let msg =
            RelayerOps::build_upgrade_init(&self.chain_b, fields, timeout, self.signer.clone());
        self.chain_b.deliver(msg)
    }

    pub fn upgrade_try_on_b(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_b()?;
        let msg = RelayerOps::build_upgrade_try(&self.chain_b, &self.chain_a, self.signer.clone())?;
        self.chain_b.deliver(msg)
    }

    pub fn upgrade_try_on_a(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_a()?;
        let msg = RelayerOps::build_upgrade_try(&self.chain_a, &self.chain_b, self.signer.clone())?;
        self.chain_a.deliver(msg)
    }

    pub fn upgrade_ack_on_a(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_a()?;
        let msg = RelayerOps::build_upgrade_ack(&self.chain_a, &self.chain_b, self.signer.clone())?;
        self.chain_a.deliver(msg)
    }

    pub fn upgrade_ack_on_b(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_b()?;
        let msg = RelayerOps::build_upgrade_ack(&self.chain_b, &self.chain_a, self.signer.clone())?;
        self.chain_b.deliver(msg)
    }

    pub fn upgrade_confirm_on_b(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_b()?;
        let msg =
            RelayerOps::build_upgrade_confirm(&self.chain_b, &self.chain_a, self.signer.clone())?;
        self.chain_b.deliver(msg)
    }

    pub fn upgrade_confirm_on_a(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_a()?;
        let msg =
            RelayerOps::build_upgrade_confirm(&self.chain_a, &self.chain_b, self.signer.clone())?;
        self.chain_a.deliver(msg)
    }

    pub fn upgrade_open_on_a(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_a()?;
        let msg = RelayerOps::build_upgrade_open(&self.chain_a, &self.chain_b, self.signer.clone())?;
        self.chain_a.deliver(msg)
    }

    pub fn upgrade_open_on_b(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_b()?;
        let msg = RelayerOps::build_upgrade_open(&self.chain_b, &self.chain_a, self.signer.clone())?;
        self.chain_b.deliver(msg)
    }

    /// Cancels the attempt on A with the error receipt of B.
    pub fn upgrade_cancel_on_a(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_a()?;
        let msg =
            RelayerOps::build_upgrade_cancel(&self.chain_a, &self.chain_b, self.signer.clone())?;
        self.chain_a.deliver(msg)
    }

    /// Cancels the attempt on B with the error receipt of A.
    pub fn upgrade_cancel_on_b(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_b()?;
        let msg =
            RelayerOps::build_upgrade_cancel(&self.chain_b, &self.chain_a, self.signer.clone())?;
        self.chain_b.deliver(msg)
    }

    /// A cancel without receipt on A, signed by `signer`.
    pub fn authority_cancel_on_a(&mut self, signer: Signer) -> Result<UpgradeOutcome, RelayerError> {
        let msg = RelayerOps::build_authority_cancel(&self.chain_a, signer);
        self.chain_a.deliver(msg)
    }

    pub fn upgrade_timeout_on_a(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_a()?;
        let msg =
            RelayerOps::build_upgrade_timeout(&self.chain_a, &self.chain_b, self.signer.clone())?;
        self.chain_a.deliver(msg)
    }

    pub fn upgrade_timeout_on_b(&mut self) -> Result<UpgradeOutcome, RelayerError> {
        self.update_client_on_b()?;
        let msg =
            RelayerOps::build_upgrade_timeout(&self.chain_b, &self.chain_a, self.signer.clone())?;
        self.chain_b.deliver(msg)
    }

    /// Runs the handshake from INIT on A to OPEN on both ends, for a
    /// channel without packets in flight.
    pub fn upgrade_channel(
        &mut self,
        fields: UpgradeFields,
        timeout: UpgradeTimeout,
    ) -> Result<(), RelayerError> {
        self.upgrade_init_on_a(fields, timeout)?;
        self.upgrade_try_on_b()?;
        self.upgrade_ack_on_a()?;
        self.upgrade_confirm_on_b()?;
        self.upgrade_open_on_a()?;
        Ok(())
    }
}

impl Default for RelayerContext {
    fn default() -> Self {
        Self::new()
    }
}
