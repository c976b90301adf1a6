use ibc_core::channel::types::channel::ChannelEnd;
use ibc_core::channel::types::msgs::{
    ChannelUpgradeMsg, MsgChannelUpgradeAck, MsgChannelUpgradeCancel, MsgChannelUpgradeConfirm,
    MsgChannelUpgradeInit, MsgChannelUpgradeOpen, MsgChannelUpgradeTimeout, MsgChannelUpgradeTry,
};
use ibc_core::channel::types::upgrade::{Upgrade, UpgradeFields, UpgradeOutcome, UpgradeTimeout};
use ibc_core::client::types::Height;
use ibc_core::client::{ClientExecutionContext, ClientValidationContext};
use ibc_core::commitment_types::commitment::CommitmentProofBytes;
use ibc_core::handler::types::msgs::MsgEnvelope;
use ibc_core::host::types::identifiers::{ChannelId, ClientId, ConnectionId, PortId};
use ibc_core::host::types::path::{
    ChannelEndPath, ChannelUpgradeErrorPath, ChannelUpgradePath, Path,
};
use ibc_core::host::{ExecutionContext, ValidationContext};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use tracing::debug;

use crate::relayer::error::RelayerError;
use crate::testapp::ibc::clients::mock::consensus_state::MockConsensusState;
use crate::testapp::ibc::core::router::MockRouter;
use crate::testapp::ibc::core::types::MockContext;

/// One end of a channel together with the chain hosting it.
#[derive(Debug)]
pub struct ChainEnd {
    pub ctx: MockContext,
    pub router: MockRouter,
    /// Client tracking the counterparty chain.
    pub client_id: ClientId,
    /// Connection the channel was opened over.
    pub conn_id: ConnectionId,
    pub port_id: PortId,
    pub chan_id: ChannelId,
}

impl ChainEnd {
    pub fn channel(&self) -> ChannelEnd {
        self.ctx
            .channel(&self.port_id, &self.chan_id)
            .expect("channel exists")
    }

    pub fn upgrade(&self) -> Option<Upgrade> {
        self.ctx.upgrade(&self.port_id, &self.chan_id)
    }

    /// Processes `msg` on this chain and commits the result in a new block.
    pub fn deliver(
        &mut self,
        msg: impl Into<ChannelUpgradeMsg>,
    ) -> Result<UpgradeOutcome, RelayerError> {
        let msg = MsgEnvelope::ChannelUpgrade(msg.into());
        self.ctx.deliver(&mut self.router, msg)
    }
}

/// Operations a relayer performs to move a channel upgrade from the `src`
/// end to the `dst` end. Every message is proven against the latest block
/// of `src`, which `dst` learns about through [`RelayerOps::update_client`].
pub struct RelayerOps;

impl RelayerOps {
    /// Makes the client on `dst` trust the latest block of `src`.
    ///
    /// Client updates are driven by the host rather than by a datagram here,
    /// so the new client and consensus states are written directly.
    pub fn update_client(dst: &mut ChainEnd, src: &ChainEnd) -> Result<(), RelayerError> {
        let src_block = src
            .ctx
            .host
            .latest_block()
            .ok_or_else(|| RelayerError::NothingToRelay {
                description: "source chain has no block".to_string(),
            })?;

        let client_state = dst.ctx.client_state(&dst.client_id).map_err(|_| {
            RelayerError::ClientStateNotFound {
                client_id: dst.client_id.clone(),
            }
        })?;

        if client_state.latest_height > src_block.height {
            return Err(RelayerError::ClientAtHigherHeight {
                client_id: dst.client_id.clone(),
                source_height: src_block.height,
                destination_height: client_state.latest_height,
            });
        }

        debug!(client_id = %dst.client_id, height = %src_block.height, "updating client");

        let client_ctx = dst.ctx.get_client_execution_context();
        client_ctx
            .store_client_state(
                dst.client_id.clone(),
                client_state.with_latest_height(src_block.height),
            )
            .map_err(RelayerError::TransactionFailed)?;
        client_ctx
            .store_consensus_state(
                dst.client_id.clone(),
                src_block.height,
                MockConsensusState::from(src_block),
            )
            .map_err(RelayerError::TransactionFailed)?;

        Ok(())
    }

    pub fn proof(
        src: &ChainEnd,
        height: Height,
        path: Path,
    ) -> Result<CommitmentProofBytes, RelayerError> {
        src.ctx
            .get_proof(height, &path)
            .ok_or(RelayerError::MissingProof { path, height })
    }

    fn src_upgrade(src: &ChainEnd) -> Result<Upgrade, RelayerError> {
        src.upgrade().ok_or_else(|| RelayerError::NothingToRelay {
            description: format!("no upgrade pending on {}", src.chan_id),
        })
    }

    fn proofs_of_channel_and_upgrade(
        src: &ChainEnd,
        height: Height,
    ) -> Result<(CommitmentProofBytes, CommitmentProofBytes), RelayerError> {
        let proof_chan_end =
            Self::proof(src, height, ChannelEndPath::new(&src.port_id, &src.chan_id).into())?;
        let proof_upgrade = Self::proof(
            src,
            height,
            ChannelUpgradePath::new(&src.port_id, &src.chan_id).into(),
        )?;
        Ok((proof_chan_end, proof_upgrade))
    }

    pub fn build_upgrade_init(
        dst: &ChainEnd,
        fields: UpgradeFields,
        timeout: UpgradeTimeout,
        signer: Signer,
    ) -> MsgChannelUpgradeInit {
        MsgChannelUpgradeInit::new(
            dst.port_id.clone(),
            dst.chan_id.clone(),
            fields,
            timeout,
            signer,
        )
    }

    /// Answers the proposal of `src`. The connection hop proposed on `dst`
    /// is the far end of the connection `src` proposed.
    pub fn build_upgrade_try(
        dst: &ChainEnd,
        src: &ChainEnd,
        signer: Signer,
    ) -> Result<MsgChannelUpgradeTry, RelayerError> {
        let counterparty_upgrade = Self::src_upgrade(src)?;

        let hop_on_src = counterparty_upgrade
            .fields
            .connection_hop()
            .map_err(|e| RelayerError::TransactionFailed(e.into()))?;
        let hop_on_dst = src
            .ctx
            .connection_end(hop_on_src)
            .map_err(RelayerError::TransactionFailed)?
            .counterparty()
            .connection_id()
            .cloned()
            .ok_or_else(|| RelayerError::NothingToRelay {
                description: format!("connection {hop_on_src} has no counterparty"),
            })?;

        let proof_height_on_a = src.ctx.latest_height();
        let (proof_chan_end_on_a, proof_upgrade_on_a) =
            Self::proofs_of_channel_and_upgrade(src, proof_height_on_a)?;

        Ok(MsgChannelUpgradeTry {
            port_id_on_b: dst.port_id.clone(),
            chan_id_on_b: dst.chan_id.clone(),
            proposed_connection_hops: vec![hop_on_dst],
            counterparty_upgrade,
            counterparty_upgrade_sequence: src.channel().upgrade_sequence(),
            proof_chan_end_on_a,
            proof_upgrade_on_a,
            proof_height_on_a,
            signer,
        })
    }

    pub fn build_upgrade_ack(
        dst: &ChainEnd,
        src: &ChainEnd,
        signer: Signer,
    ) -> Result<MsgChannelUpgradeAck, RelayerError> {
        let proof_height_on_b = src.ctx.latest_height();
        let (proof_chan_end_on_b, proof_upgrade_on_b) =
            Self::proofs_of_channel_and_upgrade(src, proof_height_on_b)?;

        Ok(MsgChannelUpgradeAck {
            port_id_on_a: dst.port_id.clone(),
            chan_id_on_a: dst.chan_id.clone(),
            counterparty_upgrade: Self::src_upgrade(src)?,
            proof_chan_end_on_b,
            proof_upgrade_on_b,
            proof_height_on_b,
            signer,
        })
    }

    pub fn build_upgrade_confirm(
        dst: &ChainEnd,
        src: &ChainEnd,
        signer: Signer,
    ) -> Result<MsgChannelUpgradeConfirm, RelayerError> {
        let proof_height_on_a = src.ctx.latest_height();
        let (proof_chan_end_on_a, proof_upgrade_on_a) =
            Self::proofs_of_channel_and_upgrade(src, proof_height_on_a)?;

        Ok(MsgChannelUpgradeConfirm {
            port_id_on_b: dst.port_id.clone(),
            chan_id_on_b: dst.chan_id.clone(),
            counterparty_channel_state: *src.channel().state(),
            counterparty_upgrade: Self::src_upgrade(src)?,
            proof_chan_end_on_a,
            proof_upgrade_on_a,
            proof_height_on_a,
            signer,
        })
    }

    pub fn build_upgrade_open(
        dst: &ChainEnd,
        src: &ChainEnd,
        signer: Signer,
    ) -> Result<MsgChannelUpgradeOpen, RelayerError> {
        let chan_end_on_src = src.channel();
        let proof_height = src.ctx.latest_height();
        let proof_counterparty_chan_end = Self::proof(
            src,
            proof_height,
            ChannelEndPath::new(&src.port_id, &src.chan_id).into(),
        )?;

        Ok(MsgChannelUpgradeOpen {
            port_id: dst.port_id.clone(),
            chan_id: dst.chan_id.clone(),
            counterparty_channel_state: *chan_end_on_src.state(),
            counterparty_upgrade_sequence: chan_end_on_src.upgrade_sequence(),
            proof_counterparty_chan_end,
            proof_height,
            signer,
        })
    }

    /// Cancels the attempt on `dst` with the error receipt `src` wrote.
    pub fn build_upgrade_cancel(
        dst: &ChainEnd,
        src: &ChainEnd,
        signer: Signer,
    ) -> Result<MsgChannelUpgradeCancel, RelayerError> {
        let error_receipt = src
            .ctx
            .upgrade_error(&src.port_id, &src.chan_id)
            .ok_or_else(|| RelayerError::NothingToRelay {
                description: format!("no error receipt on {}", src.chan_id),
            })?;

        let proof_height = src.ctx.latest_height();
        let proof_error_receipt = Self::proof(
            src,
            proof_height,
            ChannelUpgradeErrorPath::new(&src.port_id, &src.chan_id).into(),
        )?;

        Ok(MsgChannelUpgradeCancel {
            port_id: dst.port_id.clone(),
            chan_id: dst.chan_id.clone(),
            error_receipt: Some(error_receipt),
            proof_error_receipt: Some(proof_error_receipt),
            proof_height: Some(proof_height),
            signer,
        })
    }

    /// Cancels the attempt on `dst` without any counterparty receipt, as
    /// only the upgrade authority may.
    pub fn build_authority_cancel(dst: &ChainEnd, signer: Signer) -> MsgChannelUpgradeCancel {
        MsgChannelUpgradeCancel {
            port_id: dst.port_id.clone(),
            chan_id: dst.chan_id.clone(),
            error_receipt: None,
            proof_error_receipt: None,
            proof_height: None,
            signer,
        }
    }

    pub fn build_upgrade_timeout(
        dst: &ChainEnd,
        src: &ChainEnd,
        signer: Signer,
    ) -> Result<MsgChannelUpgradeTimeout, RelayerError> {
        let proof_height = src.ctx.latest_height();
        let proof_counterparty_chan_end = Self::proof(
            src,
            proof_height,
            ChannelEndPath::new(&src.port_id, &src.chan_id).into(),
        )?;

        Ok(MsgChannelUpgradeTimeout {
            port_id: dst.port_id.clone(),
            chan_id: dst.chan_id.clone(),
            counterparty_channel: src.channel(),
            proof_counterparty_chan_end,
            proof_height,
            signer,
        })
    }
}
