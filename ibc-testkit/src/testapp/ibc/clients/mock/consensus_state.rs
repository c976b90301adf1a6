use ibc_core::client::consensus_state::ConsensusState;
use ibc_core::commitment_types::commitment::CommitmentRoot;
use ibc_core::primitives::Timestamp;

use crate::hosts::MockBlock;

/// The view a mock light client keeps of one counterparty block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockConsensusState {
    pub root: CommitmentRoot,
    pub timestamp: Timestamp,
}

impl MockConsensusState {
    pub fn new(root: CommitmentRoot, timestamp: Timestamp) -> Self {
        Self { root, timestamp }
    }
}

impl From<&MockBlock> for MockConsensusState {
    fn from(block: &MockBlock) -> Self {
        Self::new(block.root(), block.timestamp)
    }
}

impl ConsensusState for MockConsensusState {
    fn root(&self) -> &CommitmentRoot {
        &self.root
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
