//! Defines the trait to be implemented by all concrete consensus state types

use ibc_core_commitment_types::commitment::CommitmentRoot;
use ibc_primitives::Timestamp;

/// A pruned counterparty header: the root that proofs are checked against
/// and the counterparty time it was produced at.
pub trait ConsensusState: Send + Sync {
    /// Commitment root of the consensus state, which is used for key-value pair verification.
    fn root(&self) -> &CommitmentRoot;

    /// The timestamp of the consensus state
    fn timestamp(&self) -> Timestamp;
}
