//! Defines the commitment error type

use displaydoc::Display;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum CommitmentError {
    /// empty commitment prefix
    EmptyCommitmentPrefix,
    /// empty commitment proof
    EmptyCommitmentProof,
    /// empty commitment root
    EmptyCommitmentRoot,
    /// proof verification failed
    VerificationFailure,
}

#[cfg(feature = "std")]
impl std::error::Error for CommitmentError {}
