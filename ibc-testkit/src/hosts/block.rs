//! Blocks of the mock chain and the provable state each of them commits to.

use alloc::collections::BTreeMap;

use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use ibc_core::host::types::path::Path;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Timestamp;
use sha2::{Digest, Sha256};

/// Returns the key under which `path` is committed by a chain using `prefix`.
pub fn commitment_key(prefix: &CommitmentPrefix, path: &Path) -> String {
    format!("{}/{path}", String::from_utf8_lossy(prefix.as_bytes()))
}

/// The provable key-value state of a chain as of some block.
///
/// Its encoding is both the membership and the non-membership proof of any
/// key, and the commitment root is the SHA-256 digest of that encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommittedState(BTreeMap<String, Vec<u8>>);

impl CommittedState {
    pub fn new(entries: BTreeMap<String, Vec<u8>>) -> Self {
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&Vec<u8>> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entry count, then each key and value, all length-prefixed with a
    /// big-endian `u64`.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(self.0.len() as u64).to_be_bytes());
        for (key, value) in &self.0 {
            bytes.extend_from_slice(&(key.len() as u64).to_be_bytes());
            bytes.extend_from_slice(key.as_bytes());
            bytes.extend_from_slice(&(value.len() as u64).to_be_bytes());
            bytes.extend_from_slice(value);
        }
        bytes
    }

    pub fn decode(mut bytes: &[u8]) -> Option<Self> {
        let count = take_len(&mut bytes)?;
        let mut entries = BTreeMap::new();
        for _ in 0..count {
            let key_len = take_len(&mut bytes)?;
            let key = String::from_utf8(take(&mut bytes, key_len)?.to_vec()).ok()?;
            let value_len = take_len(&mut bytes)?;
            let value = take(&mut bytes, value_len)?.to_vec();
            entries.insert(key, value);
        }
        bytes.is_empty().then_some(Self(entries))
    }

    pub fn root(&self) -> CommitmentRoot {
        CommitmentRoot::from_bytes(&Sha256::digest(self.encode()))
    }

    pub fn proof(&self) -> CommitmentProofBytes {
        // never empty: the entry count is always encoded
        self.encode()
            .try_into()
            .expect("encoded state is never empty")
    }
}

fn take<'a>(bytes: &mut &'a [u8], n: usize) -> Option<&'a [u8]> {
    if bytes.len() < n {
        return None;
    }
    let (head, tail) = bytes.split_at(n);
    *bytes = tail;
    Some(head)
}

fn take_len(bytes: &mut &[u8]) -> Option<usize> {
    let raw: [u8; 8] = take(bytes, 8)?.try_into().ok()?;
    usize::try_from(u64::from_be_bytes(raw)).ok()
}

/// A block of the mock chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockBlock {
    pub height: Height,
    pub timestamp: Timestamp,
    pub state: CommittedState,
}

impl MockBlock {
    pub fn root(&self) -> CommitmentRoot {
        self.state.root()
    }
}
