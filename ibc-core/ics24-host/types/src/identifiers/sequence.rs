use ibc_primitives::prelude::*;

use crate::error::IdentifierError;

/// The sequence number of a packet enforces ordering among packets from the
/// same source, and doubles as the flush watermark of an upgrade.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence(u64);

impl core::str::FromStr for Sequence {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.parse::<u64>().map_err(|e| {
            IdentifierError::InvalidStringAsSequence {
                value: s.to_string(),
                reason: e.to_string(),
            }
        })?))
    }
}

impl Sequence {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The sequence right after this one. Fails at `u64::MAX` instead of
    /// handing out the same sequence twice.
    pub fn increment(&self) -> Result<Sequence, IdentifierError> {
        self.0
            .checked_add(1)
            .map(Sequence)
            .ok_or(IdentifierError::SequenceOverflow { sequence: self.0 })
    }

    /// The sequence right before this one, saturating at zero.
    pub fn decrement(&self) -> Sequence {
        Sequence(self.0.saturating_sub(1))
    }

    /// Encodes the sequence number into a byte array in big endian.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_be_bytes().to_vec()
    }
}

impl From<u64> for Sequence {
    fn from(seq: u64) -> Self {
        Sequence(seq)
    }
}

impl From<Sequence> for u64 {
    fn from(s: Sequence) -> u64 {
        s.0
    }
}

impl core::fmt::Display for Sequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{}", self.0)
    }
}
