//! Host block timestamps, as compared against upgrade and packet timeouts.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::ops::Add;
use core::time::Duration;

use displaydoc::Display;
use time::error::ComponentRange;
use time::{OffsetDateTime, PrimitiveDateTime};

/// A point in time with nanosecond precision, between the Unix epoch and the
/// year 9999.
///
/// Serialized (with serde or borsh) as the number of nanoseconds since the
/// Unix epoch, which is also the representation timeouts are committed with.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
#[derive(PartialEq, Eq, Copy, Clone, Debug, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    time: PrimitiveDateTime,
}

impl Timestamp {
    pub fn from_nanoseconds(nanoseconds: u64) -> Result<Self, TimestampError> {
        let odt = OffsetDateTime::from_unix_timestamp_nanos(nanoseconds.into())?;
        Self::from_utc(odt)
    }

    pub fn from_unix_timestamp(secs: u64, nanos: u32) -> Result<Self, TimestampError> {
        if nanos > 999_999_999 {
            return Err(TimestampError::DateOutOfRange);
        }

        let total_nanos = i128::from(secs) * 1_000_000_000 + i128::from(nanos);
        Self::from_utc(OffsetDateTime::from_unix_timestamp_nanos(total_nanos)?)
    }

    /// `t` must have the zero UTC offset.
    fn from_utc(t: OffsetDateTime) -> Result<Self, TimestampError> {
        match t.year() {
            1..=9999 => Ok(Self {
                time: PrimitiveDateTime::new(t.date(), t.time()),
            }),
            _ => Err(TimestampError::DateOutOfRange),
        }
    }

    /// Nanoseconds since the Unix epoch, saturating at `u64::MAX`.
    pub fn nanoseconds(self) -> u64 {
        let nanos = self.time.assume_utc().unix_timestamp_nanos();
        u64::try_from(nanos).unwrap_or(if nanos < 0 { 0 } else { u64::MAX })
    }
}

impl TryFrom<u64> for Timestamp {
    type Error = TimestampError;

    fn try_from(nanoseconds: u64) -> Result<Self, Self::Error> {
        Self::from_nanoseconds(nanoseconds)
    }
}

impl From<Timestamp> for u64 {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.nanoseconds()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "Timestamp({})", self.time)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Result<Self, TimestampError>;

    fn add(self, rhs: Duration) -> Self::Output {
        let duration = rhs.try_into().map_err(|_| TimestampError::DateOutOfRange)?;
        let t = self
            .time
            .checked_add(duration)
            .ok_or(TimestampError::TimestampOverflow)?;
        Self::from_utc(t.assume_utc())
    }
}

#[cfg(feature = "borsh")]
impl borsh::BorshSerialize for Timestamp {
    fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.nanoseconds(), writer)
    }
}

#[cfg(feature = "borsh")]
impl borsh::BorshDeserialize for Timestamp {
    fn deserialize_reader<R: borsh::io::Read>(reader: &mut R) -> borsh::io::Result<Self> {
        let nanoseconds = u64::deserialize_reader(reader)?;
        Self::from_nanoseconds(nanoseconds)
            .map_err(|_| borsh::io::Error::from(borsh::io::ErrorKind::InvalidData))
    }
}

#[derive(Debug, Display, derive_more::From)]
pub enum TimestampError {
    /// date out of range
    DateOutOfRange,
    /// timestamp overflow when adding a duration
    TimestampOverflow,
    /// timestamp conversion error: `{0}`
    Conversion(ComponentRange),
}

#[cfg(feature = "std")]
impl std::error::Error for TimestampError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Conversion(e) => Some(e),
            _ => None,
        }
    }
}
