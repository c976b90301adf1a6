use ibc_primitives::prelude::*;

use crate::error::IdentifierError as Error;
use crate::identifiers::{ChannelId, ConnectionId};

const VALID_SPECIAL_CHARS: &str = "._+-#[]<>";

/// Checks that the identifier only contains alphanumerics or one of
/// `.`, `_`, `+`, `-`, `#`, `[`, `]`, `<`, `>`.
pub fn validate_identifier_chars(id: &str) -> Result<(), Error> {
    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || VALID_SPECIAL_CHARS.contains(c))
    {
        return Err(Error::InvalidCharacter { id: id.into() });
    }

    Ok(())
}

/// Checks that the identifier length lies within `[min, max]`. Empty
/// identifiers are always rejected.
pub fn validate_identifier_length(id: &str, min: u64, max: u64) -> Result<(), Error> {
    let min = min.max(1);
    let length = id.len() as u64;
    if (min..=max).contains(&length) {
        Ok(())
    } else {
        Err(Error::InvalidLength {
            id: id.into(),
            min,
            max,
        })
    }
}

/// Checks if the identifier is a valid named u64 index: `{name}-{u64}`,
/// without leading zeros.
pub fn validate_named_u64_index(id: &str, name: &str) -> Result<(), Error> {
    let number_s = id
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(|| Error::InvalidPrefix { prefix: id.into() })?;

    if number_s.starts_with('0') && number_s.len() > 1 {
        return Err(Error::InvalidPrefix { prefix: id.into() });
    }

    number_s
        .parse::<u64>()
        .map_err(|_| Error::InvalidPrefix { prefix: id.into() })?;

    Ok(())
}

/// Client identifiers are 9 to 64 characters long.
pub fn validate_client_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 9, 64)
}

/// Connection identifiers are 10 to 64 characters long and indexed.
pub fn validate_connection_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 10, 64)?;
    validate_named_u64_index(id, ConnectionId::prefix())
}

/// Port identifiers are 2 to 128 characters long.
pub fn validate_port_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 2, 128)
}

/// Channel identifiers are 8 to 64 characters long and indexed.
pub fn validate_channel_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 8, 64)?;
    validate_named_u64_index(id, ChannelId::prefix())
}
