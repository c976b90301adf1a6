//! Data structures of the channel upgrade handshake: the channel end being
//! upgraded, the upgrade proposal and its timeout, error receipts, the
//! handshake messages and the events they emit.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod channel;
pub mod commitment;
pub mod error;
pub mod events;
pub mod msgs;
pub mod timeout;
pub mod upgrade;

mod version;
pub use version::Version;

/// Re-exports ICS-04 proto types from the `ibc-proto` crate
pub mod proto {
    pub use ibc_proto::ibc::core::channel::*;
}
