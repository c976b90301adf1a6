//! ICS-04: Channel upgrade handshake. Implements the handlers that renegotiate
//! the ordering, connection hops and version of an open channel, the
//! coordination of packets in flight while it upgrades, and the queries a
//! relayer needs to drive the handshake.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

#[cfg(feature = "std")]
extern crate std;

pub mod flush;
pub mod handler;
pub mod query;

/// Re-exports ICS-04 data structures from the `ibc-core-channel-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_core_channel_types::*;
}
