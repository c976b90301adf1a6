//! This library contains necessary traits to implement an IBC router module
//! that takes part in the channel upgrade handshake.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod module;
pub mod router;

/// Re-exports router data structures from the `ibc-core-router-types` crate
pub mod types {
    #[doc(inline)]
    pub use ibc_core_router_types::*;
}
