//! ICS-24: the host interface of the channel upgrade handshake. A chain
//! integrating the handlers implements [`ValidationContext`] and
//! [`ExecutionContext`] over its store.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

mod context;
pub use context::*;

/// Re-exports ICS-24 data structures from the `ibc-core-host-types` crate
pub mod types {
    #[doc(inline)]
    pub use ibc_core_host_types::*;
}
