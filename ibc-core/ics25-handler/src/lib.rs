//! Exposes the entry points of the channel upgrade handshake. These entry
//! points route an incoming upgrade datagram to the application bound to its
//! port, then validate and execute it with the matching handler.
//!
//! When processing a given message `M`, if any method in this library returns
//! an error, the runtime is expected to rollback all state modifications made
//! to the context (e.g. [`ExecutionContext`](ibc_core_host::ExecutionContext))
//! while processing `M`. An aborted upgrade step is not an error: it returns
//! `Ok` and its state modifications are kept.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod entrypoint;

/// Re-export IBC handler types from `ibc-core-handler-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_core_handler_types::*;
}
