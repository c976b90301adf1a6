//! Contains primitives types and traits common to the channel upgrade crates.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod prelude;

mod types;
pub use types::*;

/// Re-exports the `Protobuf` trait from the `ibc-proto-rs` crate.
pub mod proto {
    pub use ibc_proto::Protobuf;
}
