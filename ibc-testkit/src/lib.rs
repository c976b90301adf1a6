//! Test tooling for the channel upgrade handshake: a mock chain whose
//! committed state can be proven, a light client that checks those proofs,
//! a configurable application and a relayer that drives two chains through
//! the handshake.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod fixtures;
pub mod hosts;
pub mod relayer;
pub mod testapp;
pub mod utils;
