//! Connection (ICS-03) data structures as needed by the channel layer.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

mod connection;
pub use connection::*;

pub mod error;
pub mod version;
