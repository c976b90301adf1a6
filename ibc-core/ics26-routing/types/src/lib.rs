//! ICS-26 routing data structures: module identifiers and the extras
//! (events and logs) a module hands back from its callbacks.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod event;
pub mod module;
