//! ICS-25 handler data structures: the top-level handler error, the events a
//! handler emits and the envelope routing upgrade messages to their handlers.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod events;
pub mod msgs;
