//! ICS-23: Commitment types that let one chain verify state committed to by
//! another.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod commitment;
pub mod error;

#[cfg(feature = "serde")]
pub mod serializer;
