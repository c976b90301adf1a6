//! This crate is the seam between a host's store and the light clients it
//! runs. Channel upgrade handlers only ever talk to a light client through
//! the traits defined here.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod client_state;
pub mod consensus_state;

mod context;
pub use context::*;

/// Trait preludes for the ICS-02 client implementation.
pub mod prelude {
    pub use crate::client_state::*;
    pub use crate::consensus_state::*;
    pub use crate::context::*;
}

pub mod types {
    #[doc(inline)]
    pub use ibc_core_client_types::*;
}
