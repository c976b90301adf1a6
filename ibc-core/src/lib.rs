//! Re-exports data structures and implementations of the IBC core modules
//! taking part in the channel upgrade handshake.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

/// Re-exports IBC handler entrypoints from the `ibc-core-handler` crate for
/// added convenience.
pub mod entrypoint {
    #[doc(inline)]
    pub use ibc_core_handler::entrypoint::*;
}

/// Re-exports IBC primitive types from the `ibc-primitives` crate
pub mod primitives {
    #[doc(inline)]
    pub use ibc_primitives::*;
}

/// Re-exports the ICS-02 light client interface from the
/// `ibc-core-client-context` crate
pub mod client {
    #[doc(inline)]
    pub use ibc_core_client_context::*;
}

/// Re-exports ICS-03 data structures from the `ibc-core-connection-types` crate
pub mod connection_types {
    #[doc(inline)]
    pub use ibc_core_connection_types::*;
}

/// Re-exports ICS-04 implementation from the `ibc-core-channel` crate
pub mod channel {
    #[doc(inline)]
    pub use ibc_core_channel::*;
}

/// Re-exports ICS-23 data structures from the `ibc-core-commitment-types` crate
pub mod commitment_types {
    #[doc(inline)]
    pub use ibc_core_commitment_types::*;
}

/// Re-exports ICS-24 implementation from the `ibc-core-host` crate
pub mod host {
    #[doc(inline)]
    pub use ibc_core_host::*;
}

/// Re-exports ICS-25 implementation from the `ibc-core-handler` crate
pub mod handler {
    #[doc(inline)]
    pub use ibc_core_handler::*;
}

/// Re-exports ICS-26 implementation from the `ibc-core-router` crate
pub mod router {
    #[doc(inline)]
    pub use ibc_core_router::*;
}
