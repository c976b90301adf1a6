pub mod channel;
pub mod connection;
pub mod context;
pub mod signer;
