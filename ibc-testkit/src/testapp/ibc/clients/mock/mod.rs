pub mod client_state;
pub mod consensus_state;
