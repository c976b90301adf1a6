use ibc_core::primitives::Signer;

/// Returns a dummy account id, for testing purposes only!
pub fn dummy_account_id() -> Signer {
    Signer::from("0CDA3F47EF3C4906693B170EF650EB968C5F4B2C")
}

/// Returns the signer a mock chain trusts to cancel upgrades, for testing
/// purposes only!
pub fn dummy_upgrade_authority() -> Signer {
    Signer::from("cosmos10d07y265gmmuvt4z0w9aw880jnsr700j6zn9kn")
}
