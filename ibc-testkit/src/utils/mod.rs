use ibc_core::primitives::Timestamp;

/// Returns a `Timestamp` representation of beginning of year 2023.
///
/// Mock chains start their history at this time by default, so that two
/// chains built with the same configuration keep comparable clocks.
pub fn year_2023() -> Timestamp {
    // Sun Jan 01 2023 00:00:00 GMT+0000
    Timestamp::from_unix_timestamp(1_672_531_200, 0).expect("should be a valid time")
}
