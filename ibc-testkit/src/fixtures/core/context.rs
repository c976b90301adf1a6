use alloc::sync::Arc;
use core::time::Duration;

use ibc_core::client::types::Height;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::{Signer, Timestamp};
use parking_lot::Mutex;
use typed_builder::TypedBuilder;

use crate::fixtures::core::signer::dummy_upgrade_authority;
use crate::hosts::MockHost;
use crate::testapp::ibc::core::types::{MockContext, MockIbcStore, DEFAULT_BLOCK_TIME_SECS};
use crate::utils::year_2023;

/// Configuration of the `MockContext` type for generating dummy contexts.
#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = MockContext))]
pub struct MockContextConfig {
    #[builder(default = String::from("mockgaia-0"), setter(into))]
    chain_id: String,

    #[builder(default = Duration::from_secs(DEFAULT_BLOCK_TIME_SECS))]
    block_time: Duration,

    /// Time of the first block.
    #[builder(default = year_2023())]
    genesis_timestamp: Timestamp,

    /// Height of the latest block once the context is built.
    #[builder(default = 5)]
    latest_height: u64,

    #[builder(default = dummy_upgrade_authority())]
    upgrade_authority: Signer,
}

impl From<MockContextConfig> for MockContext {
    fn from(params: MockContextConfig) -> Self {
        assert_ne!(
            params.latest_height, 0,
            "The chain must have a non-zero revision_height"
        );

        let host = MockHost::builder()
            .chain_id(params.chain_id)
            .block_time(params.block_time)
            .genesis_timestamp(params.genesis_timestamp)
            .build();

        let mut ctx = MockContext {
            host,
            upgrade_authority: params.upgrade_authority,
            ibc_store: Arc::new(Mutex::new(MockIbcStore::default())),
        };

        // genesis block at height 1
        ctx.advance_block();

        ctx.advance_block_up_to(Height::new(0, params.latest_height).expect("Never fails"))
    }
}
