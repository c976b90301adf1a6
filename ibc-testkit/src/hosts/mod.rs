//! The chain underlying a mock context: its identity, its clock and the
//! history of blocks it produced.

use core::ops::Add;
use core::time::Duration;

use ibc_core::client::types::Height;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Timestamp;
use tracing::debug;
use typed_builder::TypedBuilder;

mod block;

pub use block::*;

use crate::testapp::ibc::core::types::DEFAULT_BLOCK_TIME_SECS;
use crate::utils::year_2023;

#[derive(Clone, Debug, TypedBuilder)]
pub struct MockHost {
    /// Unique identifier for the chain.
    #[builder(default = String::from("mockgaia-0"))]
    pub chain_id: String,
    #[builder(default = Duration::from_secs(DEFAULT_BLOCK_TIME_SECS))]
    pub block_time: Duration,
    /// Time of the block at height 1.
    #[builder(default = year_2023())]
    pub genesis_timestamp: Timestamp,
    /// The chain of blocks underlying this host.
    #[builder(default)]
    pub history: Vec<MockBlock>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MockHost {
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn latest_block(&self) -> Option<&MockBlock> {
        self.history.last()
    }

    pub fn get_block(&self, target_height: &Height) -> Option<&MockBlock> {
        self.history.iter().rev().find(|b| b.height == *target_height)
    }

    /// Height of the latest block; a host without blocks reports the first
    /// height it will produce.
    pub fn latest_height(&self) -> Height {
        self.latest_block()
            .map(|b| b.height)
            .unwrap_or_else(|| Height::min(0))
    }

    pub fn latest_timestamp(&self) -> Timestamp {
        self.latest_block()
            .map(|b| b.timestamp)
            .unwrap_or(self.genesis_timestamp)
    }

    /// Produces the next block, committing `state`.
    pub fn advance_block(&mut self, state: CommittedState) -> &MockBlock {
        let (height, timestamp) = match self.latest_block() {
            None => (Height::min(0), self.genesis_timestamp),
            Some(latest) => (
                latest.height.increment(),
                latest
                    .timestamp
                    .add(self.block_time)
                    .expect("Never fails"),
            ),
        };

        debug!(
            chain_id = %self.chain_id,
            %height,
            entries = state.len(),
            "producing block"
        );

        self.history.push(MockBlock {
            height,
            timestamp,
            state,
        });

        self.history.last().expect("block was just pushed")
    }
}
