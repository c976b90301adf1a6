pub mod chan_upgrade_ack;
pub mod chan_upgrade_cancel;
pub mod chan_upgrade_confirm;
pub mod chan_upgrade_init;
pub mod chan_upgrade_timeout;
pub mod chan_upgrade_try;
pub mod flush;
pub mod handshake;
pub mod query;

use ibc_core::channel::types::error::ChannelError;
use ibc_core::channel::types::upgrade::{UpgradeOutcome, UpgradeTimeout};
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_testkit::relayer::error::RelayerError;
use ibc_testkit::testapp::ibc::core::types::MockContext;

/// A timeout at the height `blocks` blocks after the latest block of `ctx`.
pub fn timeout_in_blocks(ctx: &MockContext, blocks: u64) -> UpgradeTimeout {
    UpgradeTimeout::at_height(ctx.latest_height().add(blocks))
}

/// Produces blocks on `ctx` until `timeout` has elapsed on its clock.
pub fn advance_until_elapsed(ctx: &mut MockContext, timeout: &UpgradeTimeout) {
    while !timeout.has_elapsed(&ctx.latest_height(), &ctx.latest_timestamp()) {
        ctx.advance_block();
    }
}

/// The channel error a rejected message failed with.
pub fn channel_error(res: Result<UpgradeOutcome, RelayerError>) -> ChannelError {
    match res {
        Err(RelayerError::TransactionFailed(ContextError::ChannelError(e))) => e,
        other => panic!("expected a channel error, got {other:?}"),
    }
}

/// The ABCI code of the error an upgrade step was aborted with.
pub fn aborted_code(outcome: &UpgradeOutcome) -> u32 {
    outcome
        .aborted()
        .expect("upgrade step was aborted")
        .error()
        .abci_code()
}

pub fn count_events(ctx: &MockContext, pred: impl Fn(&IbcEvent) -> bool) -> usize {
    ctx.get_events().iter().filter(|e| pred(e)).count()
}
