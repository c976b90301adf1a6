use ibc_core_channel::handler::{
    chan_upgrade_ack_execute, chan_upgrade_ack_validate, chan_upgrade_cancel_execute,
    chan_upgrade_cancel_validate, chan_upgrade_confirm_execute, chan_upgrade_confirm_validate,
    chan_upgrade_init_execute, chan_upgrade_init_validate, chan_upgrade_open_execute,
    chan_upgrade_open_validate, chan_upgrade_timeout_execute, chan_upgrade_timeout_validate,
    chan_upgrade_try_execute, chan_upgrade_try_validate,
};
use ibc_core_channel::types::msgs::ChannelUpgradeMsg;
use ibc_core_channel::types::upgrade::UpgradeOutcome;
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::msgs::MsgEnvelope;
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_core_router::router::Router;
use ibc_core_router::types::error::RouterError;

/// Entrypoint which performs both validation and message execution
///
/// An upgrade step aborted during execution is reported as
/// [`UpgradeOutcome::Aborted`]. Its state changes must be committed like
/// those of a successful step, since the error receipt they contain is what
/// lets the counterparty abort too.
pub fn dispatch<Ctx>(
    ctx: &mut Ctx,
    router: &mut impl Router,
    msg: MsgEnvelope,
) -> Result<UpgradeOutcome, ContextError>
where
    Ctx: ExecutionContext,
{
    validate(ctx, router, msg.clone())?;
    execute(ctx, router, msg)
}

/// Entrypoint which only performs message validation
///
/// If a transaction contains `n` messages `m_1` ... `m_n`, then
/// they MUST be processed as follows:
///     validate(m_1), execute(m_1), ..., validate(m_n), execute(m_n)
/// That is, the state transition of message `i` must be applied before
/// message `i+1` is validated. This is equivalent to calling
/// `dispatch()` on each successively.
pub fn validate<Ctx>(ctx: &Ctx, router: &impl Router, msg: MsgEnvelope) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    match msg {
        MsgEnvelope::ChannelUpgrade(msg) => {
            let module_id = router.module_id_for(msg.port_id())?;
            let module = router
                .get_route(&module_id)
                .ok_or(RouterError::ModuleNotFound)?;

            match msg {
                ChannelUpgradeMsg::Init(msg) => chan_upgrade_init_validate(ctx, module, msg),
                ChannelUpgradeMsg::Try(msg) => chan_upgrade_try_validate(ctx, module, msg),
                ChannelUpgradeMsg::Ack(msg) => chan_upgrade_ack_validate(ctx, module, msg),
                ChannelUpgradeMsg::Confirm(msg) => {
                    chan_upgrade_confirm_validate(ctx, module, msg)
                }
                ChannelUpgradeMsg::Open(msg) => chan_upgrade_open_validate(ctx, module, msg),
                ChannelUpgradeMsg::Cancel(msg) => chan_upgrade_cancel_validate(ctx, module, msg),
                ChannelUpgradeMsg::Timeout(msg) => {
                    chan_upgrade_timeout_validate(ctx, module, msg)
                }
            }
        }
    }
}

/// Entrypoint which only performs message execution
pub fn execute<Ctx>(
    ctx: &mut Ctx,
    router: &mut impl Router,
    msg: MsgEnvelope,
) -> Result<UpgradeOutcome, ContextError>
where
    Ctx: ExecutionContext,
{
    match msg {
        MsgEnvelope::ChannelUpgrade(msg) => {
            let module_id = router.module_id_for(msg.port_id())?;
            let module = router
                .get_route_mut(&module_id)
                .ok_or(RouterError::ModuleNotFound)?;

            match msg {
                ChannelUpgradeMsg::Init(msg) => {
                    chan_upgrade_init_execute(ctx, module, msg).map(|_| UpgradeOutcome::Success)
                }
                ChannelUpgradeMsg::Try(msg) => chan_upgrade_try_execute(ctx, module, msg),
                ChannelUpgradeMsg::Ack(msg) => chan_upgrade_ack_execute(ctx, module, msg),
                ChannelUpgradeMsg::Confirm(msg) => chan_upgrade_confirm_execute(ctx, module, msg),
                ChannelUpgradeMsg::Open(msg) => {
                    chan_upgrade_open_execute(ctx, module, msg).map(|_| UpgradeOutcome::Success)
                }
                ChannelUpgradeMsg::Cancel(msg) => {
                    chan_upgrade_cancel_execute(ctx, module, msg).map(|_| UpgradeOutcome::Success)
                }
                ChannelUpgradeMsg::Timeout(msg) => {
                    chan_upgrade_timeout_execute(ctx, module, msg).map(|_| UpgradeOutcome::Success)
                }
            }
        }
    }
}
