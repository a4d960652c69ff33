//! Module lifecycle.
//!
//! ```text
//! IDLE ──setup()──▶ RUN   (run on every call, setup never again)
//!   │      └──────▶ FAIL  (inactive for the rest of the session)
//!   └─setup() returns IDLE: run this call, setup again next call
//! ```

use serde_json::Value;

use crate::args::{changed, layered, ArgMap, Resolution};
use crate::error::ModuleError;
use crate::module::{Module, ModuleContext};
use crate::session::Status;

/// What the host should do after the status gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunDecision {
    /// Call `run` with these arguments.
    Execute(ArgMap),
    /// The module failed setup earlier; do not run it.
    Inactive,
}

/// Run `setup` if the module is idle, gate on the resulting status, and fold
/// any stored args changed by `setup` into the resolved arguments.
pub fn advance(
    module: &mut dyn Module,
    ctx: &mut ModuleContext<'_>,
    resolution: Resolution,
) -> RunDecision {
    let Resolution { args, baseline } = resolution;

    if ctx.status() == Status::Idle {
        let status = module.setup(ctx, &args);
        tracing::debug!(module = %ctx.name(), status = ?status, "Module setup finished");
        ctx.set_status(status);
    }

    if ctx.status() == Status::Fail {
        return RunDecision::Inactive;
    }

    let delta = changed(ctx.stored_args(), &baseline);
    if delta.is_empty() {
        return RunDecision::Execute(args);
    }
    tracing::trace!(module = %ctx.name(), keys = ?delta.keys().collect::<Vec<_>>(), "Applying stored args changed by setup");
    RunDecision::Execute(layered([&args, &delta]))
}

/// [`advance`], then `run` when the module is active.
pub fn drive(
    module: &mut dyn Module,
    ctx: &mut ModuleContext<'_>,
    resolution: Resolution,
) -> Result<Option<Value>, ModuleError> {
    match advance(module, ctx, resolution) {
        RunDecision::Execute(args) => Ok(module.run(ctx, &args)),
        RunDecision::Inactive => Err(ModuleError::ModuleInactive {
            module: ctx.name().to_string(),
        }),
    }
}
