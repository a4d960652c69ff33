//! Argument resolver: classified args + stored args → resolved args.

use std::collections::BTreeSet;

use crate::args::classifier::classify;
use crate::args::merge::layered;
use crate::args::registry::ModuleDescriptor;
use crate::args::ArgMap;
use crate::error::ModuleError;

/// Result of resolving one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Fully merged arguments for this invocation.
    pub args: ArgMap,
    /// Snapshot of the stored args the merge started from.
    pub baseline: ArgMap,
}

/// Resolve `raw_args` against a module's declared arguments and its stored args.
///
/// Precedence, lowest first: stored args (which already carry registered
/// defaults), command-line flags, positional values. Nothing in the session is
/// touched here, so a failure leaves the module exactly as it was.
pub fn resolve(
    raw_args: &[String],
    descriptor: &ModuleDescriptor,
    stored_args: &ArgMap,
    vector_names: &BTreeSet<String>,
) -> Result<Resolution, ModuleError> {
    // Stage 1: Split flags from positionals
    let classified = classify(raw_args, descriptor)?;
    let mut positional = classified.positional;
    let declared = descriptor.args_mandatory.len();

    // Stage 2: Arity
    if positional.len() < declared {
        return Err(ModuleError::MissingArguments {
            expected: descriptor.args_mandatory.clone(),
        });
    }
    if declared == 1 && positional.len() > 1 {
        positional = vec![positional.join(" ")];
    } else if declared == 0 {
        if !positional.is_empty() {
            tracing::debug!(module = %descriptor.name, ignored = ?positional, "Ignoring positional arguments");
        }
    } else if positional.len() > declared {
        return Err(ModuleError::UnexpectedArguments {
            extra: positional.split_off(declared),
        });
    }

    // Stage 3: Merge
    let baseline = stored_args.clone();
    let flags: ArgMap = classified.optional.into_iter().collect();
    let mandatory: ArgMap = descriptor
        .args_mandatory
        .iter()
        .cloned()
        .zip(positional)
        .collect();
    let args = layered([&baseline, &flags, &mandatory]);

    // Stage 4: Vector binding
    if let Some(bound) = &descriptor.bind_to_vectors {
        if let Some(value) = args.get(bound) {
            if !value.is_empty() && !vector_names.contains(value) {
                return Err(ModuleError::NotAVector {
                    argument: bound.clone(),
                    value: value.clone(),
                });
            }
        }
    }

    Ok(Resolution { args, baseline })
}
