//! Argument classifier: raw args → flag pairs and positional tokens.
//!
//! Flags are scanned from the front only. The first token that does not look
//! like a flag, or an explicit `--`, ends the scan and every remaining token
//! is positional, dashes included.

use crate::args::registry::ModuleDescriptor;
use crate::error::ModuleError;

/// Result of classifying raw arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifyResult {
    /// Flag pairs in command-line order, names normalized to the declared form.
    pub optional: Vec<(String, String)>,
    /// Positional tokens in order.
    pub positional: Vec<String>,
}

/// Classify raw args against the module's declared flags.
pub fn classify(raw_args: &[String], registry: &ModuleDescriptor) -> Result<ClassifyResult, ModuleError> {
    let mut optional = Vec::new();
    let mut idx = 0;

    while let Some(arg) = raw_args.get(idx) {
        if arg == "--" {
            idx += 1;
            break;
        }
        if !arg.starts_with('-') || arg == "-" {
            break;
        }

        let Some(long) = arg.strip_prefix("--") else {
            let short: String = arg.chars().skip(1).take(1).collect();
            return Err(invalid(format!("option -{} not recognized", short)));
        };

        let (opt, inline_value) = match long.split_once('=') {
            Some((opt, value)) => (opt, Some(value.to_string())),
            None => (long, None),
        };
        let name = match_long(opt, registry)?;
        idx += 1;

        let value = match inline_value {
            Some(value) => value,
            None => {
                let value = raw_args
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| invalid(format!("option --{} requires argument", name)))?;
                idx += 1;
                value
            }
        };
        optional.push((name, value));
    }

    Ok(ClassifyResult {
        optional,
        positional: raw_args[idx..].to_vec(),
    })
}

/// Resolve a flag name, accepting any unique prefix of a declared name.
fn match_long(opt: &str, registry: &ModuleDescriptor) -> Result<String, ModuleError> {
    let candidates: Vec<&str> = registry
        .optional_names()
        .filter(|name| name.starts_with(opt))
        .collect();

    if candidates.contains(&opt) {
        return Ok(opt.to_string());
    }

    match candidates.as_slice() {
        [] => Err(invalid(format!("option --{} not recognized", opt))),
        [unique] => Ok((*unique).to_string()),
        _ => Err(invalid(format!("option --{} not a unique prefix", opt))),
    }
}

fn invalid(diagnostic: String) -> ModuleError {
    ModuleError::InvalidOptions { diagnostic }
}
