//! Layered merge: later layers overwrite earlier ones key by key.
//!
//! Used for registration defaults under stored values, for command-line
//! arguments over stored values, and for post-setup reconciliation.

use crate::args::ArgMap;

/// Merge `layers` in order of increasing precedence.
pub fn layered<'a, I>(layers: I) -> ArgMap
where
    I: IntoIterator<Item = &'a ArgMap>,
{
    let mut merged = ArgMap::new();
    for layer in layers {
        merged.extend(layer.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
    merged
}

/// Entries of `current` that are new or differ from `baseline`.
///
/// Keys removed from `current` are not reported.
pub fn changed(current: &ArgMap, baseline: &ArgMap) -> ArgMap {
    current
        .iter()
        .filter(|(key, value)| baseline.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
