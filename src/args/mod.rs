//! Argument handling pipeline for modules.
//!
//! ```text
//! argv → Classify → Arity → Merge (stored ← flags ← positionals) → Vector check → Resolution
//! ```
//!
//! Each stage is a pure function over the module descriptor and a snapshot of
//! its stored args, so a failing invocation never mutates the session.

mod classifier;
mod merge;
mod registry;
mod resolver;

use std::collections::BTreeMap;

pub use classifier::{classify, ClassifyResult};
pub use merge::{changed, layered};
pub use registry::{ArgumentSpec, ModuleDescriptor};
pub use resolver::{resolve, Resolution};

/// Argument name → value.
pub type ArgMap = BTreeMap<String, String>;
