//! Argument registry: what a module declares it accepts.

use std::collections::BTreeMap;

use crate::args::ArgMap;

/// Declared arguments of a module.
///
/// Mandatory arguments are positional and consumed in declaration order.
/// Every optional argument is a long flag taking one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Unique module name, also the key of its session record.
    pub name: String,
    /// Positional argument names, order significant.
    pub args_mandatory: Vec<String>,
    /// Flag names with their registered default, if any.
    pub args_optional: BTreeMap<String, Option<String>>,
    /// Argument whose value must name a registered vector.
    pub bind_to_vectors: Option<String>,
}

impl ModuleDescriptor {
    /// Create a descriptor with no declared arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declared flag names.
    pub fn optional_names(&self) -> impl Iterator<Item = &str> {
        self.args_optional.keys().map(String::as_str)
    }

    /// Registered defaults that carry a value.
    pub fn optional_defaults(&self) -> ArgMap {
        self.args_optional
            .iter()
            .filter_map(|(name, default)| default.clone().map(|value| (name.clone(), value)))
            .collect()
    }

    /// Replace the declared arguments with the ones in `spec`.
    pub fn apply(&mut self, spec: ArgumentSpec) {
        self.args_mandatory = spec.mandatory;
        self.args_optional = spec.optional;
        self.bind_to_vectors = spec.bind_to_vectors;
    }
}

/// Builder for the arguments a module registers during `init`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentSpec {
    mandatory: Vec<String>,
    optional: BTreeMap<String, Option<String>>,
    bind_to_vectors: Option<String>,
}

impl ArgumentSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn mandatory(mut self, name: impl Into<String>) -> Self {
        self.mandatory.push(name.into());
        self
    }

    /// Declare a flag with a default value.
    pub fn optional(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.optional.insert(name.into(), Some(default.into()));
        self
    }

    /// Declare a flag without a default.
    pub fn optional_unset(mut self, name: impl Into<String>) -> Self {
        self.optional.insert(name.into(), None);
        self
    }

    /// Require the named argument to reference a vector. An empty name
    /// clears the binding.
    pub fn bind_to_vectors(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.bind_to_vectors = (!name.is_empty()).then_some(name);
        self
    }
}
