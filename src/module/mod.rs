//! The module contract.
//!
//! A module declares its arguments and vectors in [`Module::init`], may
//! prepare itself once per session in [`Module::setup`], and does its work in
//! [`Module::run`]. Hosting, argument resolution and status tracking live in
//! [`crate::host::ModuleHost`].

mod context;

use serde_json::Value;

use crate::args::ArgMap;
use crate::error::ModuleError;
use crate::session::Status;

pub use context::{ModuleContext, Registrar};

/// A pluggable command.
pub trait Module: Send {
    /// Unique name, also the key of the module's session record.
    fn name(&self) -> &str;

    /// Built-in documentation, used when no description is registered.
    fn doc(&self) -> &str {
        ""
    }

    /// Register info, arguments and vectors.
    fn init(&mut self, reg: &mut Registrar<'_>) -> Result<(), ModuleError>;

    /// Called while the module is idle. The returned status is stored in the
    /// session; `Fail` deactivates the module for the rest of the session.
    fn setup(&mut self, _ctx: &mut ModuleContext<'_>, _args: &ArgMap) -> Status {
        Status::Run
    }

    fn run(&mut self, ctx: &mut ModuleContext<'_>, args: &ArgMap) -> Option<Value>;
}

/// Descriptive metadata of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleInfo {
    pub description: String,
    pub authors: Vec<String>,
    pub license: Option<String>,
}

impl ModuleInfo {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }
}
