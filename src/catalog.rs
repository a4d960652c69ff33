//! Module catalog: the set of loaded modules sharing one session.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ModuleError;
use crate::help::{HelpError, HelpRenderer, TeraHelpRenderer};
use crate::host::ModuleHost;
use crate::module::Module;
use crate::session::Session;

pub struct ModuleCatalog {
    session: Arc<Session>,
    hosts: BTreeMap<String, ModuleHost>,
    renderer: Arc<dyn HelpRenderer>,
}

impl ModuleCatalog {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            hosts: BTreeMap::new(),
            renderer: Arc::new(TeraHelpRenderer::new()),
        }
    }

    /// Renderer used for modules loaded after this call.
    pub fn with_renderer(mut self, renderer: Arc<dyn HelpRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Load a module. A module with the same name replaces the old one and
    /// keeps its session record.
    pub fn load(&mut self, module: Box<dyn Module>) -> Result<(), ModuleError> {
        let host = ModuleHost::from_boxed(self.session.clone(), module)?
            .with_renderer(self.renderer.clone());
        self.hosts.insert(host.name().to_string(), host);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&ModuleHost> {
        self.hosts.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ModuleHost> {
        self.hosts.get_mut(name)
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Run `<module> <args...>`.
    pub fn dispatch(&mut self, line: &str) -> Option<Value> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));

        match self.hosts.get_mut(name) {
            Some(host) => host.run_cmdline(rest),
            None => {
                tracing::warn!(module = %name, "Module not found");
                None
            }
        }
    }

    pub fn help(&self, name: &str) -> Option<Result<String, HelpError>> {
        self.hosts.get(name).map(ModuleHost::help)
    }
}
