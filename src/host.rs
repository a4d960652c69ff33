//! Module host: the public face of a loaded module.
//!
//! Owns the module behavior, its declared arguments and vectors, and a handle
//! to its session record. User-input errors stop here: they are logged, help
//! is rendered where useful, and the call returns nothing.

use std::sync::Arc;

use serde_json::Value;

use crate::args::{resolve, ModuleDescriptor};
use crate::error::ModuleError;
use crate::help::{HelpContext, HelpError, HelpRenderer, TeraHelpRenderer};
use crate::lexer::{ShellLexer, ShellWords};
use crate::lifecycle;
use crate::module::{Module, ModuleContext, ModuleInfo, Registrar};
use crate::session::{Session, SharedRecord, Status};
use crate::vectors::{VectorList, VectorProvider};

pub struct ModuleHost {
    module: Box<dyn Module>,
    descriptor: ModuleDescriptor,
    info: ModuleInfo,
    vectors: Box<dyn VectorProvider>,
    session: Arc<Session>,
    record: SharedRecord,
    lexer: Arc<dyn ShellLexer>,
    renderer: Arc<dyn HelpRenderer>,
}

impl ModuleHost {
    /// Load `module` into `session`.
    ///
    /// # Errors
    /// Returns `MissingDescription` if the module has no description, or any
    /// error its `init` reports. The module is not usable in either case.
    pub fn new(session: Arc<Session>, module: impl Module + 'static) -> Result<Self, ModuleError> {
        Self::from_boxed(session, Box::new(module))
    }

    pub fn from_boxed(session: Arc<Session>, module: Box<dyn Module>) -> Result<Self, ModuleError> {
        Self::with_vectors(session, module, Box::new(VectorList::new()))
    }

    /// Load `module` with a custom vector provider.
    pub fn with_vectors(
        session: Arc<Session>,
        mut module: Box<dyn Module>,
        mut vectors: Box<dyn VectorProvider>,
    ) -> Result<Self, ModuleError> {
        let name = module.name().to_string();
        let doc = module.doc().to_string();
        let record = session.ensure(&name);

        let (descriptor, info) = {
            let mut guard = record.lock();
            let mut reg = Registrar::new(&name, &doc, &mut *guard, vectors.as_mut());
            module.init(&mut reg)?;
            reg.finish()?
        };

        tracing::debug!(
            module = %name,
            mandatory = ?descriptor.args_mandatory,
            vectors = vectors.names().len(),
            "Module loaded"
        );

        Ok(Self {
            module,
            descriptor,
            info,
            vectors,
            session,
            record,
            lexer: Arc::new(ShellWords),
            renderer: Arc::new(TeraHelpRenderer::new()),
        })
    }

    pub fn with_lexer(mut self, lexer: Arc<dyn ShellLexer>) -> Self {
        self.lexer = lexer;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn HelpRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    pub fn vectors(&self) -> &dyn VectorProvider {
        self.vectors.as_ref()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn status(&self) -> Status {
        self.record.lock().status
    }

    /// Split `line` into words and run the module.
    ///
    /// Tokenization failures are logged and yield `None`. Non-empty results
    /// are logged before being returned.
    pub fn run_cmdline(&mut self, line: &str) -> Option<Value> {
        let argv = match self.lexer.tokenize(line) {
            Ok(argv) => argv,
            Err(e) => {
                let err = ModuleError::Lexing { reason: e.reason };
                tracing::warn!(module = %self.name(), "{}", err);
                return None;
            }
        };

        let result = self.run_argv(&argv);
        if let Some(value) = result.as_ref().filter(|v| !is_blank(v)) {
            tracing::info!(module = %self.name(), "{}", stringify(value));
        }
        result
    }

    /// Run the module, reporting failures through the log.
    pub fn run_argv(&mut self, argv: &[String]) -> Option<Value> {
        match self.try_run_argv(argv) {
            Ok(result) => result,
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    /// Resolve `argv`, advance the lifecycle and run the module.
    ///
    /// The module's record stays locked for the whole call.
    pub fn try_run_argv(&mut self, argv: &[String]) -> Result<Option<Value>, ModuleError> {
        let mut record = self.record.lock();
        let resolution = resolve(
            argv,
            &self.descriptor,
            &record.stored_args,
            &self.vectors.names(),
        )?;

        let mut ctx = ModuleContext::new(
            &self.descriptor.name,
            &mut record,
            &self.session,
            self.vectors.as_ref(),
        );
        lifecycle::drive(self.module.as_mut(), &mut ctx, resolution)
    }

    /// Render help for this module with its current stored args.
    pub fn help(&self) -> Result<String, HelpError> {
        let stored = self.record.lock().stored_args.clone();
        let context = HelpContext::new(
            &self.descriptor,
            &self.info.description,
            &stored,
            &self.vectors.names(),
        );
        self.renderer.render(&context)
    }

    fn report(&self, err: &ModuleError) {
        if !err.shows_help() {
            tracing::warn!(module = %self.name(), "{}", err);
            return;
        }

        tracing::info!(module = %self.name(), "{}", err);
        match self.help() {
            Ok(text) => tracing::info!(module = %self.name(), "{}", text),
            Err(e) => tracing::error!(module = %self.name(), error = %e, "Failed to render help"),
        }
    }
}

/// Text form of a module result: strings verbatim, everything else as JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::Null) || matches!(value, Value::String(s) if s.is_empty())
}
