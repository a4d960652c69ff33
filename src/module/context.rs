use serde_json::Value;

use crate::args::{layered, ArgMap, ArgumentSpec, ModuleDescriptor};
use crate::error::ModuleError;
use crate::module::ModuleInfo;
use crate::session::{ModuleRecord, Session, Status};
use crate::vectors::{Vector, VectorProvider};

/// Registration handle passed to [`super::Module::init`].
pub struct Registrar<'a> {
    doc: String,
    info: Option<ModuleInfo>,
    descriptor: ModuleDescriptor,
    record: &'a mut ModuleRecord,
    vectors: &'a mut dyn VectorProvider,
}

impl<'a> Registrar<'a> {
    pub fn new(
        name: &str,
        doc: &str,
        record: &'a mut ModuleRecord,
        vectors: &'a mut dyn VectorProvider,
    ) -> Self {
        Self {
            doc: doc.trim().to_string(),
            info: None,
            descriptor: ModuleDescriptor::new(name),
            record,
            vectors,
        }
    }

    /// Register module metadata. An empty description falls back to the
    /// module documentation; if both are empty the module is unusable.
    pub fn info(&mut self, mut info: ModuleInfo) -> Result<(), ModuleError> {
        if info.description.trim().is_empty() {
            info.description = self.doc.clone();
        }
        if info.description.is_empty() {
            return Err(ModuleError::MissingDescription {
                module: self.descriptor.name.clone(),
            });
        }
        self.info = Some(info);
        Ok(())
    }

    /// Declare arguments. Registered defaults are written to the session by
    /// [`Registrar::finish`] and never overwrite values already stored there.
    pub fn arguments(&mut self, spec: ArgumentSpec) {
        self.descriptor.apply(spec);
    }

    pub fn vectors(&mut self, items: Vec<Vector>) {
        self.vectors.extend(items);
    }

    /// Finish registration, deriving info from the documentation when the
    /// module registered none, and merge registered defaults under the stored
    /// args. Nothing reaches the session record unless this succeeds.
    pub fn finish(mut self) -> Result<(ModuleDescriptor, ModuleInfo), ModuleError> {
        if self.info.is_none() {
            self.info(ModuleInfo::default())?;
        }
        let info = self.info.take().unwrap_or_default();

        let defaults = self.descriptor.optional_defaults();
        self.record.stored_args = layered([&defaults, &self.record.stored_args]);
        Ok((self.descriptor, info))
    }
}

/// View of the session given to `setup` and `run`.
///
/// The host keeps the module's own record locked while the context lives, so
/// the session itself is not handed out. Lookups under the module's own name
/// are answered from the held record.
pub struct ModuleContext<'a> {
    name: &'a str,
    record: &'a mut ModuleRecord,
    session: &'a Session,
    vectors: &'a dyn VectorProvider,
}

impl<'a> ModuleContext<'a> {
    pub fn new(
        name: &'a str,
        record: &'a mut ModuleRecord,
        session: &'a Session,
        vectors: &'a dyn VectorProvider,
    ) -> Self {
        Self {
            name,
            record,
            session,
            vectors,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn status(&self) -> Status {
        self.record.status
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.record.status = status;
    }

    pub fn stored_args(&self) -> &ArgMap {
        &self.record.stored_args
    }

    /// Persist an argument value for later invocations.
    pub fn store_arg(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.record.stored_args.insert(key.into(), value.into());
    }

    pub fn remove_stored_arg(&mut self, key: &str) -> Option<String> {
        self.record.stored_args.remove(key)
    }

    /// Publish a value other modules can look up.
    pub fn store_result(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.record.results.insert(field.into(), value.into());
    }

    /// Look up a published result of `module`, or a session-level value when
    /// no module is named.
    pub fn stored_result(&self, field: &str, module: Option<&str>) -> Option<Value> {
        match module {
            Some(module) if module == self.name => self.record.results.get(field).cloned(),
            Some(module) => self.session.result(module, field),
            None => self.session.global(field),
        }
    }

    /// Publish a session-level value not owned by any module.
    pub fn set_global(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.session.set_global(key, value);
    }

    pub fn session_id(&self) -> &str {
        self.session.id()
    }

    pub fn vectors(&self) -> &dyn VectorProvider {
        self.vectors
    }
}
