//! Shared test utilities and a scriptable probe module.

#![allow(dead_code)]

use modshell::args::{ArgMap, ArgumentSpec};
use modshell::vectors::Vector;
use modshell::{Module, ModuleContext, ModuleError, ModuleHost, ModuleInfo, Registrar, Session, Status};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const PROBE: &str = "probe";

/// Call counters shared between a probe and the test that built it.
#[derive(Debug, Default)]
pub struct Calls {
    setups: AtomicUsize,
    runs: AtomicUsize,
    last_args: Mutex<Option<ArgMap>>,
}

impl Calls {
    pub fn setups(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Arguments of the most recent `run`.
    pub fn last_args(&self) -> Option<ArgMap> {
        self.last_args.lock().clone()
    }

    pub fn last_arg(&self, key: &str) -> Option<String> {
        self.last_args().and_then(|args| args.get(key).cloned())
    }
}

/// A module whose registration and setup behavior is configured per test.
///
/// `run` records its arguments and returns them as a JSON object.
pub struct Probe {
    spec: ArgumentSpec,
    vectors: Vec<Vector>,
    setup_status: Status,
    setup_stores: Vec<(String, String)>,
    calls: Arc<Calls>,
}

impl Probe {
    pub fn new(spec: ArgumentSpec) -> Self {
        Self {
            spec,
            vectors: Vec::new(),
            setup_status: Status::Run,
            setup_stores: Vec::new(),
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn vectors(mut self, names: &[&str]) -> Self {
        self.vectors = names
            .iter()
            .map(|name| Vector::new(*name, format!("payload of {}", name)))
            .collect();
        self
    }

    pub fn setup_returns(mut self, status: Status) -> Self {
        self.setup_status = status;
        self
    }

    /// Store `key=value` in the session during setup.
    pub fn setup_stores(mut self, key: &str, value: &str) -> Self {
        self.setup_stores.push((key.to_string(), value.to_string()));
        self
    }

    pub fn calls(&self) -> Arc<Calls> {
        self.calls.clone()
    }
}

impl Module for Probe {
    fn name(&self) -> &str {
        PROBE
    }

    fn init(&mut self, reg: &mut Registrar<'_>) -> Result<(), ModuleError> {
        reg.info(ModuleInfo::new("Records how it was called."))?;
        reg.vectors(self.vectors.clone());
        reg.arguments(self.spec.clone());
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ModuleContext<'_>, _args: &ArgMap) -> Status {
        self.calls.setups.fetch_add(1, Ordering::SeqCst);
        for (key, value) in &self.setup_stores {
            ctx.store_arg(key.clone(), value.clone());
        }
        self.setup_status
    }

    fn run(&mut self, _ctx: &mut ModuleContext<'_>, args: &ArgMap) -> Option<Value> {
        self.calls.runs.fetch_add(1, Ordering::SeqCst);
        *self.calls.last_args.lock() = Some(args.clone());
        serde_json::to_value(args).ok()
    }
}

/// Load `probe` into a fresh session.
pub fn host(probe: Probe) -> (ModuleHost, Arc<Calls>, Arc<Session>) {
    let session = Arc::new(Session::new());
    host_in(session, probe)
}

/// Load `probe` into an existing session.
pub fn host_in(session: Arc<Session>, probe: Probe) -> (ModuleHost, Arc<Calls>, Arc<Session>) {
    let calls = probe.calls();
    let host = ModuleHost::new(session.clone(), probe).expect("Failed to load probe");
    (host, calls, session)
}

pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
