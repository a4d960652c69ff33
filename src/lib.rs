//! Execution engine for pluggable command modules.
//!
//! ```text
//! line → lexer → args::resolve → lifecycle::advance → Module::run
//!                    ▲                  ▲
//!             stored args ── Session ── status
//! ```

pub mod args;
pub mod catalog;
pub mod config;
pub mod error;
pub mod help;
pub mod host;
pub mod lexer;
pub mod lifecycle;
pub mod logging;
pub mod module;
pub mod modules;
pub mod session;
pub mod vectors;

pub use catalog::ModuleCatalog;
pub use error::ModuleError;
pub use host::ModuleHost;
pub use module::{Module, ModuleContext, ModuleInfo, Registrar};
pub use session::{Session, Status};
