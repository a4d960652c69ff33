//! Built-in modules.

mod echo;

pub use echo::Echo;

use crate::module::Module;

/// Modules loaded by the interactive shell.
pub fn builtin() -> Vec<Box<dyn Module>> {
    vec![Box::new(Echo)]
}
