use serde_json::Value;

use crate::args::{ArgMap, ArgumentSpec};
use crate::error::ModuleError;
use crate::module::{Module, ModuleContext, ModuleInfo, Registrar};
use crate::session::Status;
use crate::vectors::Vector;

/// Print text back, optionally prefixed and transformed.
///
/// The first run stores `plain` as the transform unless one is configured.
#[derive(Debug, Default)]
pub struct Echo;

impl Module for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn doc(&self) -> &str {
        "Print text back, optionally prefixed and transformed."
    }

    fn init(&mut self, reg: &mut Registrar<'_>) -> Result<(), ModuleError> {
        reg.info(ModuleInfo::default().author("modshell").license("MIT"))?;
        reg.vectors(vec![
            Vector::new("plain", "identity"),
            Vector::new("upper", "uppercase"),
            Vector::new("reverse", "reverse characters"),
        ]);
        reg.arguments(
            ArgumentSpec::new()
                .mandatory("text")
                .optional("prefix", "")
                .optional_unset("transform")
                .bind_to_vectors("transform"),
        );
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ModuleContext<'_>, args: &ArgMap) -> Status {
        if args.get("transform").map_or(true, |t| t.is_empty()) {
            ctx.store_arg("transform", "plain");
        }
        Status::Run
    }

    fn run(&mut self, ctx: &mut ModuleContext<'_>, args: &ArgMap) -> Option<Value> {
        let text = args.get("text")?;
        let transformed = match args.get("transform").map(String::as_str) {
            Some("upper") => text.to_uppercase(),
            Some("reverse") => text.chars().rev().collect(),
            _ => text.clone(),
        };
        let prefix = args.get("prefix").map(String::as_str).unwrap_or_default();

        let output = format!("{}{}", prefix, transformed);
        ctx.store_result("last", output.clone());
        Some(Value::from(output))
    }
}
