//! Module help rendering.
//!
//! The host builds a [`HelpContext`] from the module's declared arguments and
//! current stored values; a [`HelpRenderer`] turns it into text.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::args::{ArgMap, ModuleDescriptor};

#[derive(Debug, Error)]
pub enum HelpError {
    #[error("Failed to render help: {0}")]
    Render(#[from] tera::Error),

    #[error("Failed to read help template '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything a help template can reference.
#[derive(Debug, Clone, Serialize)]
pub struct HelpContext {
    pub module_name: String,
    pub description: String,
    pub mandatory: Vec<String>,
    pub optional: Vec<OptionalHelp>,
    pub stored: ArgMap,
    pub vector_arg: VectorArgHelp,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionalHelp {
    pub name: String,
    pub default: Option<String>,
    /// Value currently stored in the session, if any.
    pub current: Option<String>,
}

/// The argument bound to the vector list. `name` is empty when unbound.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VectorArgHelp {
    pub name: String,
    pub names: Vec<String>,
}

impl HelpContext {
    pub fn new(
        descriptor: &ModuleDescriptor,
        description: &str,
        stored: &ArgMap,
        vector_names: &BTreeSet<String>,
    ) -> Self {
        let optional = descriptor
            .args_optional
            .iter()
            .map(|(name, default)| OptionalHelp {
                name: name.clone(),
                default: default.clone(),
                current: stored.get(name).cloned(),
            })
            .collect();

        let vector_arg = descriptor
            .bind_to_vectors
            .as_ref()
            .map(|name| VectorArgHelp {
                name: name.clone(),
                names: vector_names.iter().cloned().collect(),
            })
            .unwrap_or_default();

        Self {
            module_name: descriptor.name.clone(),
            description: description.to_string(),
            mandatory: descriptor.args_mandatory.clone(),
            optional,
            stored: stored.clone(),
            vector_arg,
        }
    }
}

/// Renders module help text.
pub trait HelpRenderer: Send + Sync {
    fn render(&self, help: &HelpContext) -> Result<String, HelpError>;
}

/// Tera-based renderer.
#[derive(Debug, Clone)]
pub struct TeraHelpRenderer {
    template: String,
}

impl TeraHelpRenderer {
    pub fn new() -> Self {
        Self::with_template(DEFAULT_TEMPLATE)
    }

    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Load the template from a file.
    pub fn from_file(path: &Path) -> Result<Self, HelpError> {
        let template = std::fs::read_to_string(path).map_err(|e| HelpError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::with_template(template))
    }
}

impl Default for TeraHelpRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpRenderer for TeraHelpRenderer {
    fn render(&self, help: &HelpContext) -> Result<String, HelpError> {
        let context = Context::from_serialize(help)?;
        Ok(Tera::one_off(&self.template, &context, false)?)
    }
}

const DEFAULT_TEMPLATE: &str = r#"{{ module_name }}: {{ description }}

usage: {{ module_name }}
{%- for arg in mandatory %} <{{ arg }}>{% endfor %}
{%- for opt in optional %} [--{{ opt.name }} {{ opt.name | upper }}]{% endfor %}
{% if mandatory %}
mandatory arguments:
{%- for arg in mandatory %}
  {{ arg }}
{%- endfor %}
{% endif %}
{%- if optional %}
optional arguments:
{%- for opt in optional %}
  --{{ opt.name }}
  {%- if opt.current %} (stored: {{ opt.current }}){% elif opt.default %} (default: {{ opt.default }}){% endif %}
  {%- if opt.name == vector_arg.name %} (vectors: {{ vector_arg.names | join(sep=", ") }}){% endif %}
{%- endfor %}
{% endif %}"#;
