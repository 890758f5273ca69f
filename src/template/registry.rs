//! Template registry for storing and looking up parsed templates

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while registering or resolving templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Import refers to a module that is not a known template
    #[error("template not found: {name}")]
    NotFound { name: String },

    /// Import passes arguments to a template without a metadata block
    #[error("module {name} has no template metadata and cannot be instantiated")]
    NotInstantiable { name: String },

    /// No declared instantiation matches the substituted arguments
    #[error("no instantiation of {template}<{}> is declared", .args.join(", "))]
    NoMatchingInstantiation { template: String, args: Vec<String> },

    /// Two template files map to the same module name
    #[error("duplicate template definition: {name} ({} and {})", .first.display(), .second.display())]
    Duplicate {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Two instantiations write the same output module
    #[error("output module {output} is produced by both {first} and {second}")]
    DuplicateOutput {
        output: String,
        first: String,
        second: String,
    },

    /// Output module name cannot be mapped to a path under the root
    #[error("instantiation of {template} has invalid output module name '{name}'")]
    InvalidOutputName { template: String, name: String },

    /// Instantiation argument count differs from the parameter count
    #[error("instantiation {instantiation} of {template} has {found} arguments, expected {expected}")]
    ArityMismatch {
        template: String,
        instantiation: String,
        expected: usize,
        found: usize,
    },
}

/// A declared import of another (possibly templated) module
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportDecl {
    /// Module being imported
    pub module: String,
    /// Template arguments; may name parameters of the importing template
    #[serde(default)]
    pub args: Vec<String>,
    /// Access modifier written before `import`, e.g. `private`
    #[serde(default)]
    pub access: Option<String>,
}

/// A concrete binding of a template's parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instantiation {
    /// Fully qualified name of the generated module
    pub name: String,
    /// Concrete arguments, one per template parameter
    #[serde(default)]
    pub args: Vec<String>,
}

/// The metadata block of a template plus the text it wraps
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TemplateDef {
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub imports: Vec<ImportDecl>,
    #[serde(default)]
    pub instantiations: Vec<Instantiation>,
    /// Lines outside the metadata block, with their line terminators
    #[serde(skip)]
    pub body_lines: Vec<String>,
}

impl TemplateDef {
    /// Find the instantiation declared with exactly these arguments
    pub fn find_instantiation(&self, args: &[String]) -> Option<&Instantiation> {
        self.instantiations.iter().find(|inst| inst.args == args)
    }
}

/// A template file, identified by its module name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Fully qualified dotted module name
    pub name: String,
    /// Path of the template file
    pub path: PathBuf,
    /// Parsed metadata; `None` for files without a metadata block
    pub def: Option<TemplateDef>,
}

impl Template {
    /// Create an inert template (no metadata block)
    pub fn inert(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            def: None,
        }
    }

    /// Create a template from a parsed definition
    pub fn with_def(name: impl Into<String>, path: impl Into<PathBuf>, def: TemplateDef) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            def: Some(def),
        }
    }

    /// Check if this template can be instantiated
    pub fn is_instantiable(&self) -> bool {
        self.def.is_some()
    }

    /// Path of the template relative to the library root, as written in
    /// generated headers
    pub fn source_name(&self, extension: &str) -> String {
        format!("{}.{}", self.name.replace('.', "/"), extension)
    }
}

/// Registry of all templates found under one root
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
    /// Output module name -> template producing it
    outputs: HashMap<String, String>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, validating its instantiations
    pub fn register(&mut self, template: Template) -> Result<(), TemplateError> {
        if let Some(existing) = self.templates.get(&template.name) {
            return Err(TemplateError::Duplicate {
                name: template.name.clone(),
                first: existing.path.clone(),
                second: template.path.clone(),
            });
        }

        if let Some(def) = &template.def {
            for inst in &def.instantiations {
                if !is_valid_module_name(&inst.name) {
                    return Err(TemplateError::InvalidOutputName {
                        template: template.name.clone(),
                        name: inst.name.clone(),
                    });
                }
                if inst.args.len() != def.params.len() {
                    return Err(TemplateError::ArityMismatch {
                        template: template.name.clone(),
                        instantiation: inst.name.clone(),
                        expected: def.params.len(),
                        found: inst.args.len(),
                    });
                }
            }

            let mut claimed = Vec::new();
            for inst in &def.instantiations {
                let owner = self
                    .outputs
                    .get(&inst.name)
                    .or_else(|| claimed.contains(&&inst.name).then_some(&template.name));
                if let Some(owner) = owner {
                    return Err(TemplateError::DuplicateOutput {
                        output: inst.name.clone(),
                        first: owner.clone(),
                        second: template.name.clone(),
                    });
                }
                claimed.push(&inst.name);
            }
            for output in claimed {
                self.outputs.insert(output.clone(), template.name.clone());
            }
        }

        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Get a template by module name
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Iterate over templates that carry a metadata block
    pub fn instantiable(&self) -> impl Iterator<Item = (&Template, &TemplateDef)> {
        self.templates
            .values()
            .filter_map(|t| t.def.as_ref().map(|def| (t, def)))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// A dotted name whose components are all non-empty and free of path
/// separators, so it maps to a file below the root
fn is_valid_module_name(name: &str) -> bool {
    name.split('.')
        .all(|part| !part.is_empty() && !part.contains(['/', '\\']))
}
