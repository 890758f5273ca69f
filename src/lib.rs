//! qllt-expand - expands parameterized library templates into generated modules
//!
//! Template files (`*.qllt`) carry a JSON metadata block naming their
//! parameters, the templated modules they import and the instantiations to
//! produce. Each instantiation becomes a generated library file (`*.qll`)
//! that binds the parameters, imports the matching instantiations of other
//! templates and repeats the template body.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = qllt_expand::expand(Path::new("ql/lib")).unwrap();
//! println!("{} files written", report.written.len());
//! ```

pub mod config;
pub mod error;
pub mod generate;
pub mod template;

pub use config::{ConfigError, ExpandConfig};
pub use error::ParseError;
pub use generate::{GeneratedFile, OutputStatus, WriteOutcome};
pub use template::{Template, TemplateError, TemplateRegistry};

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during an expansion run
#[derive(Debug, Error)]
pub enum ExpandError {
    /// Error in a template's metadata block
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Error registering or resolving templates
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Error loading configuration
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error walking the template tree
    #[error("failed to scan templates: {0}")]
    Walk(#[from] walkdir::Error),

    /// Error reading a template or writing an output
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExpandError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Summary of an expansion run
#[derive(Debug, Default)]
pub struct ExpandReport {
    /// Number of template files found
    pub templates: usize,
    /// Outputs whose contents changed
    pub written: Vec<PathBuf>,
    /// Outputs that already held the rendered contents
    pub unchanged: Vec<PathBuf>,
}

/// Summary of a check run
#[derive(Debug, Default)]
pub struct CheckReport {
    pub up_to_date: Vec<PathBuf>,
    pub stale: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
}

impl CheckReport {
    /// True when every output matches its template
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty() && self.missing.is_empty()
    }
}

/// Discover and parse every template under `root` into a registry
pub fn load_registry(root: &Path, config: &ExpandConfig) -> Result<TemplateRegistry, ExpandError> {
    let mut registry = TemplateRegistry::new();
    for file in template::discover(root, config)? {
        let source =
            std::fs::read_to_string(&file.path).map_err(|e| ExpandError::io(&file.path, e))?;
        let parsed = template::parse_template(&source, &file.module_name, &file.path, config)?;
        debug!(
            module = %parsed.name,
            instantiable = parsed.is_instantiable(),
            "parsed template"
        );
        registry.register(parsed)?;
    }
    Ok(registry)
}

/// Expand all templates under `root` with the default configuration
pub fn expand(root: &Path) -> Result<ExpandReport, ExpandError> {
    expand_with_config(root, &ExpandConfig::default())
}

/// Expand all templates under `root`.
///
/// Every output is rendered before the first one is written, so an
/// unresolved import leaves the tree untouched.
pub fn expand_with_config(root: &Path, config: &ExpandConfig) -> Result<ExpandReport, ExpandError> {
    let registry = load_registry(root, config)?;
    let files = generate::plan(&registry, root, config)?;

    let mut report = ExpandReport {
        templates: registry.len(),
        ..ExpandReport::default()
    };
    for file in files {
        match generate::write_file(&file).map_err(|e| ExpandError::io(&file.path, e))? {
            WriteOutcome::Written => {
                info!(path = %file.path.display(), template = %file.template, "generated");
                report.written.push(file.path);
            }
            WriteOutcome::Unchanged => {
                debug!(path = %file.path.display(), "unchanged");
                report.unchanged.push(file.path);
            }
        }
    }

    info!(
        templates = report.templates,
        written = report.written.len(),
        unchanged = report.unchanged.len(),
        "expansion complete"
    );
    Ok(report)
}

/// Check generated files under `root` with the default configuration
pub fn check(root: &Path) -> Result<CheckReport, ExpandError> {
    check_with_config(root, &ExpandConfig::default())
}

/// Render every instantiation and compare it with the file on disk,
/// without writing anything
pub fn check_with_config(root: &Path, config: &ExpandConfig) -> Result<CheckReport, ExpandError> {
    let registry = load_registry(root, config)?;
    let mut report = CheckReport::default();
    for file in generate::plan(&registry, root, config)? {
        match generate::output_status(&file).map_err(|e| ExpandError::io(&file.path, e))? {
            OutputStatus::UpToDate => report.up_to_date.push(file.path),
            OutputStatus::Stale => report.stale.push(file.path),
            OutputStatus::Missing => report.missing.push(file.path),
        }
    }
    info!(
        up_to_date = report.up_to_date.len(),
        stale = report.stale.len(),
        missing = report.missing.len(),
        "check complete"
    );
    Ok(report)
}
