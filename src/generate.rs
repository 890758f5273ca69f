//! Rendering instantiations and writing the generated files

use std::io;
use std::path::{Path, PathBuf};

use crate::config::ExpandConfig;
use crate::template::{
    module_path, resolve_import, Instantiation, ResolutionContext, Template, TemplateDef,
    TemplateError, TemplateRegistry,
};

/// A fully rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Module name of the instantiation
    pub module_name: String,
    /// Module name of the template it was generated from
    pub template: String,
    /// Destination on disk
    pub path: PathBuf,
    /// File contents
    pub contents: String,
}

/// Result of writing one generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The file already held the rendered contents
    Unchanged,
}

/// State of a generated file on disk compared with its rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    UpToDate,
    Stale,
    Missing,
}

/// Render the contents of one instantiation of a template
pub fn render_instantiation(
    template: &Template,
    def: &TemplateDef,
    inst: &Instantiation,
    registry: &TemplateRegistry,
    config: &ExpandConfig,
) -> Result<String, TemplateError> {
    let mut out = String::new();
    out.push_str(&format!(
        "\n/*\n * THIS FILE IS AUTOMATICALLY GENERATED FROM '{}'.\n * DO NOT EDIT MANUALLY.\n */\n\n",
        template.source_name(&config.template_extension)
    ));

    for (param, arg) in def.params.iter().zip(&inst.args) {
        out.push_str(&format!(
            "private import {} as {}  // Template parameter\n",
            arg, param
        ));
    }

    let ctx = ResolutionContext::for_instantiation(def, inst);
    for import in &def.imports {
        let resolved = resolve_import(registry, import, &ctx)?;
        if let Some(access) = &import.access {
            out.push_str(access);
            out.push(' ');
        }
        out.push_str(&format!(
            "import {}  // {}<{}>\n",
            resolved,
            import.module,
            import.args.join(", ")
        ));
    }

    for line in &def.body_lines {
        out.push_str(line);
    }

    Ok(out)
}

/// Render every declared instantiation in the registry.
///
/// Nothing is written; an unresolved import anywhere fails the whole plan.
pub fn plan(
    registry: &TemplateRegistry,
    root: &Path,
    config: &ExpandConfig,
) -> Result<Vec<GeneratedFile>, TemplateError> {
    let mut files = Vec::new();
    for (template, def) in registry.instantiable() {
        for inst in &def.instantiations {
            let contents = render_instantiation(template, def, inst, registry, config)?;
            files.push(GeneratedFile {
                module_name: inst.name.clone(),
                template: template.name.clone(),
                path: module_path(root, &inst.name, &config.output_extension),
                contents,
            });
        }
    }
    Ok(files)
}

/// Compare a generated file with what is on disk
pub fn output_status(file: &GeneratedFile) -> io::Result<OutputStatus> {
    match std::fs::read(&file.path) {
        Ok(existing) if existing == file.contents.as_bytes() => Ok(OutputStatus::UpToDate),
        Ok(_) => Ok(OutputStatus::Stale),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(OutputStatus::Missing),
        Err(e) => Err(e),
    }
}

/// Write a generated file, creating parent directories as needed.
/// Files that already hold the rendered contents are left untouched.
pub fn write_file(file: &GeneratedFile) -> io::Result<WriteOutcome> {
    if output_status(file)? == OutputStatus::UpToDate {
        return Ok(WriteOutcome::Unchanged);
    }
    if let Some(parent) = file.path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file.path, &file.contents)?;
    Ok(WriteOutcome::Written)
}
