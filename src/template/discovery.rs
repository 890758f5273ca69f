//! Locating template files and naming their modules

use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::ExpandConfig;

/// A template file found under the library root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Location on disk
    pub path: PathBuf,
    /// Fully qualified module name derived from the relative path
    pub module_name: String,
}

/// Recursively scan `root` for template files, following symlinks.
///
/// The returned list is sorted by path so that runs are deterministic.
pub fn discover(root: &Path, config: &ExpandConfig) -> Result<Vec<TemplateFile>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() || !config.is_template_path(entry.path()) {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let module_name = module_name_from_path(relative);
        debug!(path = %path.display(), module = %module_name, "discovered template");

        files.push(TemplateFile {
            path: path.to_path_buf(),
            module_name,
        });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Compute the fully qualified name of a module from the path of its file,
/// relative to the library root. Only the final extension is stripped.
pub fn module_name_from_path(relative: &Path) -> String {
    relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Path of the file holding a module, relative to `root`
pub fn module_path(root: &Path, module_name: &str, extension: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for component in module_name.split('.') {
        path.push(component);
    }
    path.set_extension(extension);
    path
}
