//! Sibling file discovery.
//!
//! Scans the document's directory (one level, no recursion) for style and
//! component files that belong to it by naming convention.

use std::path::Path;
use walkdir::WalkDir;

use crate::context::{Dependency, ModuleDescriptor, TransformContext};
use crate::naming::{SiblingKind, SiblingPatterns};
use crate::validate::TransformError;

/// File names in `dir`, sorted ascending by byte order.
pub fn list_directory(dir: &Path) -> Result<Vec<String>, TransformError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| TransformError::DirectoryRead {
            path: dir.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;
        files.push(entry.file_name().to_string_lossy().to_string());
    }

    Ok(files)
}

/// Register every sibling matching `patterns`.
///
/// Entries are applied in descending order so that, when several files match
/// the same slot, the lexicographically smallest one is written last and wins.
pub fn scan_siblings(
    patterns: &SiblingPatterns,
    ctx: &mut TransformContext,
) -> Result<(), TransformError> {
    let dirname = ctx.dirname().to_path_buf();
    let files = list_directory(&dirname)?;

    for file in files.iter().rev() {
        let Some(kind) = patterns.classify(file) else {
            continue;
        };
        tracing::trace!(file = %file, ?kind, "matched sibling file");

        match kind {
            SiblingKind::Style => ctx.add_dependency(Dependency::Path(format!("./{}", file))),
            SiblingKind::SplitComponent => {
                ctx.set_component_module(file_module(&dirname, file))?;
            }
            SiblingKind::Component => {
                let module = file_module(&dirname, file);
                ctx.set_component_module(module.clone())?;
                ctx.set_renderer_module(module);
            }
        }
    }

    Ok(())
}

fn file_module(dirname: &Path, file: &str) -> ModuleDescriptor {
    let stem = match file.rfind('.') {
        Some(idx) => &file[..idx],
        None => file,
    };
    ModuleDescriptor::File {
        filename: dirname.join(file).to_string_lossy().to_string(),
        require_path: format!("./{}", stem),
    }
}
