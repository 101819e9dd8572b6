use regex::Regex;
use std::path::Path;

use crate::validate::TransformError;

/// Base file name of a document, without its extension.
///
/// Returns `None` when the document carries the template extension itself:
/// such a document has no siblings that could belong to it.
pub fn file_name_no_ext(filename: &Path, template_extension: &str) -> Option<String> {
    let name = filename.file_name()?.to_str()?;
    let extension = Path::new(name).extension().and_then(|ext| ext.to_str());

    if extension == Some(template_extension.trim_start_matches('.')) {
        return None;
    }

    let stem = match extension {
        Some(ext) => &name[..name.len() - ext.len() - 1],
        None => name,
    };
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingKind {
    Style,
    /// Browser-only component implementation; the renderer stays untouched
    SplitComponent,
    Component,
}

#[derive(Debug, Clone)]
pub struct SiblingPatterns {
    style: Regex,
    component: Regex,
    split_component: Regex,
}

impl SiblingPatterns {
    /// `index` documents also claim the unprefixed `style.*` / `component.*`.
    pub fn new(base_name: &str) -> Result<Self, TransformError> {
        let is_entry = base_name == "index";
        let prefix = format!(
            "({}\\.{})",
            regex::escape(base_name),
            if is_entry { "|" } else { "" }
        );

        Ok(Self {
            style: compile(&format!("^{}style\\.\\w+$", prefix))?,
            component: compile(&format!("^{}component\\.\\w+$", prefix))?,
            split_component: compile(&format!("^{}component-browser\\.\\w+$", prefix))?,
        })
    }

    /// Checked in order: style, split component, component.
    pub fn classify(&self, file_name: &str) -> Option<SiblingKind> {
        if self.style.is_match(file_name) {
            Some(SiblingKind::Style)
        } else if self.split_component.is_match(file_name) {
            Some(SiblingKind::SplitComponent)
        } else if self.component.is_match(file_name) {
            Some(SiblingKind::Component)
        } else {
            None
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, TransformError> {
    Regex::new(pattern).map_err(|e| TransformError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
