//! Per-document compilation state.
//!
//! Everything the pass records about one document lives here: the component
//! and renderer module slots, the bound-component flag, registered
//! dependencies, pooled constants and diagnostics. A context is created for a
//! single document and dropped afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ir::NodeId;
use crate::transform::TransformOptions;
use crate::validate::{CompilerError, TransformError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ModuleDescriptor {
    /// A sibling file on disk
    #[serde(rename_all = "camelCase")]
    File {
        filename: String,
        require_path: String,
    },
    /// A constant registered inside the compiled document
    #[serde(rename_all = "camelCase")]
    Inline {
        inline_id: String,
        filename: String,
        require_path: String,
    },
}

impl ModuleDescriptor {
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    pub fn filename(&self) -> &str {
        match self {
            Self::File { filename, .. } | Self::Inline { filename, .. } => filename,
        }
    }

    pub fn require_path(&self) -> &str {
        match self {
            Self::File { require_path, .. } | Self::Inline { require_path, .. } => require_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDependency {
    #[serde(rename = "type")]
    pub language: String,
    pub code: String,
    pub virtual_path: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Path(String),
    Style(StyleDependency),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticVar {
    pub name: String,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct TransformContext {
    pub filename: PathBuf,
    pub options: TransformOptions,
    component_module: Option<ModuleDescriptor>,
    renderer_module: Option<ModuleDescriptor>,
    has_bound_component: bool,
    dependencies: Vec<Dependency>,
    static_vars: Vec<StaticVar>,
    diagnostics: Vec<CompilerError>,
}

impl TransformContext {
    pub fn new(filename: impl Into<PathBuf>, options: TransformOptions) -> Self {
        Self {
            filename: filename.into(),
            options,
            component_module: None,
            renderer_module: None,
            has_bound_component: false,
            dependencies: Vec::new(),
            static_vars: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn dirname(&self) -> &Path {
        match self.filename.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// The document's file name, extension included.
    pub fn file_basename(&self) -> String {
        self.filename
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn file_label(&self) -> String {
        self.filename.to_string_lossy().to_string()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MODULE SLOTS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn component_module(&self) -> Option<&ModuleDescriptor> {
        self.component_module.as_ref()
    }

    pub fn renderer_module(&self) -> Option<&ModuleDescriptor> {
        self.renderer_module.as_ref()
    }

    pub fn set_component_module(&mut self, module: ModuleDescriptor) -> Result<(), TransformError> {
        if let Some(existing) = &self.component_module {
            if existing.is_inline() && module.is_inline() {
                return Err(TransformError::DuplicateInlineComponent {
                    existing: existing.require_path().to_string(),
                });
            }
        }
        self.component_module = Some(module);
        Ok(())
    }

    pub fn set_renderer_module(&mut self, module: ModuleDescriptor) {
        self.renderer_module = Some(module);
    }

    pub fn has_bound_component_for_template(&self) -> bool {
        self.has_bound_component || self.component_module.is_some()
    }

    pub fn set_has_bound_component_for_template(&mut self) {
        self.has_bound_component = true;
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REGISTRIES
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies.push(dependency);
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Pool a module-level constant and return the identifier it was given.
    pub fn add_static_var(&mut self, name: &str, source: String) -> String {
        let mut candidate = name.to_string();
        let mut suffix = 0;
        while self.static_vars.iter().any(|var| var.name == candidate) {
            suffix += 1;
            candidate = format!("{}_{}", name, suffix);
        }
        self.static_vars.push(StaticVar {
            name: candidate.clone(),
            source,
        });
        candidate
    }

    pub fn static_vars(&self) -> &[StaticVar] {
        &self.static_vars
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DIAGNOSTICS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn add_node_error(&mut self, code: &str, message: &str, node: NodeId, node_pos: u32) {
        let err = CompilerError::at_node(code, message, &self.file_label(), node, node_pos);
        tracing::debug!(code, pos = node_pos, "{}", message);
        self.diagnostics.push(err);
    }

    pub fn add_pos_error(&mut self, code: &str, message: &str, pos: u32) {
        let err = CompilerError::at_pos(code, message, &self.file_label(), pos);
        tracing::debug!(code, pos, "{}", message);
        self.diagnostics.push(err);
    }

    pub fn diagnostics(&self) -> &[CompilerError] {
        &self.diagnostics
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<ModuleDescriptor>,
        Option<ModuleDescriptor>,
        Vec<Dependency>,
        Vec<StaticVar>,
        Vec<CompilerError>,
    ) {
        (
            self.component_module,
            self.renderer_module,
            self.dependencies,
            self.static_vars,
            self.diagnostics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(id: &str) -> ModuleDescriptor {
        ModuleDescriptor::Inline {
            inline_id: id.to_string(),
            filename: "/app/index.marko".to_string(),
            require_path: "./index.marko".to_string(),
        }
    }

    #[test]
    fn test_second_inline_component_is_fatal() {
        let mut ctx = TransformContext::new("/app/index.marko", TransformOptions::default());
        ctx.set_component_module(inline("marko_component")).unwrap();

        let err = ctx.set_component_module(inline("marko_component_1")).unwrap_err();
        assert!(matches!(err, TransformError::DuplicateInlineComponent { .. }));
    }

    #[test]
    fn test_component_module_implies_bound_component() {
        let mut ctx = TransformContext::new("/app/index.marko", TransformOptions::default());
        assert!(!ctx.has_bound_component_for_template());

        ctx.set_component_module(ModuleDescriptor::File {
            filename: "/app/component.js".to_string(),
            require_path: "./component".to_string(),
        })
        .unwrap();
        assert!(ctx.has_bound_component_for_template());
    }

    #[test]
    fn test_static_var_names_are_unique() {
        let mut ctx = TransformContext::new("index.marko", TransformOptions::default());
        assert_eq!(ctx.add_static_var("marko_component", "{}".into()), "marko_component");
        assert_eq!(ctx.add_static_var("marko_component", "{}".into()), "marko_component_1");
        assert_eq!(ctx.dirname(), Path::new("."));
    }
}
