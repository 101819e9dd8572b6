//! Component transform driver.
//!
//! Wires one document into a component:
//! 1. Resolve the document's base name (documents with the template
//!    extension are skipped outright).
//! 2. Scan the directory for sibling style/component files.
//! 3. Walk the template once, collecting root nodes and extracting style and
//!    inline class blocks.
//! 4. Decide whether the roots get bound and assign synthetic keys.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::binding::{bind_root_nodes, BindingDecision};
use crate::context::{Dependency, ModuleDescriptor, StaticVar, TransformContext};
use crate::discovery::scan_siblings;
use crate::ir::{TemplateNode, TemplateTree};
use crate::naming::{file_name_no_ext, SiblingPatterns};
use crate::roots::{collect_root_nodes, RootCollection};
use crate::validate::{CompilerError, TransformError};

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Documents with this extension have no usable base name
    pub template_extension: String,
    pub legacy_bind_attribute: String,
    pub bound_root_attribute: String,
    pub key_prefix: String,
    pub component_constant_name: String,
    pub create_hook_name: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            template_extension: "js".to_string(),
            legacy_bind_attribute: "w-bind".to_string(),
            bound_root_attribute: "_componentbind".to_string(),
            key_prefix: "_r".to_string(),
            component_constant_name: "marko_component".to_string(),
            create_hook_name: "onCreate".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DRIVER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum TransformReport {
    /// No base name: nothing on disk can belong to this document
    Skipped,
    Completed {
        roots: RootCollection,
        decision: BindingDecision,
    },
}

pub fn transform_component(
    tree: &mut TemplateTree,
    ctx: &mut TransformContext,
) -> Result<TransformReport, TransformError> {
    let Some(base_name) = file_name_no_ext(&ctx.filename, &ctx.options.template_extension) else {
        tracing::debug!(file = %ctx.filename.display(), "no base name, skipping component transform");
        return Ok(TransformReport::Skipped);
    };

    let patterns = SiblingPatterns::new(&base_name)?;
    scan_siblings(&patterns, ctx)?;

    let roots = collect_root_nodes(tree, ctx)?;
    let decision = bind_root_nodes(tree, ctx, &roots);

    tracing::debug!(
        file = %ctx.filename.display(),
        roots = roots.root_nodes.len(),
        diagnostics = ctx.diagnostics().len(),
        ?decision,
        "component transform finished"
    );

    Ok(TransformReport::Completed { roots, decision })
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON BRIDGE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformInput {
    pub filename: String,
    pub tree: TemplateNode,
    #[serde(default)]
    pub options: TransformOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub tree: TemplateNode,
    pub skipped: bool,
    pub binding: Option<BindingDecision>,
    pub component_module: Option<ModuleDescriptor>,
    pub renderer_module: Option<ModuleDescriptor>,
    pub dependencies: Vec<Dependency>,
    pub static_vars: Vec<StaticVar>,
    pub diagnostics: Vec<CompilerError>,
}

pub fn transform_component_json(input_json: &str) -> Result<String, TransformError> {
    let input: TransformInput =
        serde_json::from_str(input_json).map_err(|e| TransformError::InvalidInput {
            message: e.to_string(),
        })?;

    let mut tree = TemplateTree::from_template_node(input.tree);
    let mut ctx = TransformContext::new(PathBuf::from(input.filename), input.options);
    let report = transform_component(&mut tree, &mut ctx)?;

    let (skipped, binding) = match report {
        TransformReport::Skipped => (true, None),
        TransformReport::Completed { decision, .. } => (false, Some(decision)),
    };
    let (component_module, renderer_module, dependencies, static_vars, diagnostics) =
        ctx.into_parts();

    let output = TransformOutput {
        tree: tree.to_template_node(),
        skipped,
        binding,
        component_module,
        renderer_module,
        dependencies,
        static_vars,
        diagnostics,
    };
    serde_json::to_string(&output).map_err(|e| TransformError::InvalidInput {
        message: e.to_string(),
    })
}

#[cfg(feature = "napi")]
#[napi]
pub fn transform_component_native(input_json: String) -> napi::Result<String> {
    transform_component_json(&input_json).map_err(|e| napi::Error::from_reason(e.to_string()))
}
