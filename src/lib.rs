//! # Single-File Component Binding
//!
//! Turns a single-file component template into a fully wired component.
//!
//! ## Pass Invariants
//!
//! 1. **One Document, One Context**: every flag, slot and counter lives on a
//!    [`TransformContext`] created for one document and dropped afterwards.
//!
//! 2. **Module Slots**: a document has at most one component module and at most
//!    one renderer module. Registering a second inline component is fatal.
//!
//! 3. **Sibling Precedence**: when several sibling files match the same
//!    convention, the lexicographically smallest name wins.
//!
//! 4. **Single Walk**: root-node membership is decided in one pruning walk and
//!    never revisited. Rendered elements and custom tags are collected and not
//!    descended into; structural containers are transparent.
//!
//! 5. **Keys Only On Bind**: bound-root markers and synthetic `_rN` keys are
//!    assigned only when binding is accepted. Multiple roots plus any `id`
//!    abort binding and leave the tree untouched.
//!
//! ## Error Kinds
//!
//! - Per-node diagnostics ([`CompilerError`]) are recorded on the context and
//!   the walk continues.
//! - Fatal conditions ([`TransformError`]) abort the document: a non-method
//!   member in an inline class, or a failed directory read.

mod binding;
mod component;
mod context;
mod discovery;
mod ir;
mod naming;
mod roots;
mod style;
mod transform;
mod validate;
mod visitor;

#[cfg(test)]
mod roots_tests;

pub use binding::{bind_root_nodes, BindingDecision};
pub use component::{class_to_object_source, convert_inline_class, ClassConversionError};
pub use context::{Dependency, ModuleDescriptor, StaticVar, StyleDependency, TransformContext};
pub use discovery::{list_directory, scan_siblings};
pub use ir::{
    AttributeIR, AttributeValue, ElementNode, Node, NodeId, NodeKind, OtherNode, TemplateNode,
    TemplateTree,
};
pub use naming::{file_name_no_ext, SiblingKind, SiblingPatterns};
pub use roots::{collect_root_nodes, RootCollection, RootNodeCollector};
pub use style::extract_style_block;
pub use validate::{
    CompilerError, StepOutcome, TransformError, ERR_CLASS_EXTENDS, ERR_CLASS_SYNTAX,
    ERR_INLINE_AND_EXTERNAL, ERR_STYLE_ATTRIBUTE,
};
pub use visitor::{walk_tree, TreeVisitor, WalkAction};

#[cfg(feature = "napi")]
pub use transform::transform_component_native;
pub use transform::{
    transform_component, transform_component_json, TransformInput, TransformOptions,
    TransformOutput, TransformReport,
};
