use serde::{Deserialize, Serialize};

use crate::context::TransformContext;
use crate::ir::{AttributeValue, NodeKind, TemplateTree};
use crate::roots::RootCollection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum BindingDecision {
    /// The template binds itself with the legacy attribute
    LegacyExplicitBind,
    NoBoundComponent,
    NoRootNodes,
    /// Several roots and at least one user `id`
    AmbiguousIds,
    #[serde(rename_all = "camelCase")]
    Bound { root_count: usize, keys: Vec<String> },
}

/// Decide whether the collected roots get bound to the component and, if so,
/// mark them and hand out synthetic keys.
pub fn bind_root_nodes(
    tree: &mut TemplateTree,
    ctx: &mut TransformContext,
    roots: &RootCollection,
) -> BindingDecision {
    if roots.has_legacy_explicit_bind {
        return BindingDecision::LegacyExplicitBind;
    }
    if !ctx.has_bound_component_for_template() {
        return BindingDecision::NoBoundComponent;
    }
    if roots.root_nodes.is_empty() {
        return BindingDecision::NoRootNodes;
    }

    let multiple_roots = roots.root_nodes.len() > 1;
    if multiple_roots && roots.id_count > 0 {
        tracing::debug!(
            roots = roots.root_nodes.len(),
            ids = roots.id_count,
            node = ?roots.node_with_assigned_id,
            "not binding multiple roots with explicit ids"
        );
        return BindingDecision::AmbiguousIds;
    }

    ctx.set_has_bound_component_for_template();

    let bound_attribute = ctx.options.bound_root_attribute.clone();
    let mut keys = Vec::new();
    let mut next_key = 0;

    for &id in &roots.root_nodes {
        tree.set_attribute(id, &bound_attribute, AttributeValue::Empty);

        if tree.has_attribute(id, "key") || tree.has_attribute(id, "ref") {
            continue;
        }
        if tree.node(id).kind == NodeKind::CustomTag || multiple_roots {
            let key = format!("{}{}", ctx.options.key_prefix, next_key);
            next_key += 1;
            tree.set_attribute(id, "key", AttributeValue::Static(key.clone()));
            keys.push(key);
        }
    }

    BindingDecision::Bound {
        root_count: roots.root_nodes.len(),
        keys,
    }
}
