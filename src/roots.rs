//! Root node collection.
//!
//! One walk over the template decides which top-level rendered nodes may be
//! bound to the component instance. Rendered elements and custom tags are
//! collected and never descended into; structural wrappers are transparent.
//! Style blocks and inline classes met along the way are handed off to their
//! own extractors.

use crate::component::convert_inline_class;
use crate::context::TransformContext;
use crate::ir::{AttributeValue, NodeId, NodeKind, TemplateTree};
use crate::style::extract_style_block;
use crate::validate::TransformError;
use crate::visitor::{walk_tree, TreeVisitor, WalkAction};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootCollection {
    /// Candidates in document order
    pub root_nodes: Vec<NodeId>,
    pub has_legacy_explicit_bind: bool,
    pub id_count: usize,
    /// Last element seen with an `id`, kept for diagnostics
    pub node_with_assigned_id: Option<NodeId>,
    pub assigned_id: Option<AttributeValue>,
}

pub struct RootNodeCollector<'c> {
    ctx: &'c mut TransformContext,
    collection: RootCollection,
}

impl<'c> RootNodeCollector<'c> {
    pub fn new(ctx: &'c mut TransformContext) -> Self {
        Self {
            ctx,
            collection: RootCollection::default(),
        }
    }

    pub fn collect(mut self, tree: &mut TemplateTree) -> Result<RootCollection, TransformError> {
        walk_tree(&mut self, tree)?;
        Ok(self.collection)
    }

    fn enter_element(
        &mut self,
        tree: &mut TemplateTree,
        id: NodeId,
    ) -> Result<WalkAction, TransformError> {
        if tree.has_attribute(id, &self.ctx.options.legacy_bind_attribute) {
            self.collection.has_legacy_explicit_bind = true;
            self.ctx.set_has_bound_component_for_template();
            return Ok(WalkAction::Skip);
        }

        if let Some(value) = tree.attribute(id, "id") {
            self.collection.id_count += 1;
            self.collection.node_with_assigned_id = Some(id);
            self.collection.assigned_id = Some(value.clone());
        }

        if tree.node(id).is_tag("style") {
            extract_style_block(tree, id, self.ctx);
        } else {
            self.collection.root_nodes.push(id);
        }
        Ok(WalkAction::Skip)
    }
}

impl TreeVisitor for RootNodeCollector<'_> {
    fn enter(&mut self, tree: &mut TemplateTree, id: NodeId) -> Result<WalkAction, TransformError> {
        match tree.node(id).kind {
            NodeKind::TemplateRoot | NodeKind::Container => Ok(WalkAction::Continue),
            NodeKind::HtmlElement => self.enter_element(tree, id),
            NodeKind::CustomTag => {
                self.collection.root_nodes.push(id);
                Ok(WalkAction::Skip)
            }
            NodeKind::Other => {
                if tree.node(id).is_tag("class") {
                    convert_inline_class(tree, id, self.ctx)?;
                }
                Ok(WalkAction::Skip)
            }
        }
    }
}

/// Walk `tree` once and gather its root nodes.
pub fn collect_root_nodes(
    tree: &mut TemplateTree,
    ctx: &mut TransformContext,
) -> Result<RootCollection, TransformError> {
    RootNodeCollector::new(ctx).collect(tree)
}
