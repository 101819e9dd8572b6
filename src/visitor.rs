use crate::ir::{NodeId, TemplateTree};
use crate::validate::TransformError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Descend into the node's children
    Continue,
    /// Prune the subtree
    Skip,
}

/// The single traversal mechanism for template trees.
///
/// Rules:
/// 1. Traversal is depth-first, in document order.
/// 2. `enter` decides per node whether its subtree is visited.
/// 3. A visitor may detach the node it was handed (or any node not yet
///    visited); detached nodes are never entered.
/// 4. A fatal error stops the walk immediately.
pub trait TreeVisitor {
    fn enter(&mut self, tree: &mut TemplateTree, id: NodeId) -> Result<WalkAction, TransformError>;
}

pub fn walk_tree<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &mut TemplateTree,
) -> Result<(), TransformError> {
    let root = tree.root();
    walk_node(visitor, tree, root)
}

pub fn walk_node<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &mut TemplateTree,
    id: NodeId,
) -> Result<(), TransformError> {
    if visitor.enter(tree, id)? == WalkAction::Skip {
        return Ok(());
    }
    walk_children(visitor, tree, id)
}

pub fn walk_children<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &mut TemplateTree,
    id: NodeId,
) -> Result<(), TransformError> {
    // Snapshot: visitors may detach siblings while we iterate.
    let children = tree.children(id).to_vec();
    for child in children {
        if tree.is_detached(child) {
            continue;
        }
        walk_node(visitor, tree, child)?;
    }
    Ok(())
}
