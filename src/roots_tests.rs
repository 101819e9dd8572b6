#[cfg(test)]
mod tests {
    use crate::binding::{bind_root_nodes, BindingDecision};
    use crate::context::{ModuleDescriptor, TransformContext};
    use crate::ir::{AttributeValue, Node, NodeId, TemplateTree};
    use crate::roots::collect_root_nodes;
    use crate::transform::TransformOptions;

    const BOUND: &str = "_componentbind";

    fn bound_ctx() -> TransformContext {
        let mut ctx = TransformContext::new("/app/index.marko", TransformOptions::default());
        ctx.set_component_module(ModuleDescriptor::File {
            filename: "/app/component.js".to_string(),
            require_path: "./component".to_string(),
        })
        .unwrap();
        ctx
    }

    fn key_of(tree: &TemplateTree, id: NodeId) -> Option<AttributeValue> {
        tree.attribute(id, "key").cloned()
    }

    fn static_key(key: &str) -> Option<AttributeValue> {
        Some(AttributeValue::Static(key.to_string()))
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // COLLECTION
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_containers_are_transparent_and_elements_pruned() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let wrapper = tree.append(root, Node::container());
        let div = tree.append(wrapper, Node::element("div"));
        tree.append(div, Node::element("span"));
        let widget = tree.append(root, Node::custom_tag("app-widget"));
        tree.append(widget, Node::element("p"));
        tree.append(root, Node::other("comment", "<!-- x -->"));
        let mut ctx = bound_ctx();

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();

        assert_eq!(roots.root_nodes, vec![div, widget]);
        assert_eq!(roots.id_count, 0);
        assert!(!roots.has_legacy_explicit_bind);
    }

    #[test]
    fn test_collection_is_repeatable() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let a = tree.append(root, Node::element("header"));
        let wrapper = tree.append(root, Node::container());
        let b = tree.append(wrapper, Node::custom_tag("nav-bar"));
        let c = tree.append(root, Node::element("footer"));
        let mut ctx = bound_ctx();

        let first = collect_root_nodes(&mut tree, &mut ctx).unwrap();
        let second = collect_root_nodes(&mut tree, &mut ctx).unwrap();

        assert_eq!(first.root_nodes, vec![a, b, c]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ids_are_counted_and_remembered() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        tree.append(
            root,
            Node::element("div").with_attribute("id", AttributeValue::Static("a".into())),
        );
        let second = tree.append(
            root,
            Node::element("div").with_attribute("id", AttributeValue::Dynamic("input.id".into())),
        );
        let mut ctx = bound_ctx();

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();

        assert_eq!(roots.id_count, 2);
        assert_eq!(roots.node_with_assigned_id, Some(second));
        assert_eq!(
            roots.assigned_id,
            Some(AttributeValue::Dynamic("input.id".into()))
        );
    }

    #[test]
    fn test_style_block_is_not_a_root() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let style = tree.append(
            root,
            Node::element("style").with_attribute("{ .x { color: blue } }", AttributeValue::Empty),
        );
        let div = tree.append(root, Node::element("div"));
        let mut ctx = bound_ctx();

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();

        assert_eq!(roots.root_nodes, vec![div]);
        assert!(tree.is_detached(style));
        assert_eq!(ctx.dependencies().len(), 1);
    }

    #[test]
    fn test_inline_class_is_absorbed() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let class = tree.append(root, Node::other("class", "class {\n  onMount() {}\n}"));
        let div = tree.append(root, Node::element("div"));
        let mut ctx = TransformContext::new("/app/index.marko", TransformOptions::default());

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();

        assert_eq!(roots.root_nodes, vec![div]);
        assert!(tree.is_detached(class));
        assert!(ctx.component_module().unwrap().is_inline());
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // BINDING
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_single_element_root_gets_marker_only() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let div = tree.append(root, Node::element("div"));
        let mut ctx = bound_ctx();

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();
        let decision = bind_root_nodes(&mut tree, &mut ctx, &roots);

        assert_eq!(
            decision,
            BindingDecision::Bound {
                root_count: 1,
                keys: vec![]
            }
        );
        assert!(tree.has_attribute(div, BOUND));
        assert_eq!(key_of(&tree, div), None);
    }

    #[test]
    fn test_single_custom_tag_root_gets_key() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let widget = tree.append(root, Node::custom_tag("app-widget"));
        let mut ctx = bound_ctx();

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();
        bind_root_nodes(&mut tree, &mut ctx, &roots);

        assert!(tree.has_attribute(widget, BOUND));
        assert_eq!(key_of(&tree, widget), static_key("_r0"));
    }

    #[test]
    fn test_multiple_roots_get_sequential_keys() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let a = tree.append(root, Node::element("div"));
        let b = tree.append(
            root,
            Node::element("span").with_attribute("ref", AttributeValue::Static("label".into())),
        );
        let wrapper = tree.append(root, Node::container());
        let c = tree.append(wrapper, Node::custom_tag("app-widget"));
        let d = tree.append(
            root,
            Node::element("p").with_attribute("key", AttributeValue::Static("mine".into())),
        );
        let mut ctx = bound_ctx();

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();
        let decision = bind_root_nodes(&mut tree, &mut ctx, &roots);

        assert_eq!(
            decision,
            BindingDecision::Bound {
                root_count: 4,
                keys: vec!["_r0".to_string(), "_r1".to_string()]
            }
        );
        for id in [a, b, c, d] {
            assert!(tree.has_attribute(id, BOUND));
        }
        assert_eq!(key_of(&tree, a), static_key("_r0"));
        assert_eq!(key_of(&tree, b), None);
        assert_eq!(key_of(&tree, c), static_key("_r1"));
        assert_eq!(key_of(&tree, d), static_key("mine"));
    }

    #[test]
    fn test_multiple_roots_with_id_abort() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let a = tree.append(
            root,
            Node::element("div").with_attribute("id", AttributeValue::Static("main".into())),
        );
        let b = tree.append(root, Node::element("span"));
        let mut ctx = bound_ctx();

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();
        let decision = bind_root_nodes(&mut tree, &mut ctx, &roots);

        assert_eq!(decision, BindingDecision::AmbiguousIds);
        for id in [a, b] {
            assert!(!tree.has_attribute(id, BOUND));
            assert_eq!(key_of(&tree, id), None);
        }
    }

    #[test]
    fn test_single_root_with_id_is_bound() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let a = tree.append(
            root,
            Node::element("div").with_attribute("id", AttributeValue::Static("main".into())),
        );
        let mut ctx = bound_ctx();

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();
        let decision = bind_root_nodes(&mut tree, &mut ctx, &roots);

        assert!(matches!(decision, BindingDecision::Bound { .. }));
        assert!(tree.has_attribute(a, BOUND));
    }

    #[test]
    fn test_legacy_bind_short_circuits() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let legacy = tree.append(
            root,
            Node::element("div").with_attribute("w-bind", AttributeValue::Empty),
        );
        let other = tree.append(root, Node::element("span"));
        let mut ctx = TransformContext::new("/app/index.marko", TransformOptions::default());

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();
        let decision = bind_root_nodes(&mut tree, &mut ctx, &roots);

        assert!(roots.has_legacy_explicit_bind);
        assert!(ctx.has_bound_component_for_template());
        assert_eq!(roots.root_nodes, vec![other]);
        assert_eq!(decision, BindingDecision::LegacyExplicitBind);
        assert!(!tree.has_attribute(legacy, BOUND));
        assert!(!tree.has_attribute(other, BOUND));
    }

    #[test]
    fn test_no_component_no_binding() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let div = tree.append(root, Node::element("div"));
        let mut ctx = TransformContext::new("/app/index.marko", TransformOptions::default());

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();
        let decision = bind_root_nodes(&mut tree, &mut ctx, &roots);

        assert_eq!(decision, BindingDecision::NoBoundComponent);
        assert!(!tree.has_attribute(div, BOUND));
    }

    #[test]
    fn test_no_roots_no_binding() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        tree.append(root, Node::other("text", "hello"));
        let mut ctx = bound_ctx();

        let roots = collect_root_nodes(&mut tree, &mut ctx).unwrap();
        let decision = bind_root_nodes(&mut tree, &mut ctx, &roots);

        assert_eq!(decision, BindingDecision::NoRootNodes);
    }
}
