use crate::context::{Dependency, StyleDependency, TransformContext};
use crate::ir::{AttributeValue, NodeId, TemplateTree};
use crate::validate::{StepOutcome, ERR_STYLE_ATTRIBUTE};

const DEFAULT_STYLE_LANGUAGE: &str = "css";

/// Pull a `<style class="lang">{ ... }</style>` block out of the template and
/// register it as its own style dependency.
///
/// Plain `<style>` elements with static body text are left in place.
pub fn extract_style_block(
    tree: &mut TemplateTree,
    id: NodeId,
    ctx: &mut TransformContext,
) -> StepOutcome {
    let node = tree.node(id);
    if node.body_text.as_deref().is_some_and(|text| !text.is_empty()) {
        return StepOutcome::Skipped;
    }

    let mut style_code: Option<&str> = None;
    let mut language: &str = DEFAULT_STYLE_LANGUAGE;
    let mut has_style_block = false;

    for attr in node.attributes.iter().rev() {
        if attr.is_expression_block() {
            has_style_block = true;
            style_code = Some(strip_braces(&attr.name));
        } else if attr.name == "class" {
            match &attr.value {
                AttributeValue::Static(lang) => language = lang.as_str(),
                _ => return StepOutcome::Skipped,
            }
        } else if has_style_block {
            let message = format!(
                "Unsupported attribute on the component style tag: {}",
                attr.name
            );
            let pos = node.pos;
            ctx.add_node_error(ERR_STYLE_ATTRIBUTE, &message, id, pos);
            return StepOutcome::Diagnosed;
        }
    }

    let Some(code) = style_code else {
        return StepOutcome::Skipped;
    };

    let basename = ctx.file_basename();
    let dependency = StyleDependency {
        language: language.to_string(),
        code: code.trim().to_string(),
        virtual_path: format!("./{}.{}", basename, language),
        path: format!("./{}", basename),
    };
    tracing::trace!(virtual_path = %dependency.virtual_path, "extracted style block");

    ctx.add_dependency(Dependency::Style(dependency));
    tree.detach(id);
    StepOutcome::Applied
}

fn strip_braces(name: &str) -> &str {
    let inner = name.strip_prefix('{').unwrap_or(name);
    inner.strip_suffix('}').unwrap_or(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Node;
    use crate::transform::TransformOptions;

    fn ctx() -> TransformContext {
        TransformContext::new("/app/index.marko", TransformOptions::default())
    }

    #[test]
    fn test_less_block_is_extracted() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let style = tree.append(
            root,
            Node::element("style")
                .with_attribute("class", AttributeValue::Static("less".into()))
                .with_attribute("{\n  .a { color: red; }\n}", AttributeValue::Empty),
        );
        let mut ctx = ctx();

        assert_eq!(extract_style_block(&mut tree, style, &mut ctx), StepOutcome::Applied);

        assert_eq!(
            ctx.dependencies(),
            &[Dependency::Style(StyleDependency {
                language: "less".to_string(),
                code: ".a { color: red; }".to_string(),
                virtual_path: "./index.marko.less".to_string(),
                path: "./index.marko".to_string(),
            })]
        );
        assert!(tree.is_detached(style));
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_static_body_is_left_alone() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let style = tree.append(root, Node::element("style").with_body_text(".a{}"));
        let mut ctx = ctx();

        assert_eq!(extract_style_block(&mut tree, style, &mut ctx), StepOutcome::Skipped);
        assert!(ctx.dependencies().is_empty());
        assert!(!tree.is_detached(style));
    }

    #[test]
    fn test_extra_attribute_before_block_is_reported() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let style = tree.append(
            root,
            Node::element("style")
                .with_attribute("media", AttributeValue::Static("print".into()))
                .with_attribute("{ .a {} }", AttributeValue::Empty)
                .with_pos(40),
        );
        let mut ctx = ctx();

        assert_eq!(extract_style_block(&mut tree, style, &mut ctx), StepOutcome::Diagnosed);

        let diagnostics = ctx.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ERR_STYLE_ATTRIBUTE);
        assert_eq!(diagnostics[0].node, Some(style));
        assert_eq!(diagnostics[0].pos, 40);
        assert!(diagnostics[0].message.ends_with("media"));
        assert!(ctx.dependencies().is_empty());
        assert!(!tree.is_detached(style));
    }

    #[test]
    fn test_dynamic_class_is_a_no_op() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let style = tree.append(
            root,
            Node::element("style")
                .with_attribute("class", AttributeValue::Dynamic("lang".into()))
                .with_attribute("{ .a {} }", AttributeValue::Empty),
        );
        let mut ctx = ctx();

        assert_eq!(extract_style_block(&mut tree, style, &mut ctx), StepOutcome::Skipped);
        assert!(ctx.dependencies().is_empty());
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_default_language_is_css() {
        let mut tree = TemplateTree::new();
        let root = tree.root();
        let style = tree.append(
            root,
            Node::element("style").with_attribute("{ .b { margin: 0 } }", AttributeValue::Empty),
        );
        let mut ctx = ctx();

        extract_style_block(&mut tree, style, &mut ctx);

        let Dependency::Style(dep) = &ctx.dependencies()[0] else {
            panic!("expected a style dependency");
        };
        assert_eq!(dep.language, "css");
        assert_eq!(dep.code, ".b { margin: 0 }");
        assert_eq!(dep.virtual_path, "./index.marko.css");
    }
}
