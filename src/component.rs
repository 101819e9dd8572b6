//! Inline component classes.
//!
//! A template may declare its behavior in place:
//!
//! ```text
//! class {
//!     constructor() { this.state = { count: 0 } }
//!     increment() { this.state.count++ }
//! }
//! ```
//!
//! The block is parsed with Oxc, rewritten into a plain behavior object
//! (`constructor` becomes the create hook), pooled as a module-level constant
//! and registered as the document's component implementation.

use oxc_allocator::Allocator;
use oxc_ast::ast::{ClassElement, Expression, MethodDefinition, MethodDefinitionKind, PropertyKey, Statement};
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};

use crate::context::{ModuleDescriptor, TransformContext};
use crate::ir::{NodeId, TemplateTree};
use crate::validate::{
    StepOutcome, TransformError, ERR_CLASS_EXTENDS, ERR_CLASS_SYNTAX, ERR_INLINE_AND_EXTERNAL,
};

const CLASS_WRAPPER_PREFIX: &str = "(";
const CLASS_WRAPPER_SUFFIX: &str = "\n)";

const EXTENDS_MESSAGE: &str = "A component class is not allowed to use `extends`. See: https://github.com/marko-js/marko/wiki/Error:-Component-class-with-extends";

#[derive(Debug, Clone, PartialEq)]
pub enum ClassConversionError {
    /// `offset` is relative to the start of the class source
    Syntax {
        message: String,
        offset: Option<u32>,
    },
    Extends,
    Fatal(TransformError),
}

impl From<TransformError> for ClassConversionError {
    fn from(err: TransformError) -> Self {
        Self::Fatal(err)
    }
}

/// Convert the source of an inline `class { ... }` block into the source of
/// an equivalent object literal.
pub fn class_to_object_source(
    class_source: &str,
    create_hook: &str,
) -> Result<String, ClassConversionError> {
    let wrapped = format!("{}{}{}", CLASS_WRAPPER_PREFIX, class_source, CLASS_WRAPPER_SUFFIX);

    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true);
    let ret = Parser::new(&allocator, &wrapped, source_type).parse();

    if let Some(err) = ret.errors.first() {
        let offset = err
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| {
                let relative = label.offset().saturating_sub(CLASS_WRAPPER_PREFIX.len());
                relative.min(class_source.len()) as u32
            });
        return Err(ClassConversionError::Syntax {
            message: err.to_string(),
            offset,
        });
    }

    let class = match ret.program.body.first() {
        Some(Statement::ExpressionStatement(stmt)) => match unwrap_parens(&stmt.expression) {
            Expression::ClassExpression(class) => class,
            _ => return Err(not_a_class()),
        },
        _ => return Err(not_a_class()),
    };

    if class.super_class.is_some() {
        return Err(ClassConversionError::Extends);
    }

    let mut entries = Vec::with_capacity(class.body.body.len());
    for element in &class.body.body {
        let ClassElement::MethodDefinition(method) = element else {
            return Err(TransformError::NonMethodMember {
                member: describe_member(&wrapped, element),
            }
            .into());
        };
        entries.push(method_entry(&wrapped, method, create_hook)?);
    }

    let object_source = if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{\n{}\n}}", entries.join(",\n"))
    };
    serialize_object(&object_source)
}

/// Handle an inline `class` node found during the root walk.
pub fn convert_inline_class(
    tree: &mut TemplateTree,
    id: NodeId,
    ctx: &mut TransformContext,
) -> Result<StepOutcome, TransformError> {
    let node = tree.node(id);
    let pos = node.pos;
    let class_source = node.tag_string.clone().unwrap_or_default();

    let object_source = match class_to_object_source(&class_source, &ctx.options.create_hook_name)
    {
        Ok(source) => source,
        Err(ClassConversionError::Syntax { message, offset }) => {
            let message = format!(
                "Unable to parse JavaScript for component class. Error: {}",
                message
            );
            match offset {
                Some(offset) => {
                    ctx.add_pos_error(ERR_CLASS_SYNTAX, &message, pos.saturating_add(offset))
                }
                None => ctx.add_node_error(ERR_CLASS_SYNTAX, &message, id, pos),
            }
            return Ok(StepOutcome::Diagnosed);
        }
        Err(ClassConversionError::Extends) => {
            ctx.add_node_error(ERR_CLASS_EXTENDS, EXTENDS_MESSAGE, id, pos);
            return Ok(StepOutcome::Diagnosed);
        }
        Err(ClassConversionError::Fatal(err)) => return Err(err),
    };

    if let Some(existing) = ctx.renderer_module() {
        let message = format!(
            "The component has both an inline component `class` and a separate `{}`. This is not allowed. See: https://github.com/marko-js/marko/wiki/Error:-Component-inline-and-external",
            display_name(existing)
        );
        ctx.add_node_error(ERR_INLINE_AND_EXTERNAL, &message, id, pos);
        return Ok(StepOutcome::Diagnosed);
    }

    let constant_name = ctx.options.component_constant_name.clone();
    let inline_id = ctx.add_static_var(&constant_name, object_source);
    let module = ModuleDescriptor::Inline {
        inline_id,
        filename: ctx.filename.to_string_lossy().to_string(),
        require_path: format!("./{}", ctx.file_basename()),
    };

    if ctx.component_module().is_none() {
        ctx.set_component_module(module.clone())?;
    }
    ctx.set_renderer_module(module);

    tree.detach(id);
    Ok(StepOutcome::Applied)
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn not_a_class() -> ClassConversionError {
    ClassConversionError::Syntax {
        message: "Expected a class expression".to_string(),
        offset: None,
    }
}

fn unwrap_parens<'e, 'a>(mut expr: &'e Expression<'a>) -> &'e Expression<'a> {
    while let Expression::ParenthesizedExpression(paren) = expr {
        expr = &paren.expression;
    }
    expr
}

fn text(source: &str, span: Span) -> &str {
    &source[span.start as usize..span.end as usize]
}

fn describe_member(source: &str, element: &ClassElement) -> String {
    match element {
        ClassElement::PropertyDefinition(prop) => {
            format!("field `{}`", text(source, prop.key.span()))
        }
        ClassElement::AccessorProperty(prop) => {
            format!("accessor field `{}`", text(source, prop.key.span()))
        }
        ClassElement::StaticBlock(_) => "static block".to_string(),
        _ => format!("`{}`", text(source, element.span()).lines().next().unwrap_or("")),
    }
}

fn method_entry(
    source: &str,
    method: &MethodDefinition,
    create_hook: &str,
) -> Result<String, ClassConversionError> {
    let key_text = text(source, method.key.span());
    if matches!(method.key, PropertyKey::PrivateIdentifier(_)) {
        return Err(TransformError::UnsupportedMember {
            member: key_text.to_string(),
            reason: "private members cannot be expressed on a plain object".to_string(),
        }
        .into());
    }

    let key = match method.kind {
        MethodDefinitionKind::Constructor => create_hook.to_string(),
        _ if method.computed => format!("[{}]", key_text),
        _ => key_text.to_string(),
    };

    let function = &method.value;
    let params = text(source, function.params.span).trim();
    let params = if params.starts_with('(') {
        params.to_string()
    } else {
        format!("({})", params)
    };
    let body = function
        .body
        .as_ref()
        .map_or("{}", |body| text(source, body.span));

    let entry = match method.kind {
        MethodDefinitionKind::Get => format!("get {}{} {}", key, params, body),
        MethodDefinitionKind::Set => format!("set {}{} {}", key, params, body),
        MethodDefinitionKind::Constructor | MethodDefinitionKind::Method => format!(
            "{}{}{}{} {}",
            if function.r#async { "async " } else { "" },
            if function.generator { "*" } else { "" },
            key,
            params,
            body
        ),
    };
    Ok(entry)
}

/// Round-trip the object literal through the parser and code generator.
fn serialize_object(object_source: &str) -> Result<String, ClassConversionError> {
    let wrapped = format!("({})", object_source);

    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true);
    let ret = Parser::new(&allocator, &wrapped, source_type).parse();
    if let Some(err) = ret.errors.first() {
        return Err(ClassConversionError::Syntax {
            message: err.to_string(),
            offset: None,
        });
    }

    let code = Codegen::new().build(&ret.program).code;
    let code = code.trim().trim_end_matches(';').trim();
    let code = match code.strip_prefix('(').and_then(|c| c.strip_suffix(')')) {
        Some(inner) => inner.trim(),
        None => code,
    };
    Ok(code.to_string())
}

fn display_name(module: &ModuleDescriptor) -> String {
    let filename = module.filename();
    std::path::Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string())
}
