use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ir::NodeId;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_CLASS_SYNTAX: &str = "SFC-ERR-CLASS-SYNTAX";
pub const ERR_CLASS_EXTENDS: &str = "SFC-ERR-CLASS-EXTENDS";
pub const ERR_STYLE_ATTRIBUTE: &str = "SFC-ERR-STYLE-ATTRIBUTE";
pub const ERR_INLINE_AND_EXTERNAL: &str = "SFC-ERR-INLINE-AND-EXTERNAL";

fn get_rule(code: &str) -> &'static str {
    match code {
        ERR_CLASS_SYNTAX => "An inline component class must be a valid class expression.",
        ERR_CLASS_EXTENDS => "Component behavior objects are flat; a component class cannot extend another class.",
        ERR_STYLE_ATTRIBUTE => "A component style block only accepts a `class` attribute naming its language.",
        ERR_INLINE_AND_EXTERNAL => {
            "A component is implemented either inline or in a sibling component file, never both."
        }
        _ => "Unknown rule.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// A recoverable diagnostic. The pass reports it and keeps walking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerError {
    pub code: String,
    pub message: String,
    pub rule: String,
    pub file: String,
    /// Absolute byte offset in the document
    pub pos: u32,
    /// Set when the diagnostic is attached to a node as a whole
    pub node: Option<NodeId>,
}

impl CompilerError {
    pub fn at_node(code: &str, message: &str, file: &str, node: NodeId, node_pos: u32) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            rule: get_rule(code).to_string(),
            file: file.to_string(),
            pos: node_pos,
            node: Some(node),
        }
    }

    pub fn at_pos(code: &str, message: &str, file: &str, pos: u32) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            rule: get_rule(code).to_string(),
            file: file.to_string(),
            pos,
            node: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FATAL ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Conditions that abort the whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    NonMethodMember {
        member: String,
    },
    UnsupportedMember {
        member: String,
        reason: String,
    },
    DirectoryRead {
        path: String,
        message: String,
    },
    InvalidPattern {
        pattern: String,
        message: String,
    },
    DuplicateInlineComponent {
        existing: String,
    },
    InvalidInput {
        message: String,
    },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonMethodMember { member } => write!(
                f,
                "Only methods are allowed on single file component class definitions (found {})",
                member
            ),
            Self::UnsupportedMember { member, reason } => {
                write!(f, "Unsupported component class member '{}': {}", member, reason)
            }
            Self::DirectoryRead { path, message } => {
                write!(f, "Failed to read directory '{}': {}", path, message)
            }
            Self::InvalidPattern { pattern, message } => {
                write!(f, "Invalid sibling file pattern '{}': {}", pattern, message)
            }
            Self::DuplicateInlineComponent { existing } => write!(
                f,
                "An inline component module is already registered for this template ({})",
                existing
            ),
            Self::InvalidInput { message } => write!(f, "Invalid transform input: {}", message),
        }
    }
}

impl std::error::Error for TransformError {}

/// What a sub-step did with the node it was handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    Skipped,
    /// A diagnostic was reported and the node was left alone
    Diagnosed,
}
