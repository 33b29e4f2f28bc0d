//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the decision-tree rules.
/// These are independent of where the document came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid document format: {message}")]
    InvalidFormat { message: String },

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("Unknown node type: {node_type}")]
    UnknownNodeType { id: String, node_type: String },

    #[error("node is not a question: {0}")]
    NotAQuestion(String),

    #[error("no answer {answer} on node {node_id}")]
    AnswerNotFound { node_id: String, answer: String },

    #[error("breadcrumb {index} out of range (history has {len} entries)")]
    BreadcrumbOutOfRange { index: usize, len: usize },

    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),
}

impl DomainError {
    pub(crate) fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
