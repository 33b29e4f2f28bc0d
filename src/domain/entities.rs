//! Domain entities: the decision-tree document as read from JSON

use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::{DomainError, DomainResult};

/// Identifier of a node, unique within a document (see [`DuplicateIdPolicy`]).
///
/// [`DuplicateIdPolicy`]: crate::domain::DuplicateIdPolicy
pub type NodeId = String;

/// Placeholder shown for absent metadata values.
pub const MISSING_METADATA: &str = "–";

/// A loaded decision tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeDocument {
    pub start_node_id: NodeId,
    pub nodes: Vec<Node>,
    pub metadata: Option<Metadata>,
}

/// Optional document metadata. Values are kept as raw JSON so that both
/// `"1.2"` and `1.2` display the way the author wrote them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub last_updated: Option<Value>,
}

impl Metadata {
    pub fn version_text(&self) -> String {
        display_value(self.version.as_ref())
    }

    pub fn last_updated_text(&self) -> String {
        display_value(self.last_updated.as_ref())
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_METADATA.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl TreeDocument {
    /// Parse a document from JSON text.
    ///
    /// Only the top-level shape is checked: `startNodeId` must be a non-empty
    /// string and `nodes` must be an array. Node references are not resolved
    /// here; a dangling `next` surfaces as `NodeNotFound` once it is reached.
    pub fn parse(content: &str) -> DomainResult<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| DomainError::invalid_format(format!("not valid JSON: {e}")))?;

        let start_node_id = value
            .get("startNodeId")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        let raw_nodes = value.get("nodes").and_then(Value::as_array);

        let (Some(start_node_id), Some(raw_nodes)) = (start_node_id, raw_nodes) else {
            return Err(DomainError::invalid_format(
                "expected { startNodeId, nodes[] }",
            ));
        };

        let nodes = raw_nodes
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                Node::deserialize(raw)
                    .map_err(|e| DomainError::invalid_format(format!("node #{i}: {e}")))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        // metadata is informational only; a malformed block is ignored
        let metadata = value
            .get("metadata")
            .and_then(|m| Metadata::deserialize(m).ok());

        Ok(Self {
            start_node_id: start_node_id.to_string(),
            nodes,
            metadata,
        })
    }
}

/// One unit of the decision tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

/// Discriminated node body, keyed by the JSON `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Question(QuestionNode),
    Result(ResultNode),
    /// Any other `type`. Kept so it can be rendered as a visible error.
    Unknown { node_type: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionNode {
    pub question: Option<String>,
    pub help: Option<String>,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultNode {
    pub title: Option<String>,
    pub description: Option<String>,
    pub bullets: Vec<String>,
    pub links: Vec<Link>,
}

/// A labeled choice on a question, pointing to the next node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub label: String,
    pub next: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub url: String,
}

impl Node {
    /// The `type` string as it appeared in the document.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            NodeKind::Question(_) => "question",
            NodeKind::Result(_) => "result",
            NodeKind::Unknown { node_type } => node_type,
        }
    }

    pub fn as_question(&self) -> Option<&QuestionNode> {
        match &self.kind {
            NodeKind::Question(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_result(&self) -> Option<&ResultNode> {
        match &self.kind {
            NodeKind::Result(r) => Some(r),
            _ => None,
        }
    }

    /// Ids this node points to, in answer order. Empty for non-questions.
    pub fn successors(&self) -> impl Iterator<Item = &str> {
        self.as_question()
            .into_iter()
            .flat_map(|q| q.answers.iter().map(|a| a.next.as_str()))
    }
}

/// Wire shape of a node: every variant's fields, all optional.
#[derive(Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(rename = "type")]
    node_type: Option<String>,
    question: Option<String>,
    help: Option<String>,
    answers: Option<Vec<Answer>>,
    title: Option<String>,
    description: Option<String>,
    bullets: Option<Vec<String>>,
    links: Option<Vec<Link>>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let kind = match raw.node_type.as_deref() {
            Some("question") => NodeKind::Question(QuestionNode {
                question: raw.question,
                help: raw.help,
                answers: raw.answers.unwrap_or_default(),
            }),
            Some("result") => NodeKind::Result(ResultNode {
                title: raw.title,
                description: raw.description,
                bullets: raw.bullets.unwrap_or_default(),
                links: raw.links.unwrap_or_default(),
            }),
            other => NodeKind::Unknown {
                node_type: other.unwrap_or("<missing>").to_string(),
            },
        };
        Node { id: raw.id, kind }
    }
}
