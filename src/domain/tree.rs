//! Tree store: an immutable document plus an id index

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::entities::{Metadata, Node, TreeDocument};
use crate::domain::error::{DomainError, DomainResult};

/// What to do when two nodes share an id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateIdPolicy {
    /// The later node replaces the earlier one in the index.
    #[default]
    LastWins,
    /// Loading fails with `DuplicateNodeId`.
    Reject,
}

/// Loaded decision tree. Never mutated; a reload builds a new store.
#[derive(Debug, Clone)]
pub struct TreeStore {
    document: TreeDocument,
    index: HashMap<String, usize>,
}

impl TreeStore {
    pub fn new(document: TreeDocument, policy: DuplicateIdPolicy) -> DomainResult<Self> {
        let mut index = HashMap::with_capacity(document.nodes.len());
        for (pos, node) in document.nodes.iter().enumerate() {
            if index.insert(node.id.clone(), pos).is_some() {
                match policy {
                    DuplicateIdPolicy::Reject => {
                        return Err(DomainError::DuplicateNodeId(node.id.clone()))
                    }
                    DuplicateIdPolicy::LastWins => {
                        warn!("duplicate node id {:?}, later definition wins", node.id)
                    }
                }
            }
        }
        Ok(Self { document, index })
    }

    /// Parse JSON text and index it in one step.
    pub fn from_json(content: &str, policy: DuplicateIdPolicy) -> DomainResult<Self> {
        Self::new(TreeDocument::parse(content)?, policy)
    }

    pub fn start_node_id(&self) -> &str {
        &self.document.start_node_id
    }

    pub fn node(&self, id: &str) -> DomainResult<&Node> {
        self.index
            .get(id)
            .map(|&pos| &self.document.nodes[pos])
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn document(&self) -> &TreeDocument {
        &self.document
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.document.metadata.as_ref()
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
