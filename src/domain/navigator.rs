//! Navigation state machine: current node, answer history, breadcrumbs
//!
//! Invariant: `history` is a chain. Each entry's `next_node_id` is the node the
//! following entry's answer was given at, and `current_node_id` is the last
//! entry's `next_node_id` (or the start node when history is empty).

use itertools::Itertools;
use tracing::debug;

use crate::domain::entities::{Answer, Node, NodeId};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::TreeStore;

/// Label of the root breadcrumb.
pub const START_LABEL: &str = "Start";

/// Separator between breadcrumb labels in path text.
pub const PATH_SEPARATOR: &str = " > ";

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Node the answer was given at
    pub node_id: NodeId,
    pub answer_label: String,
    /// Node reached by the answer
    pub next_node_id: NodeId,
}

/// Target of a breadcrumb jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breadcrumb {
    /// Back to the start node with empty history
    Start,
    /// The node reached by `history[i]`
    Step(usize),
}

/// Current position and how we got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current_node_id: NodeId,
    history: Vec<HistoryEntry>,
}

impl NavigationState {
    pub fn current_node_id(&self) -> &str {
        &self.current_node_id
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

/// Drives a [`NavigationState`] over one tree.
#[derive(Debug, Clone)]
pub struct Navigator {
    start_node_id: NodeId,
    state: NavigationState,
}

impl Navigator {
    /// Fresh navigator positioned on the store's start node.
    pub fn new(store: &TreeStore) -> Self {
        let start_node_id = store.start_node_id().to_string();
        Self {
            state: NavigationState {
                current_node_id: start_node_id.clone(),
                history: Vec::new(),
            },
            start_node_id,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_node_id(&self) -> &str {
        &self.state.current_node_id
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    pub fn can_go_back(&self) -> bool {
        !self.state.history.is_empty()
    }

    pub fn current_node<'a>(&self, store: &'a TreeStore) -> DomainResult<&'a Node> {
        store.node(&self.state.current_node_id)
    }

    /// Answer the current question with its `index`-th answer.
    pub fn select_answer(&mut self, store: &TreeStore, index: usize) -> DomainResult<()> {
        let node = self.current_node(store)?;
        let question = node
            .as_question()
            .ok_or_else(|| DomainError::NotAQuestion(node.id.clone()))?;
        let answer = question
            .answers
            .get(index)
            .ok_or_else(|| DomainError::AnswerNotFound {
                node_id: node.id.clone(),
                answer: format!("#{index}"),
            })?;
        self.push(&node.id, answer);
        Ok(())
    }

    /// Answer the current question with the first answer labeled `label`.
    pub fn select_answer_by_label(&mut self, store: &TreeStore, label: &str) -> DomainResult<()> {
        let node = self.current_node(store)?;
        let question = node
            .as_question()
            .ok_or_else(|| DomainError::NotAQuestion(node.id.clone()))?;
        let answer = question
            .answers
            .iter()
            .find(|a| a.label == label)
            .ok_or_else(|| DomainError::AnswerNotFound {
                node_id: node.id.clone(),
                answer: format!("{label:?}"),
            })?;
        self.push(&node.id, answer);
        Ok(())
    }

    fn push(&mut self, node_id: &str, answer: &Answer) {
        debug!("select {:?} at {} -> {}", answer.label, node_id, answer.next);
        self.state.history.push(HistoryEntry {
            node_id: node_id.to_string(),
            answer_label: answer.label.clone(),
            next_node_id: answer.next.clone(),
        });
        self.state.current_node_id = answer.next.clone();
    }

    /// Undo the last answer. Returns false when there was nothing to undo.
    pub fn go_back(&mut self) -> bool {
        if self.state.history.pop().is_none() {
            return false;
        }
        self.state.current_node_id = self
            .state
            .history
            .last()
            .map(|h| h.next_node_id.clone())
            .unwrap_or_else(|| self.start_node_id.clone());
        debug!("back to {}", self.state.current_node_id);
        true
    }

    pub fn jump_to_breadcrumb(&mut self, crumb: Breadcrumb) -> DomainResult<()> {
        match crumb {
            Breadcrumb::Start => self.restart(),
            Breadcrumb::Step(index) => {
                let len = self.state.history.len();
                let entry = self
                    .state
                    .history
                    .get(index)
                    .ok_or(DomainError::BreadcrumbOutOfRange { index, len })?;
                self.state.current_node_id = entry.next_node_id.clone();
                self.state.history.truncate(index + 1);
                debug!("jump to step {} ({})", index, self.state.current_node_id);
            }
        }
        Ok(())
    }

    pub fn restart(&mut self) {
        self.state.history.clear();
        self.state.current_node_id = self.start_node_id.clone();
        debug!("restart at {}", self.start_node_id);
    }

    /// Breadcrumb labels, starting with [`START_LABEL`].
    pub fn breadcrumbs(&self) -> Vec<&str> {
        std::iter::once(START_LABEL)
            .chain(self.state.history.iter().map(|h| h.answer_label.as_str()))
            .collect()
    }

    /// `"Start > label1 > label2"`
    pub fn path_text(&self) -> String {
        self.breadcrumbs().into_iter().join(PATH_SEPARATOR)
    }
}
