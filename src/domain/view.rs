//! View model: a pure projection of (tree, navigation) for any front-end
//!
//! The front-end draws a [`View`] and turns user input into one of the
//! [`Action`]s the view offers. Nothing here performs I/O.

use crate::domain::entities::{NodeKind, MISSING_METADATA};
use crate::domain::error::DomainError;
use crate::domain::navigator::{Breadcrumb, Navigator, START_LABEL};
use crate::domain::tree::TreeStore;

pub const DEFAULT_QUESTION: &str = "Question";
pub const DEFAULT_TITLE: &str = "Result";
pub const DEFAULT_LINK_LABEL: &str = "Link";
pub const NO_BULLETS: &str = "No to-dos listed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// `Start` followed by one label per history entry
    pub breadcrumbs: Vec<String>,
    pub back_enabled: bool,
    pub version: String,
    pub last_updated: String,
    pub body: ViewBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    Question {
        question: String,
        help: Option<String>,
        answers: Vec<String>,
    },
    Result {
        title: String,
        description: Option<String>,
        /// Empty when the node has no bullets; front-ends show [`NO_BULLETS`].
        bullets: Vec<String>,
        links: Vec<LinkView>,
        path: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub label: String,
    pub url: String,
}

/// User intent, routed back into the navigator by the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Answer(usize),
    Breadcrumb(Breadcrumb),
    Back,
    Restart,
    Reload,
    CopySummary,
    Quit,
}

/// An action with the text a front-end shows for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    pub action: Action,
    pub label: String,
}

/// Build the view for the navigator's current node.
///
/// Lookup failures and unknown node types become an error body, so a broken
/// document still renders.
pub fn render(store: &TreeStore, navigator: &Navigator) -> View {
    let body = match navigator.current_node(store) {
        Ok(node) => match &node.kind {
            NodeKind::Question(q) => ViewBody::Question {
                question: non_empty(q.question.as_deref()).unwrap_or(DEFAULT_QUESTION).to_string(),
                help: non_empty(q.help.as_deref()).map(str::to_string),
                answers: q.answers.iter().map(|a| a.label.clone()).collect(),
            },
            NodeKind::Result(r) => ViewBody::Result {
                title: non_empty(r.title.as_deref()).unwrap_or(DEFAULT_TITLE).to_string(),
                description: non_empty(r.description.as_deref()).map(str::to_string),
                bullets: r.bullets.clone(),
                links: r
                    .links
                    .iter()
                    .map(|l| LinkView {
                        label: non_empty(Some(l.label.as_str())).unwrap_or(DEFAULT_LINK_LABEL).to_string(),
                        url: l.url.clone(),
                    })
                    .collect(),
                path: navigator.path_text(),
            },
            NodeKind::Unknown { node_type } => ViewBody::Error {
                message: DomainError::UnknownNodeType {
                    id: node.id.clone(),
                    node_type: node_type.clone(),
                }
                .to_string(),
            },
        },
        Err(e) => ViewBody::Error {
            message: e.to_string(),
        },
    };

    let (version, last_updated) = store
        .metadata()
        .map(|m| (m.version_text(), m.last_updated_text()))
        .unwrap_or_else(|| (MISSING_METADATA.to_string(), MISSING_METADATA.to_string()));

    View {
        breadcrumbs: navigator.breadcrumbs().into_iter().map(str::to_string).collect(),
        back_enabled: navigator.can_go_back(),
        version,
        last_updated,
        body,
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

impl View {
    /// Actions offered for this view, answers first.
    pub fn actions(&self) -> Vec<ActionItem> {
        let mut items = Vec::new();

        if let ViewBody::Question { answers, .. } = &self.body {
            items.extend(answers.iter().enumerate().map(|(i, label)| ActionItem {
                action: Action::Answer(i),
                label: label.clone(),
            }));
        }

        if self.back_enabled {
            items.push(ActionItem {
                action: Action::Back,
                label: "← Back".to_string(),
            });
        }

        // the last crumb is where we are; jumping there would be a no-op
        let crumbs = self.breadcrumbs.len().saturating_sub(1);
        for (i, label) in self.breadcrumbs.iter().take(crumbs).enumerate() {
            let crumb = match i {
                0 => Breadcrumb::Start,
                n => Breadcrumb::Step(n - 1),
            };
            let label = if i == 0 {
                format!("↩ {START_LABEL}")
            } else {
                format!("↩ {} ({})", label, i)
            };
            items.push(ActionItem {
                action: Action::Breadcrumb(crumb),
                label,
            });
        }

        items.extend([
            ActionItem {
                action: Action::Restart,
                label: "⟲ Restart".to_string(),
            },
            ActionItem {
                action: Action::Reload,
                label: "⟳ Reload document".to_string(),
            },
            ActionItem {
                action: Action::CopySummary,
                label: "⎘ Copy summary".to_string(),
            },
            ActionItem {
                action: Action::Quit,
                label: "✕ Quit".to_string(),
            },
        ]);
        items
    }
}
