//! Domain layer: decision-tree entities and the navigation state machine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod navigator;
pub mod summary;
pub mod tree;
pub mod view;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use navigator::{Breadcrumb, HistoryEntry, NavigationState, Navigator};
pub use summary::{build_summary_text, DEFAULT_SUMMARY_HEADER};
pub use tree::{DuplicateIdPolicy, TreeStore};
pub use view::{render, Action, ActionItem, LinkView, View, ViewBody};
