//! Outline of the question graph for `show`

use std::collections::HashSet;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{Node, NodeKind, TreeStore};

fn node_label(node: &Node) -> String {
    match &node.kind {
        NodeKind::Question(q) => format!(
            "{}: {}",
            node.id,
            q.question.as_deref().unwrap_or("(no question)")
        ),
        NodeKind::Result(r) => format!(
            "{} ⇒ {}",
            node.id,
            r.title.as_deref().unwrap_or("(no title)")
        ),
        NodeKind::Unknown { node_type } => {
            format!("{} (unknown type: {})", node.id, node_type)
        }
    }
}

fn build(store: &TreeStore, id: &str, prefix: String, expanded: &mut HashSet<String>) -> Tree<String> {
    let node = match store.node(id) {
        Ok(node) => node,
        Err(_) => return Tree::new(format!("{prefix}{id} (missing)")),
    };
    if !expanded.insert(id.to_string()) {
        return Tree::new(format!("{prefix}{id} (see above)"));
    }

    let mut tree = Tree::new(format!("{prefix}{}", node_label(node)));
    if let Some(q) = node.as_question() {
        for answer in &q.answers {
            let child = build(store, &answer.next, format!("[{}] ", answer.label), expanded);
            tree.push(child);
        }
    }
    tree
}

/// Every node reachable from the start node, expanded once.
///
/// Cycles and shared targets print as `(see above)` on revisit; dangling
/// `next` ids print as `(missing)`.
#[instrument(level = "debug", skip(store))]
pub fn outline(store: &TreeStore) -> Tree<String> {
    let mut expanded = HashSet::new();
    build(store, store.start_node_id(), String::new(), &mut expanded)
}

/// Ids of indexed nodes that no path from the start node reaches, in
/// document order.
pub fn unreachable(store: &TreeStore) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut stack = vec![store.start_node_id().to_string()];
    while let Some(id) = stack.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Ok(node) = store.node(&id) {
            stack.extend(node.successors().map(str::to_string));
        }
    }

    let mut reported = HashSet::new();
    store
        .document()
        .nodes
        .iter()
        .map(|n| n.id.clone())
        .filter(|id| !seen.contains(id) && reported.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DuplicateIdPolicy;

    fn store(json: &str) -> TreeStore {
        TreeStore::from_json(json, DuplicateIdPolicy::LastWins).unwrap()
    }

    #[test]
    fn given_shared_target_when_outlining_then_second_visit_refers_back() {
        let s = store(
            r#"{"startNodeId":"q1","nodes":[
                {"id":"q1","type":"question","question":"Ok?","answers":[
                    {"label":"Yes","next":"r1"},{"label":"No","next":"r1"}]},
                {"id":"r1","type":"result","title":"Done"}]}"#,
        );

        let text = outline(&s).to_string();

        assert!(text.starts_with("q1: Ok?"));
        assert!(text.contains("[Yes] r1 ⇒ Done"));
        assert!(text.contains("[No] r1 (see above)"));
    }

    #[test]
    fn given_cycle_and_dangling_next_when_outlining_then_terminates_with_markers() {
        let s = store(
            r#"{"startNodeId":"a","nodes":[
                {"id":"a","type":"question","question":"A?","answers":[
                    {"label":"Loop","next":"a"},{"label":"Gone","next":"zz"}]}]}"#,
        );

        let text = outline(&s).to_string();

        assert!(text.contains("[Loop] a (see above)"));
        assert!(text.contains("[Gone] zz (missing)"));
    }

    #[test]
    fn given_unknown_type_when_outlining_then_type_is_shown() {
        let s = store(r#"{"startNodeId":"x","nodes":[{"id":"x","type":"info"}]}"#);

        assert_eq!(outline(&s).root, "x (unknown type: info)");
    }

    #[test]
    fn given_orphan_node_when_checking_reachability_then_reported() {
        let s = store(
            r#"{"startNodeId":"r1","nodes":[
                {"id":"r1","type":"result"},
                {"id":"orphan","type":"result"}]}"#,
        );

        assert_eq!(unreachable(&s), vec!["orphan".to_string()]);
    }
}
