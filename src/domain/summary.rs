//! Plain-text transcript of a session

use crate::domain::error::DomainResult;
use crate::domain::navigator::Navigator;
use crate::domain::tree::TreeStore;
use crate::domain::view::{DEFAULT_LINK_LABEL, DEFAULT_TITLE};

pub const DEFAULT_SUMMARY_HEADER: &str = "TheraMatch – Summary";

/// Header, path, and for a result node: blank line, title, `- bullet` lines
/// and `label: url` lines.
pub fn build_summary_text(
    header: &str,
    store: &TreeStore,
    navigator: &Navigator,
) -> DomainResult<String> {
    let mut lines = vec![header.to_string(), navigator.path_text()];

    let node = navigator.current_node(store)?;
    if let Some(result) = node.as_result() {
        lines.push(String::new());
        lines.push(
            result
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
        );
        lines.extend(result.bullets.iter().map(|b| format!("- {b}")));
        lines.extend(result.links.iter().map(|l| {
            let label = if l.label.is_empty() { DEFAULT_LINK_LABEL } else { l.label.as_str() };
            format!("{label}: {}", l.url)
        }));
    }

    Ok(lines.join("\n"))
}
