use std::collections::HashSet;
use std::fmt::Write;

use crate::storage::scanner::ScanOutcome;
use crate::types::{PageId, page::Page};

/// Render the decoded tree as an indented textual view.
///
/// The renderer consumes only the page index and the root id; it never
/// touches the file. An absent or zero root renders as a placeholder, and a
/// child id that does not resolve in the index is skipped, so a partially
/// decoded file still produces a best-effort view.
pub fn render_text(outcome: &ScanOutcome) -> String {
    let mut out = String::new();

    out.push_str("B+Tree Visualization\n");
    if let Some(Page::Meta(meta)) = outcome.pages.get(&1) {
        let _ = writeln!(
            out,
            "Meta: root={} order={} page_size={} version={}",
            meta.root_page, meta.order, meta.page_size, meta.version
        );
    }
    out.push('\n');

    match outcome.root {
        None | Some(0) => {
            out.push_str("(Empty tree)\n");
            return out;
        }
        Some(root) => {
            let mut visited = HashSet::new();
            render_node(outcome, root, "", true, true, &mut visited, &mut out);
        }
    }

    out
}

fn render_node(
    outcome: &ScanOutcome,
    page_id: PageId,
    prefix: &str,
    is_last: bool,
    is_root: bool,
    visited: &mut HashSet<PageId>,
    out: &mut String,
) {
    if page_id == 0 || !visited.insert(page_id) {
        return;
    }
    let Some(page) = outcome.pages.get(&page_id) else {
        return;
    };

    let connector = if is_root {
        ""
    } else if is_last {
        "`-- "
    } else {
        "+-- "
    };
    let next_prefix = format!("{}{}", prefix, if is_last { "    " } else { "|   " });

    match page {
        Page::Meta(_) => {} // shown in the banner, not as a tree node
        Page::Internal(internal) => {
            let keys = internal
                .keys
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let children = internal
                .children
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "{}{}[I {}] keys [{}] children=[{}]",
                prefix, connector, page_id, keys, children
            );
            for (i, &child_id) in internal.children.iter().enumerate() {
                let is_last_child = i == internal.children.len() - 1;
                render_node(
                    outcome,
                    child_id,
                    &next_prefix,
                    is_last_child,
                    false,
                    visited,
                    out,
                );
            }
        }
        Page::Leaf(leaf) => {
            let keys = leaf
                .keys
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let values = leaf
                .values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "{}{}[L {}] keys [{}] values [{}]",
                prefix, connector, page_id, keys, values
            );
        }
    }
}
