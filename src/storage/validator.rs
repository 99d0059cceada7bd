use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::scanner::ScanOutcome;
use crate::types::{PageId, page::Page};

/// One structural violation found while walking the decoded tree. Findings
/// are diagnostics, never errors: a file full of violations still validates
/// to completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Finding {
    /// An internal page references a child id that is absent from the index.
    /// Child id 0 always lands here: 0 is reserved to mean "no page" and a
    /// well-formed writer never emits it as a real reference.
    MissingChild { page_id: PageId, child_id: PageId },

    /// Counts or links on a page violate a B+Tree invariant.
    StructuralMismatch { page_id: PageId, detail: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MissingChild { page_id, child_id } => {
                write!(f, "page {} references missing child {}", page_id, child_id)
            }
            Finding::StructuralMismatch { page_id, detail } => {
                write!(f, "page {}: {}", page_id, detail)
            }
        }
    }
}

/// Walk the tree from the root and collect invariant violations.
///
/// The visited set makes cyclic corruption terminate instead of recursing
/// forever; the worklist keeps the walk iterative.
pub fn validate(outcome: &ScanOutcome) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Some(root) = outcome.root else {
        return findings;
    };
    if root == 0 {
        // empty tree
        return findings;
    }

    if !outcome.pages.contains_key(&root) {
        findings.push(Finding::StructuralMismatch {
            page_id: root,
            detail: "root page is absent from the index".to_string(),
        });
        return findings;
    }

    let mut visited: HashSet<PageId> = HashSet::new();
    let mut worklist = vec![root];

    while let Some(page_id) = worklist.pop() {
        if !visited.insert(page_id) {
            continue;
        }
        let Some(page) = outcome.pages.get(&page_id) else {
            continue; // absence was reported at the referencing edge
        };

        if page.header().page_id != page_id {
            findings.push(Finding::StructuralMismatch {
                page_id,
                detail: format!(
                    "header claims page id {} in slot {}",
                    page.header().page_id,
                    page_id
                ),
            });
        }

        match page {
            Page::Meta(_) => {} // the meta page is configuration, not a tree node
            Page::Internal(internal) => {
                if internal.children.len() != internal.keys.len() + 1 {
                    findings.push(Finding::StructuralMismatch {
                        page_id,
                        detail: format!(
                            "{} children for {} keys",
                            internal.children.len(),
                            internal.keys.len()
                        ),
                    });
                }
                for &child_id in &internal.children {
                    if child_id == 0 || !outcome.pages.contains_key(&child_id) {
                        findings.push(Finding::MissingChild { page_id, child_id });
                    } else {
                        worklist.push(child_id);
                    }
                }
            }
            Page::Leaf(leaf) => {
                if leaf.keys.len() != leaf.values.len() {
                    findings.push(Finding::StructuralMismatch {
                        page_id,
                        detail: format!(
                            "{} keys but {} values",
                            leaf.keys.len(),
                            leaf.values.len()
                        ),
                    });
                }
                check_sibling_links(outcome, page_id, leaf.header.next_page, true, &mut findings);
                check_sibling_links(outcome, page_id, leaf.header.prev_page, false, &mut findings);
            }
        }
    }

    findings
}

/// Leaf sibling links must be mutually consistent: following `next` and then
/// `prev` (or the reverse) must land back on the starting leaf. Checked only
/// when the sibling is present in the index.
fn check_sibling_links(
    outcome: &ScanOutcome,
    page_id: PageId,
    sibling: Option<PageId>,
    forward: bool,
    findings: &mut Vec<Finding>,
) {
    let Some(sibling_id) = sibling else { return };
    let Some(Page::Leaf(sibling_leaf)) = outcome.pages.get(&sibling_id) else {
        return;
    };
    let back_link = if forward {
        sibling_leaf.header.prev_page
    } else {
        sibling_leaf.header.next_page
    };
    if back_link != Some(page_id) {
        let direction = if forward { "next" } else { "prev" };
        findings.push(Finding::StructuralMismatch {
            page_id,
            detail: format!(
                "{} sibling {} does not link back (found {:?})",
                direction, sibling_id, back_link
            ),
        });
    }
}
