//! Display-role visibility toggles.
//!
//! The rendered page lets readers collapse rendered XML source nodes (comment
//! and CDATA display blocks) and hide documentation text wholesale. Those
//! toggles boil down to one tree operation: flip the `hidden` attribute on
//! every node carrying a display-role class. The event routing that drives
//! them in a browser is a host concern and lives outside this crate.

use crate::dom::DocTree;

/// Display-role class on collapsible source blocks.
pub const COLLAPSIBLE_CLASS: &str = "collapsible";

/// Display-role class on documentation text blocks.
pub const DOCUMENTATION_CLASS: &str = "documentation";

/// Set or clear the `hidden` attribute on every node carrying `class`.
///
/// Returns the number of nodes touched.
pub fn set_hidden_by_class(doc: &mut DocTree, class: &str, hidden: bool) -> usize {
    let nodes = doc.find_all_by_class(class);
    for &node in &nodes {
        if hidden {
            doc.set_attr(node, "hidden", "hidden");
        } else {
            doc.remove_attr(node, "hidden");
        }
    }
    nodes.len()
}

/// Expand every collapsible source block.
pub fn expand_all(doc: &mut DocTree) -> usize {
    set_hidden_by_class(doc, COLLAPSIBLE_CLASS, false)
}

/// Collapse every collapsible source block.
pub fn collapse_all(doc: &mut DocTree) -> usize {
    set_hidden_by_class(doc, COLLAPSIBLE_CLASS, true)
}

/// Show every documentation block.
pub fn show_docs(doc: &mut DocTree) -> usize {
    set_hidden_by_class(doc, DOCUMENTATION_CLASS, false)
}

/// Hide every documentation block.
pub fn hide_docs(doc: &mut DocTree) -> usize {
    set_hidden_by_class(doc, DOCUMENTATION_CLASS, true)
}
