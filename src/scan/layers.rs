//! Modal and top-layer detection

use once_cell::sync::Lazy;

use crate::dom::{Document, NodeId};
use crate::selector::SelectorList;

/// Nodes the platform can promote to the top layer
pub static TOP_LAYER_SELECTOR: Lazy<SelectorList> = Lazy::new(|| {
    "dialog, [popover]"
        .parse::<SelectorList>()
        .expect("top-layer selector is valid")
});

/// Whether `node` is an open dialog, a showing popover, or an ARIA modal
pub fn is_active_layer<D: Document + ?Sized>(doc: &D, node: NodeId) -> bool {
    if doc.is_hidden(node) {
        return false;
    }
    if doc.tag_name(node) == "dialog" && doc.has_attribute(node, "open") {
        return true;
    }
    if doc.has_attribute(node, "popover") && doc.is_popover_open(node) {
        return true;
    }
    let aria_modal = doc.attribute(node, "aria-modal") == Some("true");
    let dialog_role = doc.attribute(node, "role").is_some_and(|r| {
        r.split_whitespace()
            .any(|t| t == "dialog" || t == "alertdialog")
    });
    aria_modal && dialog_role
}

/// Active layers strictly inside `root`, in tree order
pub fn detect_layers<D: Document + ?Sized>(doc: &D, root: NodeId) -> Vec<NodeId> {
    doc.descendants(root)
        .into_iter()
        .filter(|&n| is_active_layer(doc, n))
        .collect()
}

/// Active native top-layer nodes under `parent` that are not part of `overlay`
pub fn top_layer_roots<D: Document + ?Sized>(
    doc: &D,
    parent: NodeId,
    overlay: Option<NodeId>,
) -> Vec<NodeId> {
    doc.query_selector_all(parent, &TOP_LAYER_SELECTOR)
        .into_iter()
        .filter(|&n| !overlay.is_some_and(|o| doc.contains(o, n)))
        .filter(|&n| is_active_layer(doc, n))
        .collect()
}
