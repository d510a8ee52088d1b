//! Read-only document contract the scan pipeline runs against
//!
//! The scanner never owns a document. Everything it needs from the host
//! (tree navigation, computed style, geometry, the platform's accessibility
//! answers and frame access) goes through [`Document`]. [`PageSnapshot`] is
//! the in-memory implementation used by the command line tool and the tests.

mod loader;
pub mod snapshot;
pub mod types;

pub use loader::SnapshotError;
pub use snapshot::{ElementSpec, FrameContent, PageSnapshot, SnapshotOverlay};
pub use types::*;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::selector::{self, SelectorList};

/// Opaque handle to a node, valid within the document that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reading a frame's content was refused
#[derive(Debug, Error, PartialEq)]
pub enum FrameAccessError {
    #[error("frame {frame} is cross-origin")]
    CrossOrigin { frame: NodeId },

    #[error("node {node} is not a frame")]
    NotAFrame { node: NodeId },
}

/// The capabilities the scan pipeline needs from a rendered document.
///
/// Implementations answer from the document's *current* rendered state; no
/// method may change the tree.
pub trait Document {
    /// The root `html` element
    fn document_element(&self) -> Option<NodeId>;

    /// The `body` element
    fn body(&self) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children in tree order
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Lowercase tag name
    fn tag_name(&self, node: NodeId) -> &str;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Whether the node is attached to this document
    fn is_connected(&self, node: NodeId) -> bool;

    /// Whether the node is not rendered (itself or through an ancestor)
    fn is_hidden(&self, node: NodeId) -> bool;

    fn position(&self, node: NodeId) -> Position;

    /// Horizontal and vertical overflow
    fn overflow(&self, node: NodeId) -> (Overflow, Overflow);

    /// Whether a `[popover]` node is currently showing
    fn is_popover_open(&self, node: NodeId) -> bool;

    /// The window this document renders into; `None` when it has no view
    fn viewport(&self) -> Option<Viewport>;

    /// Border box in client (viewport) coordinates
    fn bounding_client_rect(&self, node: NodeId) -> Rect;

    /// Rendering fragments in client coordinates, one per line box or column
    fn client_rects(&self, node: NodeId) -> Vec<Rect>;

    fn scroll_size(&self, node: NodeId) -> Size;

    fn offset_size(&self, node: NodeId) -> Size;

    /// The role the platform reports for this node, if any
    fn computed_role(&self, node: NodeId) -> Option<String>;

    /// The computed accessible name, if any
    fn accessible_name(&self, node: NodeId) -> Option<String>;

    fn title(&self) -> Option<&str>;

    fn ready_state(&self) -> ReadyState;

    /// The nested document of an embedded frame.
    ///
    /// `Ok(None)` means the frame has no content window yet.
    fn frame_document(&self, frame: NodeId) -> Result<Option<&Self>, FrameAccessError>
    where
        Self: Sized;

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Whether `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// All descendants of `root` in tree order, `root` excluded
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    fn matches(&self, node: NodeId, selectors: &SelectorList) -> bool {
        selector::matches(self, node, selectors)
    }

    /// Descendants of `root` matching `selectors`, in tree order
    fn query_selector_all(&self, root: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&node| self.matches(node, selectors))
            .collect()
    }
}

/// Ancestors of `node`, nearest first
pub fn ancestors<D: Document + ?Sized>(doc: &D, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(doc.parent(node), move |&n| doc.parent(n))
}

/// Siblings before `node`, nearest first
pub fn preceding_siblings<D: Document + ?Sized>(doc: &D, node: NodeId) -> Vec<NodeId> {
    let Some(parent) = doc.parent(node) else {
        return Vec::new();
    };
    let siblings = doc.children(parent);
    match siblings.iter().position(|&n| n == node) {
        Some(index) => siblings[..index].iter().rev().copied().collect(),
        None => Vec::new(),
    }
}
