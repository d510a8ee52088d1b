//! Geometry resolution: anchor-relative positions, clipping and fragments
//!
//! Three coordinate spaces meet here. The document reports client
//! coordinates; adding the window scroll gives page coordinates, which is
//! where clipping happens; subtracting the page position of the scan root's
//! position anchor gives the absolute coordinates stored in results.

use tracing::trace;

use super::types::FragmentRect;
use crate::dom::{ancestors, Document, NodeId, Rect, Viewport};

/// Where a node ended up, or `None` from [`GeometryResolver::resolve`]
/// when it is clipped away
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub absolute_x: f64,
    pub absolute_y: f64,
    pub width: f64,
    pub height: f64,
    pub rects: Vec<FragmentRect>,
}

/// Per-root geometry state, resolved once per scan pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryResolver {
    viewport: Viewport,
    offset_x: f64,
    offset_y: f64,
}

impl GeometryResolver {
    /// Resolve the position anchor of `root` and capture the viewport
    pub fn for_root<D: Document + ?Sized>(doc: &D, root: NodeId, viewport: Viewport) -> Self {
        let (offset_x, offset_y) = match position_anchor(doc, root) {
            Some(anchor) => {
                let page = page_rect(doc, anchor, &viewport);
                (page.x, page.y)
            }
            None => (0.0, 0.0),
        };
        Self {
            viewport,
            offset_x,
            offset_y,
        }
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Measure `node`, returning `None` when it lies outside the visible
    /// window or outside its scroll anchor's box
    pub fn resolve<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> Option<Geometry> {
        let client = doc.bounding_client_rect(node);
        let page = client.translate(self.viewport.scroll_x, self.viewport.scroll_y);

        if !page.touches(&self.viewport.visible_window()) {
            trace!(%node, "outside the visible window");
            return None;
        }
        if let Some(anchor) = scroll_anchor(doc, node) {
            if !page.touches(&page_rect(doc, anchor, &self.viewport)) {
                trace!(%node, %anchor, "scrolled out of its container");
                return None;
            }
        }

        let rects = doc
            .client_rects(node)
            .into_iter()
            .filter(|r| !r.is_empty())
            .map(|r| FragmentRect {
                relative_x: r.x - client.x,
                relative_y: r.y - client.y,
                width: r.width,
                height: r.height,
            })
            .collect();

        Some(Geometry {
            absolute_x: page.x - self.offset_x,
            absolute_y: page.y - self.offset_y,
            width: client.width,
            height: client.height,
            rects,
        })
    }
}

/// Nearest node, `root` included, that starts a positioning context.
/// The document element never counts.
pub fn position_anchor<D: Document + ?Sized>(doc: &D, root: NodeId) -> Option<NodeId> {
    let html = doc.document_element();
    std::iter::once(root)
        .chain(ancestors(doc, root))
        .take_while(|&n| Some(n) != html)
        .find(|&n| doc.position(n).establishes_context())
}

/// Nearest ancestor below `body` that scrolls its own content
pub fn scroll_anchor<D: Document + ?Sized>(doc: &D, node: NodeId) -> Option<NodeId> {
    let (html, body) = (doc.document_element(), doc.body());
    ancestors(doc, node)
        .take_while(|&n| Some(n) != html && Some(n) != body)
        .find(|&n| {
            let (x, y) = doc.overflow(n);
            x.scrolls() || y.scrolls()
        })
}

fn page_rect<D: Document + ?Sized>(doc: &D, node: NodeId, viewport: &Viewport) -> Rect {
    doc.bounding_client_rect(node)
        .translate(viewport.scroll_x, viewport.scroll_y)
}
