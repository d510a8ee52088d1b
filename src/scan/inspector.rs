//! Composed inspection of a document: main scope, top layers and frames
//!
//! The inspector's own overlay is hidden for as long as anything is being
//! measured and restored afterwards, whether the scan returns or unwinds.

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{debug, info};

use super::collect::collect_elements;
use super::layers::top_layer_roots;
use super::types::{ElementMeta, Layer, LayerKind};
use crate::dom::{Document, NodeId, ReadyState};
use crate::selector::SelectorList;
use crate::settings::CategorySettings;

static FRAME_SELECTOR: Lazy<SelectorList> = Lazy::new(|| {
    "iframe, frame"
        .parse::<SelectorList>()
        .expect("frame selector is valid")
});

/// Something the inspector draws into the inspected document
pub trait Overlay {
    /// Display state captured by [`Overlay::hide`]
    type Saved;

    /// The overlay's root node, if it lives in the document
    fn node(&self) -> Option<NodeId>;

    fn hide(&self) -> Self::Saved;

    fn restore(&self, saved: Self::Saved);
}

/// No overlay to hide
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverlay;

impl Overlay for NoOverlay {
    type Saved = ();

    fn node(&self) -> Option<NodeId> {
        None
    }

    fn hide(&self) {}

    fn restore(&self, _saved: ()) {}
}

/// Keeps an overlay hidden until dropped
struct HiddenWhileMeasuring<'a, O: Overlay> {
    overlay: &'a O,
    saved: Option<O::Saved>,
}

impl<'a, O: Overlay> HiddenWhileMeasuring<'a, O> {
    fn new(overlay: &'a O) -> Self {
        let saved = overlay.hide();
        Self {
            overlay,
            saved: Some(saved),
        }
    }
}

impl<O: Overlay> Drop for HiddenWhileMeasuring<'_, O> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.overlay.restore(saved);
        }
    }
}

/// Options for [`inspect`]
#[derive(Debug, Clone, Default)]
pub struct InspectConfig {
    pub categories: CategorySettings,
    /// The inspected document is itself embedded in a page
    pub embedded: bool,
}

impl InspectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: CategorySettings) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }
}

/// Result of [`inspect`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inspection {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<ElementMeta>,
    pub top_layers: Vec<Layer>,
    pub frame_layers: Vec<Layer>,
}

impl Inspection {
    /// Elements across the main scope and every layer
    pub fn element_count(&self) -> usize {
        self.elements.len()
            + self
                .top_layers
                .iter()
                .chain(&self.frame_layers)
                .map(|layer| layer.elements.len())
                .sum::<usize>()
    }
}

/// Inspect `parent` and everything layered above or embedded in it.
///
/// Each open dialog or popover is scanned as its own layer and left out of
/// the main scope. Every readable, fully loaded frame is scanned against its
/// own document. `overlay` stays hidden until the composition is done.
pub fn inspect<D: Document, O: Overlay>(
    doc: &D,
    parent: NodeId,
    overlay: &O,
    config: &InspectConfig,
) -> Inspection {
    let _hidden = HiddenWhileMeasuring::new(overlay);
    let overlay_node = overlay.node();

    let top_layers: Vec<Layer> = top_layer_roots(doc, parent, overlay_node)
        .into_iter()
        .map(|root| {
            let collection =
                collect_elements(doc, root, &[], &config.categories, config.embedded);
            Layer::new(root, LayerKind::TopLayer, collection)
        })
        .collect();

    let frame_layers = collect_frames(doc, parent, overlay_node, &config.categories);

    let mut excludes: Vec<NodeId> = overlay_node.into_iter().collect();
    excludes.extend(top_layers.iter().map(|layer| layer.root));
    let main = collect_elements(doc, parent, &excludes, &config.categories, config.embedded);

    let inspection = Inspection {
        width: main.root_width,
        height: main.root_height,
        elements: main.elements,
        top_layers,
        frame_layers,
    };
    info!(
        %parent,
        elements = inspection.elements.len(),
        top_layers = inspection.top_layers.len(),
        frames = inspection.frame_layers.len(),
        "inspection complete"
    );
    inspection
}

fn collect_frames<D: Document>(
    doc: &D,
    parent: NodeId,
    overlay: Option<NodeId>,
    categories: &CategorySettings,
) -> Vec<Layer> {
    doc.query_selector_all(parent, &FRAME_SELECTOR)
        .into_iter()
        .filter(|&frame| !overlay.is_some_and(|o| doc.contains(o, frame)))
        .filter_map(|frame| {
            if doc.is_hidden(frame) {
                debug!(%frame, "frame is not rendered, skipped");
                return None;
            }
            let nested = match doc.frame_document(frame) {
                Ok(Some(nested)) => nested,
                Ok(None) => {
                    debug!(%frame, "frame has no document, skipped");
                    return None;
                }
                Err(err) => {
                    debug!(%frame, error = %err, "frame is not readable, skipped");
                    return None;
                }
            };
            if nested.ready_state() != ReadyState::Complete {
                debug!(%frame, state = ?nested.ready_state(), "frame is still loading, skipped");
                return None;
            }
            let body = nested.body()?;
            let embedded = doc.has_attribute(frame, "srcdoc");
            let collection = collect_elements(nested, body, &[], categories, embedded);
            Some(Layer::new(body, LayerKind::Frame { frame }, collection))
        })
        .collect()
}
