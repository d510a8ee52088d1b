//! Result types produced by a scan

use serde::Serialize;

use super::category::Category;
use super::role::KnownRole;
use crate::dom::NodeId;
use crate::rules::RuleResult;

/// One rendering fragment, relative to the element's own position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FragmentRect {
    pub relative_x: f64,
    pub relative_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything a scan learned about one surviving node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementMeta {
    pub node: NodeId,
    /// Position relative to the scan root's position anchor
    pub absolute_x: f64,
    pub absolute_y: f64,
    pub width: f64,
    pub height: f64,
    pub rects: Vec<FragmentRect>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<KnownRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub rule_results: Vec<RuleResult>,
}

/// Output of one orchestrator pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    pub elements: Vec<ElementMeta>,
    pub root_width: f64,
    pub root_height: f64,
}

/// How a layer came to be scanned on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayerKind {
    /// An open dialog or popover of the inspected document
    TopLayer,
    /// The body of a same-origin embedded document
    Frame { frame: NodeId },
}

/// An independently scanned coordinate scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// Layer root; for frames this lives in the embedded document
    pub root: NodeId,
    #[serde(flatten)]
    pub kind: LayerKind,
    pub width: f64,
    pub height: f64,
    pub elements: Vec<ElementMeta>,
}

impl Layer {
    pub(crate) fn new(root: NodeId, kind: LayerKind, collection: Collection) -> Self {
        Self {
            root,
            kind,
            width: collection.root_width,
            height: collection.root_height,
            elements: collection.elements,
        }
    }
}
