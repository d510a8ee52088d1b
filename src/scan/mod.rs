//! The scan pipeline
//!
//! [`collect_elements`] runs a single pass over one root: it selects
//! candidates by category, filters hidden, excluded and non-modal nodes,
//! then measures, names, classifies and checks each survivor.
//! [`inspect`] composes passes over a document's main scope, its open
//! top layers and its same-origin frames.

mod category;
mod collect;
mod geometry;
mod inspector;
mod layers;
mod role;
mod types;

pub use category::{classify, enabled_selectors, Category};
pub use collect::collect_elements;
pub use geometry::{position_anchor, scroll_anchor, Geometry, GeometryResolver};
pub use inspector::{inspect, InspectConfig, Inspection, NoOverlay, Overlay};
pub use layers::{detect_layers, is_active_layer, top_layer_roots, TOP_LAYER_SELECTOR};
pub use role::{closest_by_roles, input_role, resolve_name, resolve_role, KnownRole};
pub use types::{Collection, ElementMeta, FragmentRect, Layer, LayerKind};
