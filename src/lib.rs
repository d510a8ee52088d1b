//! a11y-lens - accessibility scanning of rendered document trees
//!
//! The library walks a rendered document, selects the nodes that matter for
//! accessibility (landmarks, headings, images, controls, tables, lists and
//! live regions), measures them relative to the scan root, resolves their
//! role and accessible name, and runs a fixed set of rules on each.
//!
//! # Example
//!
//! ```rust
//! use a11y_lens::dom::{ElementSpec, PageSnapshot, Viewport};
//! use a11y_lens::{inspect, InspectConfig, KnownRole, NoOverlay};
//!
//! let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
//! let body = page.body_element();
//! page.append(
//!     body,
//!     ElementSpec::new("button").rect(10.0, 10.0, 100.0, 30.0).text("Save"),
//! );
//!
//! let inspection = inspect(&page, body, &NoOverlay, &InspectConfig::new());
//! let button = &inspection.elements[1];
//! assert_eq!(button.role, Some(KnownRole::Button));
//! assert_eq!((button.absolute_x, button.absolute_y), (10.0, 10.0));
//! ```

pub mod dom;
pub mod error;
pub mod report;
pub mod rules;
pub mod scan;
pub mod selector;
pub mod settings;

pub use dom::{Document, NodeId, PageSnapshot};
pub use error::SelectorError;
pub use rules::{RuleResult, Severity};
pub use scan::{
    collect_elements, inspect, Category, Collection, ElementMeta, InspectConfig, Inspection,
    KnownRole, Layer, LayerKind, NoOverlay, Overlay,
};
pub use settings::{CategorySettings, SettingsError};
