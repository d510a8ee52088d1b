//! One scan pass over a root node

use tracing::{debug, trace};

use super::category::{classify, enabled_selectors, Category};
use super::geometry::{Geometry, GeometryResolver};
use super::layers::detect_layers;
use super::role::{resolve_name, resolve_role};
use super::types::{Collection, ElementMeta};
use crate::dom::{Document, NodeId, Viewport};
use crate::rules::{evaluate_rules, RuleContext, Tables};
use crate::settings::CategorySettings;

/// Scan `root` and describe every visible node of an enabled category.
///
/// Nodes inside any of `excludes` are skipped. When `root` contains an
/// active dialog or popover, only nodes inside such layers survive. A root
/// without a view or outside its document yields an empty collection.
/// `embedded` is passed through to the rules.
pub fn collect_elements<D: Document + ?Sized>(
    doc: &D,
    root: NodeId,
    excludes: &[NodeId],
    settings: &CategorySettings,
    embedded: bool,
) -> Collection {
    let Some(viewport) = doc.viewport() else {
        debug!(%root, "document has no view, nothing to scan");
        return Collection::default();
    };
    if !doc.is_connected(root) {
        debug!(%root, "root is detached, nothing to scan");
        return Collection::default();
    }

    let is_body = doc.body() == Some(root);
    let (root_width, root_height) = root_size(doc, root, is_body);
    let geometry = GeometryResolver::for_root(doc, root, viewport);
    let selectors = enabled_selectors(settings);
    let selected = |node: NodeId| selectors.iter().any(|list| doc.matches(node, list));
    let layers = detect_layers(doc, root);

    let mut candidates = Vec::new();
    if is_body && settings.is_enabled(Category::Page) {
        candidates.push(root);
    }
    if selected(root) && !candidates.contains(&root) {
        candidates.push(root);
    }
    candidates.extend(doc.descendants(root).into_iter().filter(|&n| selected(n)));

    let mut tables = Tables::new();
    let mut elements = Vec::new();
    for node in candidates {
        if doc.is_hidden(node) {
            trace!(%node, "hidden");
            continue;
        }
        if excludes.iter().any(|&excluded| doc.contains(excluded, node)) {
            trace!(%node, "excluded");
            continue;
        }
        if !layers.is_empty() && !layers.iter().any(|&layer| doc.contains(layer, node)) {
            trace!(%node, "outside the active layers");
            continue;
        }
        if let Some(meta) = describe(doc, node, &geometry, viewport, &mut tables, embedded) {
            elements.push(meta);
        }
    }

    debug!(
        %root,
        elements = elements.len(),
        layers = layers.len(),
        tables = tables.len(),
        "scan pass complete"
    );
    Collection {
        elements,
        root_width,
        root_height,
    }
}

/// Content size of the root; for the body, document-level overflow counts
fn root_size<D: Document + ?Sized>(doc: &D, root: NodeId, is_body: bool) -> (f64, f64) {
    let own = doc.scroll_size(root);
    let html = match doc.document_element() {
        Some(html) if is_body => html,
        _ => return (own.width, own.height),
    };
    let offset = doc.offset_size(html);
    let scroll = doc.scroll_size(html);
    (
        offset.width.max(scroll.width).max(own.width),
        offset.height.max(scroll.height).max(own.height),
    )
}

fn describe<D: Document + ?Sized>(
    doc: &D,
    node: NodeId,
    geometry: &GeometryResolver,
    viewport: Viewport,
    tables: &mut Tables,
    embedded: bool,
) -> Option<ElementMeta> {
    let Geometry {
        absolute_x,
        absolute_y,
        width,
        height,
        rects,
    } = geometry.resolve(doc, node)?;

    let role = resolve_role(doc, node);
    let name = resolve_name(doc, node);
    let category = classify(doc, node, role);
    let mut ctx = RuleContext {
        tables,
        document: doc,
        viewport,
        name: &name,
        role,
        embedded,
    };
    let rule_results = evaluate_rules(node, &mut ctx);

    Some(ElementMeta {
        node,
        absolute_x,
        absolute_y,
        width,
        height,
        rects,
        name,
        role,
        category,
        rule_results,
    })
}
