//! Arena-backed, in-memory rendering of a page
//!
//! A `PageSnapshot` records what a browser would answer at one instant:
//! the element tree, computed position/overflow, laid-out fragments and the
//! scroll state of the window and of every scroll container. Layout is kept
//! in page coordinates; client coordinates are derived on demand so that
//! scrolling never requires touching the stored layout.

use std::cell::Cell;
use std::collections::HashMap;

use super::types::{Overflow, Position, ReadyState, Rect, Size, Viewport};
use super::{ancestors, Document, FrameAccessError, NodeId};
use crate::scan::Overlay;

/// Content of an embedded frame
#[derive(Debug, Clone)]
pub enum FrameContent {
    /// Same-origin document the embedder may read
    Loaded(Box<PageSnapshot>),
    /// Access denied by the same-origin policy
    CrossOrigin,
    /// No content window
    Empty,
}

/// Description of an element to insert into a snapshot
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    fragments: Vec<Rect>,
    position: Position,
    overflow: (Overflow, Overflow),
    display_none: bool,
    scroll_size: Option<Size>,
    offset_size: Option<Size>,
    popover_open: bool,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set an attribute, replacing a previous value
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        self.attributes.retain(|(n, _)| *n != name);
        self.attributes.push((name, value.into()));
        self
    }

    /// Single border box in page coordinates
    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.fragments = vec![Rect::new(x, y, width, height)];
        self
    }

    /// Add one rendering fragment (e.g. a wrapped line of inline content)
    pub fn fragment(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.fragments.push(Rect::new(x, y, width, height));
        self
    }

    /// Own text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Same overflow on both axes
    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = (overflow, overflow);
        self
    }

    pub fn display_none(mut self) -> Self {
        self.display_none = true;
        self
    }

    pub fn scroll_size(mut self, width: f64, height: f64) -> Self {
        self.scroll_size = Some(Size::new(width, height));
        self
    }

    pub fn offset_size(mut self, width: f64, height: f64) -> Self {
        self.offset_size = Some(Size::new(width, height));
        self
    }

    pub fn popover_open(mut self) -> Self {
        self.popover_open = true;
        self
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Page coordinates, or viewport coordinates under a fixed ancestor
    fragments: Vec<Rect>,
    position: Position,
    overflow: (Overflow, Overflow),
    display_none: Cell<bool>,
    scroll_size: Option<Size>,
    offset_size: Option<Size>,
    scroll_offset: (f64, f64),
    popover_open: bool,
}

impl NodeData {
    fn from_spec(spec: ElementSpec, parent: Option<NodeId>) -> Self {
        Self {
            tag: spec.tag,
            attributes: spec.attributes,
            text: spec.text,
            parent,
            children: Vec::new(),
            fragments: spec.fragments,
            position: spec.position,
            overflow: spec.overflow,
            display_none: Cell::new(spec.display_none),
            scroll_size: spec.scroll_size,
            offset_size: spec.offset_size,
            scroll_offset: (0.0, 0.0),
            popover_open: spec.popover_open,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn layout_box(&self) -> Rect {
        let mut fragments = self.fragments.iter();
        match fragments.next() {
            Some(first) => fragments.fold(*first, |acc, r| acc.union(r)),
            None => Rect::default(),
        }
    }

    /// Hidden state this node imposes on itself and its subtree
    fn hides_subtree(&self) -> bool {
        self.display_none.get()
            || self.attribute("hidden").is_some()
            || (self.tag == "dialog" && self.attribute("open").is_none())
            || (self.attribute("popover").is_some() && !self.popover_open)
    }
}

/// In-memory document implementing [`Document`]
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    nodes: Vec<NodeData>,
    document_element: NodeId,
    body: NodeId,
    viewport: Option<Viewport>,
    title: Option<String>,
    ready_state: ReadyState,
    frames: HashMap<NodeId, FrameContent>,
}

impl PageSnapshot {
    /// Create an empty `html > body` document rendered into `viewport`
    pub fn new(viewport: Viewport) -> Self {
        let mut page = Self::without_view();
        page.viewport = Some(viewport);
        page
    }

    /// A document with no default view, as produced by `DOMParser`
    pub fn without_view() -> Self {
        let html = NodeData::from_spec(ElementSpec::new("html"), None);
        let mut page = Self {
            nodes: vec![html],
            document_element: NodeId(0),
            body: NodeId(0),
            viewport: None,
            title: None,
            ready_state: ReadyState::Complete,
            frames: HashMap::new(),
        };
        page.body = page.append(NodeId(0), ElementSpec::new("body"));
        page
    }

    pub fn html_element(&self) -> NodeId {
        self.document_element
    }

    pub fn body_element(&self) -> NodeId {
        self.body
    }

    /// Insert `spec` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::from_spec(spec, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Create a node that is not attached to the tree
    pub fn detached(&mut self, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::from_spec(spec, None));
        id
    }

    /// Replace the layout attributes of an existing node
    pub fn update(&mut self, node: NodeId, spec: ElementSpec) {
        let data = &mut self.nodes[node.0];
        let parent = data.parent;
        let children = std::mem::take(&mut data.children);
        let scroll_offset = data.scroll_offset;
        *data = NodeData::from_spec(spec, parent);
        data.children = children;
        data.scroll_offset = scroll_offset;
    }

    /// Scroll the window; has no effect without a view
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.scroll_x = x;
            viewport.scroll_y = y;
        }
    }

    /// Scroll the content of a scroll container
    pub fn set_scroll_offset(&mut self, node: NodeId, x: f64, y: f64) {
        self.nodes[node.0].scroll_offset = (x, y);
    }

    pub fn set_frame(&mut self, frame: NodeId, content: FrameContent) {
        self.frames.insert(frame, content);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    /// First connected element with the given `id` attribute
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .find(|&n| self.node(n).attribute("id") == Some(id) && self.is_connected(n))
    }

    /// Overlay handle for a node hosting the inspector's own drawing
    pub fn overlay(&self, node: NodeId) -> SnapshotOverlay<'_> {
        SnapshotOverlay { page: self, node }
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    /// Distance between page and client coordinates for `node`
    fn client_shift(&self, node: NodeId) -> (f64, f64) {
        let (mut dx, mut dy) = (0.0, 0.0);
        let mut current = node;
        loop {
            let data = self.node(current);
            if data.position == Position::Fixed {
                return (dx, dy);
            }
            match data.parent {
                Some(parent) => {
                    let (sx, sy) = self.node(parent).scroll_offset;
                    dx += sx;
                    dy += sy;
                    current = parent;
                }
                None => {
                    if let Some(viewport) = self.viewport {
                        dx += viewport.scroll_x;
                        dy += viewport.scroll_y;
                    }
                    return (dx, dy);
                }
            }
        }
    }

    /// Visible text of a subtree, whitespace collapsed
    fn text_content(&self, node: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        self.collect_text(node, &mut parts);
        parts
            .iter()
            .flat_map(|part| part.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn collect_text<'a>(&'a self, node: NodeId, parts: &mut Vec<&'a str>) {
        let data = self.node(node);
        if data.hides_subtree() {
            return;
        }
        if let Some(text) = &data.text {
            parts.push(text);
        }
        for &child in &data.children {
            self.collect_text(child, parts);
        }
    }

    fn names_from_content(&self, node: NodeId) -> bool {
        const CONTENT_ROLES: &[&str] = &[
            "button",
            "cell",
            "checkbox",
            "columnheader",
            "gridcell",
            "heading",
            "link",
            "menuitem",
            "option",
            "radio",
            "rowheader",
            "switch",
            "tab",
            "tooltip",
            "treeitem",
        ];
        let by_tag = matches!(
            self.tag_name(node),
            "a" | "button"
                | "caption"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "label"
                | "legend"
                | "li"
                | "option"
                | "summary"
                | "td"
                | "th"
        );
        by_tag
            || self
                .attribute(node, "role")
                .and_then(|r| r.split_whitespace().next())
                .is_some_and(|r| CONTENT_ROLES.contains(&r))
    }

    /// Text of the `label` associated with a form control
    fn label_text(&self, node: NodeId) -> Option<String> {
        let by_for = self.attribute(node, "id").and_then(|id| {
            (0..self.nodes.len()).map(NodeId).find(|&n| {
                self.node(n).tag == "label"
                    && self.node(n).attribute("for") == Some(id)
                    && self.is_connected(n)
            })
        });
        let label = by_for.or_else(|| ancestors(self, node).find(|&n| self.node(n).tag == "label"))?;
        let text = self.text_content(label);
        (!text.is_empty()).then_some(text)
    }

    fn implicit_role(&self, node: NodeId) -> Option<&'static str> {
        let has = |name: &str| self.has_attribute(node, name);
        let role = match self.tag_name(node) {
            "a" | "area" if has("href") => "link",
            "article" => "article",
            "aside" => "complementary",
            "button" => "button",
            "dialog" => "dialog",
            "details" | "fieldset" | "optgroup" => "group",
            "footer" => "contentinfo",
            "form" => "form",
            "header" => "banner",
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
            "hr" => "separator",
            "img" if self.attribute(node, "alt") == Some("") => "presentation",
            "img" => "img",
            "li" => "listitem",
            "main" => "main",
            "menu" | "ol" | "ul" => "list",
            "meter" => "meter",
            "nav" => "navigation",
            "option" => "option",
            "output" => "status",
            "p" => "paragraph",
            "progress" => "progressbar",
            "search" => "search",
            "section" if has("aria-label") || has("aria-labelledby") => "region",
            "select" if has("multiple") => "listbox",
            "select" => "combobox",
            "table" => "table",
            "tbody" | "tfoot" | "thead" => "rowgroup",
            "td" => "cell",
            "textarea" => "textbox",
            "th" => "columnheader",
            "tr" => "row",
            _ => return None,
        };
        Some(role)
    }
}

impl Document for PageSnapshot {
    fn document_element(&self) -> Option<NodeId> {
        Some(self.document_element)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    fn tag_name(&self, node: NodeId) -> &str {
        &self.node(node).tag
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).attribute(name)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let top = ancestors(self, node).last().unwrap_or(node);
        top == self.document_element
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        std::iter::once(node)
            .chain(ancestors(self, node))
            .any(|n| self.node(n).hides_subtree())
    }

    fn position(&self, node: NodeId) -> Position {
        self.node(node).position
    }

    fn overflow(&self, node: NodeId) -> (Overflow, Overflow) {
        self.node(node).overflow
    }

    fn is_popover_open(&self, node: NodeId) -> bool {
        let data = self.node(node);
        data.attribute("popover").is_some() && data.popover_open
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn bounding_client_rect(&self, node: NodeId) -> Rect {
        let data = self.node(node);
        if data.fragments.is_empty() {
            return Rect::default();
        }
        let (dx, dy) = self.client_shift(node);
        data.layout_box().translate(-dx, -dy)
    }

    fn client_rects(&self, node: NodeId) -> Vec<Rect> {
        let (dx, dy) = self.client_shift(node);
        self.node(node)
            .fragments
            .iter()
            .map(|r| r.translate(-dx, -dy))
            .collect()
    }

    fn scroll_size(&self, node: NodeId) -> Size {
        let data = self.node(node);
        data.scroll_size.unwrap_or_else(|| {
            let layout = data.layout_box();
            Size::new(layout.width, layout.height)
        })
    }

    fn offset_size(&self, node: NodeId) -> Size {
        let data = self.node(node);
        data.offset_size.unwrap_or_else(|| {
            let layout = data.layout_box();
            Size::new(layout.width, layout.height)
        })
    }

    fn computed_role(&self, node: NodeId) -> Option<String> {
        if let Some(first) = self
            .attribute(node, "role")
            .and_then(|r| r.split_whitespace().next())
        {
            return Some(first.to_string());
        }
        // Input controls map to vendor-specific roles; report nothing for them
        self.implicit_role(node).map(str::to_string)
    }

    fn accessible_name(&self, node: NodeId) -> Option<String> {
        if let Some(ids) = self.attribute(node, "aria-labelledby") {
            let text = ids
                .split_whitespace()
                .filter_map(|id| self.find_by_id(id))
                .map(|n| self.text_content(n))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !text.is_empty() {
                return Some(text);
            }
        }
        if let Some(label) = self
            .attribute(node, "aria-label")
            .map(str::trim)
            .filter(|l| !l.is_empty())
        {
            return Some(label.to_string());
        }

        let tag = self.tag_name(node);
        let input_type = self.attribute(node, "type").unwrap_or("text");
        if tag == "img" || tag == "area" || (tag == "input" && input_type == "image") {
            if let Some(alt) = self.attribute(node, "alt") {
                let alt = alt.trim();
                return (!alt.is_empty()).then(|| alt.to_string());
            }
        } else if matches!(tag, "input" | "select" | "textarea") {
            if let Some(label) = self.label_text(node) {
                return Some(label);
            }
            if tag == "input" && matches!(input_type, "button" | "submit" | "reset") {
                if let Some(value) = self.attribute(node, "value").filter(|v| !v.is_empty()) {
                    return Some(value.to_string());
                }
            }
        }

        if self.names_from_content(node) {
            let text = self.text_content(node);
            if !text.is_empty() {
                return Some(text);
            }
        }

        self.attribute(node, "title")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn frame_document(&self, frame: NodeId) -> Result<Option<&Self>, FrameAccessError> {
        if !matches!(self.tag_name(frame), "iframe" | "frame") {
            return Err(FrameAccessError::NotAFrame { node: frame });
        }
        match self.frames.get(&frame) {
            Some(FrameContent::Loaded(doc)) => Ok(Some(doc)),
            Some(FrameContent::CrossOrigin) => Err(FrameAccessError::CrossOrigin { frame }),
            Some(FrameContent::Empty) | None => Ok(None),
        }
    }
}

/// The inspector's own overlay living inside a snapshot.
///
/// Hiding toggles the node's `display` through a `Cell`, so the overlay can
/// be hidden while the rest of the pipeline holds shared borrows.
pub struct SnapshotOverlay<'a> {
    page: &'a PageSnapshot,
    node: NodeId,
}

impl Overlay for SnapshotOverlay<'_> {
    type Saved = bool;

    fn node(&self) -> Option<NodeId> {
        Some(self.node)
    }

    fn hide(&self) -> bool {
        self.page.node(self.node).display_none.replace(true)
    }

    fn restore(&self, saved: bool) {
        self.page.node(self.node).display_none.set(saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageSnapshot {
        PageSnapshot::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn client_rects_follow_window_scroll() {
        let mut page = page();
        let body = page.body_element();
        let button = page.append(body, ElementSpec::new("button").rect(10.0, 700.0, 100.0, 30.0));
        page.scroll_to(0.0, 500.0);

        assert_eq!(
            page.bounding_client_rect(button),
            Rect::new(10.0, 200.0, 100.0, 30.0)
        );
    }

    #[test]
    fn fixed_nodes_ignore_window_scroll() {
        let mut page = page();
        let body = page.body_element();
        let bar = page.append(
            body,
            ElementSpec::new("nav")
                .rect(0.0, 0.0, 800.0, 40.0)
                .position(Position::Fixed),
        );
        let link = page.append(bar, ElementSpec::new("a").attr("href", "/").rect(5.0, 5.0, 50.0, 20.0));
        page.scroll_to(0.0, 900.0);

        assert_eq!(page.bounding_client_rect(link), Rect::new(5.0, 5.0, 50.0, 20.0));
    }

    #[test]
    fn scroll_containers_shift_descendants_only() {
        let mut page = page();
        let body = page.body_element();
        let list = page.append(
            body,
            ElementSpec::new("div")
                .rect(0.0, 100.0, 300.0, 200.0)
                .overflow(Overflow::Auto),
        );
        let item = page.append(list, ElementSpec::new("button").rect(0.0, 150.0, 100.0, 20.0));
        page.set_scroll_offset(list, 0.0, 40.0);

        assert_eq!(page.bounding_client_rect(list).y, 100.0);
        assert_eq!(page.bounding_client_rect(item).y, 110.0);
    }

    #[test]
    fn closed_dialogs_and_popovers_are_hidden() {
        let mut page = page();
        let body = page.body_element();
        let closed = page.append(body, ElementSpec::new("dialog"));
        let inside = page.append(closed, ElementSpec::new("button"));
        let open = page.append(body, ElementSpec::new("dialog").attr("open", ""));
        let popover = page.append(body, ElementSpec::new("div").attr("popover", ""));
        let shown = page.append(body, ElementSpec::new("div").attr("popover", "").popover_open());

        assert!(page.is_hidden(inside));
        assert!(!page.is_hidden(open));
        assert!(page.is_hidden(popover));
        assert!(!page.is_hidden(shown));
        assert!(page.is_popover_open(shown));
    }

    #[test]
    fn detached_nodes_are_not_connected() {
        let mut page = page();
        let orphan = page.detached(ElementSpec::new("div"));
        assert!(!page.is_connected(orphan));
        assert!(page.is_connected(page.body_element()));
    }

    #[test]
    fn explicit_role_reports_first_raw_token() {
        let mut page = page();
        let body = page.body_element();
        let div = page.append(body, ElementSpec::new("div").attr("role", "unknownbutton button"));
        let input = page.append(body, ElementSpec::new("input").attr("type", "range"));

        assert_eq!(page.computed_role(div).as_deref(), Some("unknownbutton"));
        assert_eq!(page.computed_role(input), None);
    }

    #[test]
    fn accessible_name_sources() {
        let mut page = page();
        let body = page.body_element();
        let labelled = page.append(body, ElementSpec::new("button").attr("aria-label", "Close"));
        let content = page.append(body, ElementSpec::new("a").attr("href", "/"));
        page.append(content, ElementSpec::new("span").text("  Home \n page "));
        let field = page.append(body, ElementSpec::new("input").attr("id", "q"));
        page.append(body, ElementSpec::new("label").attr("for", "q").text("Search"));
        let decorative = page.append(body, ElementSpec::new("img").attr("alt", ""));

        assert_eq!(page.accessible_name(labelled).as_deref(), Some("Close"));
        assert_eq!(page.accessible_name(content).as_deref(), Some("Home page"));
        assert_eq!(page.accessible_name(field).as_deref(), Some("Search"));
        assert_eq!(page.accessible_name(decorative), None);
    }

    #[test]
    fn frame_access_states() {
        let mut page = page();
        let body = page.body_element();
        let same = page.append(body, ElementSpec::new("iframe"));
        let foreign = page.append(body, ElementSpec::new("iframe"));
        let empty = page.append(body, ElementSpec::new("iframe"));
        page.set_frame(same, FrameContent::Loaded(Box::new(self::page())));
        page.set_frame(foreign, FrameContent::CrossOrigin);

        assert!(matches!(page.frame_document(same), Ok(Some(_))));
        assert_eq!(
            page.frame_document(foreign).err(),
            Some(FrameAccessError::CrossOrigin { frame: foreign })
        );
        assert!(matches!(page.frame_document(empty), Ok(None)));
        assert!(page.frame_document(body).is_err());
    }

    #[test]
    fn overlay_toggles_display() {
        let mut page = page();
        let body = page.body_element();
        let container = page.append(body, ElementSpec::new("div"));
        let overlay = page.overlay(container);

        let saved = overlay.hide();
        assert!(page.is_hidden(container));
        overlay.restore(saved);
        assert!(!page.is_hidden(container));
    }
}
