//! TOML page snapshot format
//!
//! ```toml
//! title = "Checkout"
//!
//! [viewport]
//! width = 800
//! height = 600
//!
//! [html.attributes]
//! lang = "en"
//!
//! [body]
//! scroll-size = [800, 1200]
//!
//! [[body.children]]
//! tag = "button"
//! rect = [10, 10, 100, 30]
//! text = "Pay"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::snapshot::{ElementSpec, FrameContent, PageSnapshot};
use super::types::{Overflow, Position, ReadyState, Viewport};
use super::NodeId;

/// Errors that can occur when loading a page snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse snapshot TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("the body table describes a <{tag}> element")]
    UnexpectedBodyTag { tag: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SnapshotFile {
    title: Option<String>,
    #[serde(default)]
    ready_state: ReadyState,
    /// Absent for documents without a default view
    viewport: Option<ViewportFile>,
    #[serde(default)]
    html: HtmlFile,
    #[serde(default)]
    body: ElementFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ViewportFile {
    width: f64,
    height: f64,
    #[serde(default)]
    scroll_x: f64,
    #[serde(default)]
    scroll_y: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct HtmlFile {
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    scroll_size: Option<[f64; 2]>,
    offset_size: Option<[f64; 2]>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ElementFile {
    tag: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    rect: Option<[f64; 4]>,
    #[serde(default)]
    fragments: Vec<[f64; 4]>,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    overflow: Overflow,
    #[serde(default)]
    display_none: bool,
    scroll_size: Option<[f64; 2]>,
    offset_size: Option<[f64; 2]>,
    scroll_offset: Option<[f64; 2]>,
    #[serde(default)]
    popover_open: bool,
    frame: Option<FrameFile>,
    #[serde(default)]
    children: Vec<ElementFile>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "access", rename_all = "kebab-case")]
enum FrameFile {
    SameOrigin { document: Box<SnapshotFile> },
    CrossOrigin,
    Empty,
}

impl ElementFile {
    fn spec(&self, default_tag: &str) -> ElementSpec {
        let mut spec = ElementSpec::new(self.tag.as_deref().unwrap_or(default_tag))
            .position(self.position)
            .overflow(self.overflow);
        for (name, value) in &self.attributes {
            spec = spec.attr(name.as_str(), value.as_str());
        }
        if let Some(text) = &self.text {
            spec = spec.text(text.as_str());
        }
        for [x, y, w, h] in self.rect.iter().chain(self.fragments.iter()) {
            spec = spec.fragment(*x, *y, *w, *h);
        }
        if self.display_none {
            spec = spec.display_none();
        }
        if let Some([w, h]) = self.scroll_size {
            spec = spec.scroll_size(w, h);
        }
        if let Some([w, h]) = self.offset_size {
            spec = spec.offset_size(w, h);
        }
        if self.popover_open {
            spec = spec.popover_open();
        }
        spec
    }
}

impl PageSnapshot {
    /// Load a snapshot from TOML text
    pub fn from_toml(content: &str) -> Result<Self, SnapshotError> {
        let file: SnapshotFile = toml::from_str(content)?;
        build(file)
    }

    /// Load a snapshot from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

fn build(file: SnapshotFile) -> Result<PageSnapshot, SnapshotError> {
    if let Some(tag) = file.body.tag.as_deref().filter(|t| !t.eq_ignore_ascii_case("body")) {
        return Err(SnapshotError::UnexpectedBodyTag {
            tag: tag.to_string(),
        });
    }

    let mut page = match &file.viewport {
        Some(v) => PageSnapshot::new(
            Viewport::new(v.width, v.height).with_scroll(v.scroll_x, v.scroll_y),
        ),
        None => PageSnapshot::without_view(),
    };
    if let Some(title) = file.title {
        page.set_title(title);
    }
    page.set_ready_state(file.ready_state);

    let html = page.html_element();
    let mut html_spec = ElementSpec::new("html");
    for (name, value) in &file.html.attributes {
        html_spec = html_spec.attr(name.as_str(), value.as_str());
    }
    if let Some([w, h]) = file.html.scroll_size {
        html_spec = html_spec.scroll_size(w, h);
    }
    if let Some([w, h]) = file.html.offset_size {
        html_spec = html_spec.offset_size(w, h);
    }
    page.update(html, html_spec);

    let body = page.body_element();
    page.update(body, file.body.spec("body"));
    populate(&mut page, body, file.body)?;
    Ok(page)
}

fn insert(page: &mut PageSnapshot, parent: NodeId, element: ElementFile) -> Result<(), SnapshotError> {
    let node = page.append(parent, element.spec("div"));
    populate(page, node, element)
}

/// Scroll offset, frame content and children, which live outside `ElementSpec`
fn populate(page: &mut PageSnapshot, node: NodeId, element: ElementFile) -> Result<(), SnapshotError> {
    if let Some([x, y]) = element.scroll_offset {
        page.set_scroll_offset(node, x, y);
    }
    if let Some(frame) = element.frame {
        let content = match frame {
            FrameFile::CrossOrigin => FrameContent::CrossOrigin,
            FrameFile::Empty => FrameContent::Empty,
            FrameFile::SameOrigin { document } => FrameContent::Loaded(Box::new(build(*document)?)),
        };
        page.set_frame(node, content);
    }
    for child in element.children {
        insert(page, node, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Rect, Size};

    const PAGE: &str = r#"
title = "Demo"

[viewport]
width = 800
height = 600
scroll-y = 20

[html.attributes]
lang = "en"

[body]
scroll-size = [2000, 500]

[[body.children]]
tag = "button"
rect = [10, 10, 100, 30]
text = "Save"

[[body.children]]
tag = "iframe"
rect = [0, 100, 300, 150]
frame = { access = "cross-origin" }

[[body.children]]
tag = "ul"
overflow = "auto"
scroll-offset = [0, 15]

[[body.children.children]]
tag = "li"
fragments = [[0, 200, 50, 10], [0, 210, 30, 10]]
"#;

    #[test]
    fn loads_tree_layout_and_frames() {
        let page = PageSnapshot::from_toml(PAGE).expect("snapshot should load");
        let body = page.body_element();
        let children = page.children(body).to_vec();

        assert_eq!(page.title(), Some("Demo"));
        assert_eq!(page.attribute(page.html_element(), "lang"), Some("en"));
        assert_eq!(page.scroll_size(body), Size::new(2000.0, 500.0));
        assert_eq!(children.len(), 3);
        assert_eq!(page.tag_name(children[0]), "button");
        assert_eq!(
            page.bounding_client_rect(children[0]),
            Rect::new(10.0, -10.0, 100.0, 30.0)
        );
        assert!(page.frame_document(children[1]).is_err());

        let item = page.children(children[2])[0];
        assert_eq!(page.client_rects(item).len(), 2);
        assert_eq!(page.bounding_client_rect(item), Rect::new(0.0, 165.0, 50.0, 20.0));
    }

    #[test]
    fn missing_viewport_means_no_view() {
        let page = PageSnapshot::from_toml("[body]\n").expect("snapshot should load");
        assert!(page.viewport().is_none());
    }

    #[test]
    fn nested_same_origin_documents() {
        let source = r#"
[viewport]
width = 800
height = 600

[[body.children]]
tag = "iframe"

[body.children.frame]
access = "same-origin"

[body.children.frame.document]
ready-state = "loading"

[body.children.frame.document.viewport]
width = 300
height = 150
"#;
        let page = PageSnapshot::from_toml(source).expect("snapshot should load");
        let frame = page.children(page.body_element())[0];
        let nested = page
            .frame_document(frame)
            .expect("same-origin frame")
            .expect("frame has a document");
        assert_eq!(nested.ready_state(), ReadyState::Loading);
    }

    #[test]
    fn rejects_non_body_root() {
        let err = PageSnapshot::from_toml("[body]\ntag = \"main\"\n").unwrap_err();
        assert!(matches!(err, SnapshotError::UnexpectedBodyTag { .. }));
    }
}
