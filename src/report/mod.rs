//! Rendering of an [`Inspection`] for people and for tools

use std::fmt::Write;

use crate::scan::{ElementMeta, Inspection, Layer, LayerKind};

/// Human readable summary, one block per scope
pub fn render_text(inspection: &Inspection) -> String {
    let mut out = String::new();
    write_scope(
        &mut out,
        "page",
        inspection.width,
        inspection.height,
        &inspection.elements,
    );
    for layer in inspection.top_layers.iter().chain(&inspection.frame_layers) {
        write_scope(
            &mut out,
            &layer_title(layer),
            layer.width,
            layer.height,
            &layer.elements,
        );
    }
    out
}

/// The whole inspection as TOML
pub fn render_toml(inspection: &Inspection) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(inspection)
}

fn layer_title(layer: &Layer) -> String {
    match layer.kind {
        LayerKind::TopLayer => format!("top layer {}", layer.root),
        LayerKind::Frame { frame } => format!("frame {}", frame),
    }
}

fn write_scope(out: &mut String, title: &str, width: f64, height: f64, elements: &[ElementMeta]) {
    let noun = if elements.len() == 1 { "element" } else { "elements" };
    let _ = writeln!(out, "{} {}x{}, {} {}", title, width, height, elements.len(), noun);
    for meta in elements {
        let role = meta.role.map(|r| r.as_str()).unwrap_or("-");
        let _ = write!(
            out,
            "  {} {} {:?} at {},{} {}x{}",
            meta.node, role, meta.name, meta.absolute_x, meta.absolute_y, meta.width, meta.height
        );
        if let Some(category) = meta.category {
            let _ = write!(out, " [{}]", category);
        }
        out.push('\n');
        for result in &meta.rule_results {
            let _ = writeln!(out, "    {}", result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, PageSnapshot, Position, Viewport};
    use crate::scan::{inspect, InspectConfig, NoOverlay};

    fn checkout() -> PageSnapshot {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        page.set_title("Checkout");
        let body = page.body_element();
        page.update(body, ElementSpec::new("body").scroll_size(800.0, 1200.0));
        page.append(
            body,
            ElementSpec::new("button").rect(10.0, 10.0, 100.0, 30.0).text("Pay"),
        );
        page.append(body, ElementSpec::new("img").rect(10.0, 50.0, 64.0, 64.0));
        page
    }

    fn with_terms_dialog(mut page: PageSnapshot) -> PageSnapshot {
        let body = page.body_element();
        let dialog = page.append(
            body,
            ElementSpec::new("dialog")
                .attr("open", "")
                .position(Position::Fixed)
                .rect(200.0, 100.0, 300.0, 200.0),
        );
        page.append(
            dialog,
            ElementSpec::new("a")
                .attr("href", "/terms")
                .attr("target", "_blank")
                .rect(220.0, 120.0, 80.0, 20.0)
                .text("Terms"),
        );
        page
    }

    fn run(page: &PageSnapshot) -> Inspection {
        inspect(page, page.body_element(), &NoOverlay, &InspectConfig::new())
    }

    #[test]
    fn test_text_lists_elements_and_findings() {
        insta::assert_snapshot!(render_text(&run(&checkout())), @r###"
        page 800x1200, 3 elements
          #1 - "" at 0,0 0x0 [page]
            info [page-title]: title "Checkout"
            error [page-lang]: document element has no lang attribute
          #2 button "Pay" at 10,10 100x30 [button]
          #3 img "" at 10,50 64x64 [image]
            error [image-alt]: image has no alt attribute
        "###);
    }

    #[test]
    fn test_text_lists_top_layers_after_main() {
        insta::assert_snapshot!(render_text(&run(&with_terms_dialog(checkout()))), @r###"
        page 800x1200, 0 elements
        top layer #4 300x200, 1 element
          #5 link "Terms" at 20,20 80x20 [link]
            warning [link-target]: opens a new window (target="_blank")
        "###);
    }

    #[test]
    fn test_toml_serializes_layers() {
        let rendered = render_toml(&run(&with_terms_dialog(checkout()))).expect("inspection serializes");
        assert!(rendered.contains("[[top_layers]]"));
        assert!(rendered.contains("kind = \"top-layer\""));
        assert!(rendered.contains("rule = \"link-target\""));
    }
}
