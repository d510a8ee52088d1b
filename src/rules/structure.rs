//! Rules about links, nesting and focus

use super::{Rule, RuleContext, RuleResult, Severity};
use crate::dom::{ancestors, Document, NodeId};
use crate::scan::{closest_by_roles, resolve_role, KnownRole};

pub(super) fn link_target<D: Document + ?Sized>(
    node: NodeId,
    targets: &[&str],
    ctx: &RuleContext<'_, D>,
) -> Option<RuleResult> {
    let target = ctx.document.attribute(node, "target")?;
    targets.contains(&target).then(|| {
        RuleResult::new(
            Rule::LinkTarget,
            Severity::Warning,
            format!("opens a new window (target=\"{}\")", target),
        )
    })
}

pub(super) fn nested_interactive<D: Document + ?Sized>(
    node: NodeId,
    roles: &[KnownRole],
    ctx: &RuleContext<'_, D>,
) -> Option<RuleResult> {
    let doc = ctx.document;
    let outer = closest_by_roles(doc, node, roles)?;
    let outer_role = resolve_role(doc, outer).map_or_else(|| doc.tag_name(outer).to_string(), |r| r.to_string());
    let inner_role = ctx.role.map_or("element", |r| r.as_str());
    Some(RuleResult::new(
        Rule::NestedInteractive,
        Severity::Error,
        format!("{} is nested inside a {}", inner_role, outer_role),
    ))
}

pub(super) fn hidden_focusable<D: Document + ?Sized>(
    node: NodeId,
    ctx: &RuleContext<'_, D>,
) -> Option<RuleResult> {
    let doc = ctx.document;
    let hidden = std::iter::once(node)
        .chain(ancestors(doc, node))
        .any(|n| doc.attribute(n, "aria-hidden") == Some("true"));
    hidden.then(|| {
        RuleResult::new(
            Rule::HiddenFocusable,
            Severity::Error,
            "focusable element is inside aria-hidden content",
        )
    })
}

/// Whether `node` can receive keyboard focus through sequential navigation
pub fn is_focusable<D: Document + ?Sized>(doc: &D, node: NodeId) -> bool {
    if doc.has_attribute(node, "disabled") {
        return false;
    }
    if let Some(index) = doc.attribute(node, "tabindex") {
        if let Ok(index) = index.trim().parse::<i32>() {
            return index >= 0;
        }
    }
    match doc.tag_name(node) {
        "a" | "area" => doc.has_attribute(node, "href"),
        "input" => !doc
            .attribute(node, "type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
        "button" | "select" | "textarea" | "summary" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, PageSnapshot, Viewport};
    use crate::rules::test_support::{ids, run};
    use crate::rules::Tables;
    use pretty_assertions::assert_eq;

    fn page() -> PageSnapshot {
        PageSnapshot::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_focusability() {
        let mut page = page();
        let body = page.body_element();
        let cases = [
            (ElementSpec::new("a").attr("href", "/"), true),
            (ElementSpec::new("a"), false),
            (ElementSpec::new("button").attr("disabled", ""), false),
            (ElementSpec::new("input").attr("type", "hidden"), false),
            (ElementSpec::new("div").attr("tabindex", "0"), true),
            (ElementSpec::new("button").attr("tabindex", "-1"), false),
            (ElementSpec::new("div").attr("tabindex", "x"), false),
        ];
        for (spec, expected) in cases {
            let node = page.append(body, spec);
            assert_eq!(is_focusable(&page, node), expected, "{}", page.tag_name(node));
        }
    }

    #[test]
    fn test_link_in_same_window_is_fine() {
        let mut page = page();
        let body = page.body_element();
        let link = page.append(
            body,
            ElementSpec::new("a")
                .attr("href", "/")
                .attr("target", "_self")
                .text("Home"),
        );
        assert!(run(&page, link, &mut Tables::new(), false).is_empty());
    }

    #[test]
    fn test_nested_interactive_names_both_roles() {
        let mut page = page();
        let body = page.body_element();
        let link = page.append(body, ElementSpec::new("a").attr("href", "/"));
        let button = page.append(link, ElementSpec::new("button").text("Go"));

        let results = run(&page, button, &mut Tables::new(), false);
        assert_eq!(ids(&results), vec!["nested-interactive"]);
        assert_eq!(results[0].message, "button is nested inside a link");
    }

    #[test]
    fn test_hidden_focusable_through_ancestor() {
        let mut page = page();
        let body = page.body_element();
        let region = page.append(body, ElementSpec::new("div").attr("aria-hidden", "true"));
        let field = page.append(region, ElementSpec::new("textarea").attr("aria-label", "Notes"));
        let visible = page.append(body, ElementSpec::new("textarea").attr("aria-label", "Notes"));

        assert_eq!(
            ids(&run(&page, field, &mut Tables::new(), false)),
            vec!["hidden-focusable"]
        );
        assert!(run(&page, visible, &mut Tables::new(), false).is_empty());
    }
}
