//! Rules about text alternatives, names and headings

use super::{ResultDetail, Rule, RuleContext, RuleError, RuleResult, Severity};
use crate::dom::{Document, NodeId};

pub(super) fn image_alt<D: Document + ?Sized>(
    node: NodeId,
    ctx: &RuleContext<'_, D>,
) -> Option<RuleResult> {
    match ctx.document.attribute(node, "alt") {
        None => Some(RuleResult::new(
            Rule::ImageAlt,
            Severity::Error,
            "image has no alt attribute",
        )),
        Some("") => Some(RuleResult::new(
            Rule::ImageAlt,
            Severity::Info,
            "decorative image (empty alt)",
        )),
        Some(_) => None,
    }
}

pub(super) fn accessible_name<D: Document + ?Sized>(ctx: &RuleContext<'_, D>) -> Option<RuleResult> {
    if !ctx.name.trim().is_empty() {
        return None;
    }
    let what = ctx.role.map_or("element", |r| r.as_str());
    Some(RuleResult::new(
        Rule::AccessibleName,
        Severity::Error,
        format!("{} has no accessible name", what),
    ))
}

pub(super) fn heading_level<D: Document + ?Sized>(
    node: NodeId,
    ctx: &RuleContext<'_, D>,
) -> Result<RuleResult, RuleError> {
    let doc = ctx.document;
    let level = match doc.attribute(node, "aria-level") {
        Some(value) => value
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|&l| l > 0)
            .ok_or_else(|| RuleError::InvalidAttribute {
                node,
                name: "aria-level",
                value: value.to_string(),
            })?,
        None => match doc.tag_name(node).as_bytes() {
            [b'h', digit @ b'1'..=b'6'] => digit - b'0',
            _ => 2,
        },
    };
    Ok(RuleResult::new(
        Rule::HeadingLevel,
        Severity::Info,
        format!("heading level {}", level),
    )
    .with_detail(ResultDetail::HeadingLevel { level }))
}
