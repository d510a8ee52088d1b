//! Right-to-left selector matching against a [`Document`]

use crate::dom::{ancestors, preceding_siblings, Document, NodeId};
use crate::selector::ast::*;

/// Whether `node` matches any selector in `list`
pub fn matches<D: Document + ?Sized>(doc: &D, node: NodeId, list: &SelectorList) -> bool {
    list.0
        .iter()
        .any(|complex| match_at(doc, node, complex, complex.tail.len()))
}

/// Match compound `index` at `node`, then everything to its left
fn match_at<D: Document + ?Sized>(
    doc: &D,
    node: NodeId,
    complex: &ComplexSelector,
    index: usize,
) -> bool {
    if !matches_compound(doc, node, complex.compound(index)) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let left = index - 1;
    match complex.tail[left].0 {
        Combinator::Descendant => ancestors(doc, node).any(|a| match_at(doc, a, complex, left)),
        Combinator::Child => doc
            .parent(node)
            .is_some_and(|p| match_at(doc, p, complex, left)),
        Combinator::NextSibling => preceding_siblings(doc, node)
            .first()
            .is_some_and(|&s| match_at(doc, s, complex, left)),
        Combinator::SubsequentSibling => preceding_siblings(doc, node)
            .into_iter()
            .any(|s| match_at(doc, s, complex, left)),
    }
}

fn matches_compound<D: Document + ?Sized>(
    doc: &D,
    node: NodeId,
    compound: &CompoundSelector,
) -> bool {
    if let Some(tag) = &compound.tag {
        if !doc.tag_name(node).eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    compound.filters.iter().all(|filter| match filter {
        SimpleSelector::Id(id) => doc.attribute(node, "id") == Some(id.as_str()),
        SimpleSelector::Class(class) => doc
            .attribute(node, "class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == class)),
        SimpleSelector::Attribute(attr) => matches_attribute(doc.attribute(node, &attr.name), attr),
        SimpleSelector::Not(list) => !matches(doc, node, list),
        SimpleSelector::Is(list) => matches(doc, node, list),
    })
}

/// HTML attributes whose values selectors compare ASCII case-insensitively
const CASE_INSENSITIVE_VALUES: &[&str] = &[
    "autocomplete",
    "checked",
    "dir",
    "disabled",
    "method",
    "multiple",
    "readonly",
    "scope",
    "shape",
    "type",
];

fn matches_attribute(actual: Option<&str>, selector: &AttributeSelector) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let Some((op, expected)) = &selector.op else {
        return true;
    };
    if CASE_INSENSITIVE_VALUES
        .iter()
        .any(|name| selector.name.eq_ignore_ascii_case(name))
    {
        return matches_value(
            *op,
            &actual.to_ascii_lowercase(),
            &expected.to_ascii_lowercase(),
        );
    }
    matches_value(*op, actual, expected)
}

fn matches_value(op: AttrOp, actual: &str, expected: &str) -> bool {
    match op {
        AttrOp::Equals => actual == expected,
        AttrOp::Includes => {
            !expected.is_empty()
                && !expected.contains(char::is_whitespace)
                && actual.split_whitespace().any(|t| t == expected)
        }
        AttrOp::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
        AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
        AttrOp::Substring => !expected.is_empty() && actual.contains(expected),
    }
}
