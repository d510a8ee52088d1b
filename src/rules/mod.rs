//! Rule registry and evaluation
//!
//! Rules form a closed, ordered set. For every scanned node each applicable
//! rule runs in declaration order and its result (if any) is appended to the
//! node's results, so the order of results always follows [`RULES`]. Rules
//! may record table models in the pass-wide [`Tables`] accumulator; later
//! nodes in the same pass see them, earlier nodes and other passes never do.

mod naming;
mod page;
mod structure;
mod table;
pub mod tables;

pub use structure::is_focusable;
pub use tables::{CellPosition, TableModel, Tables};

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::dom::{Document, NodeId, Viewport};
use crate::scan::KnownRole;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Structured data some rules attach to their result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResultDetail {
    HeadingLevel { level: u8 },
    TableSize { rows: usize, columns: usize },
    /// 1-based
    TablePosition { row: usize, column: usize },
}

/// One rule's finding on one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    pub rule: &'static str,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ResultDetail>,
}

impl RuleResult {
    pub fn new(rule: Rule, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule: rule.id(),
            severity,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: ResultDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl fmt::Display for RuleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.rule, self.message)
    }
}

/// A rule could not be evaluated on a node
#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("node {node} has an invalid {name}=\"{value}\"")]
    InvalidAttribute {
        node: NodeId,
        name: &'static str,
        value: String,
    },

    #[error("cell {cell} is not part of the table model of {table}")]
    InconsistentTable { table: NodeId, cell: NodeId },
}

/// Per-rule configuration
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOptions {
    None,
    /// Roles whose nodes must have an accessible name
    NameRequired { roles: &'static [KnownRole] },
    /// `target` values that open a new browsing context
    LinkTarget { targets: &'static [&'static str] },
    /// Roles that take focus and receive activation
    Interactive { roles: &'static [KnownRole] },
}

/// Everything a rule may consult while evaluating one node
pub struct RuleContext<'a, D: ?Sized> {
    /// Table models recorded earlier in this pass
    pub tables: &'a mut Tables,
    pub document: &'a D,
    pub viewport: Viewport,
    pub name: &'a str,
    pub role: Option<KnownRole>,
    /// The document is embedded content (e.g. an `srcdoc` frame)
    pub embedded: bool,
}

const NAME_REQUIRED: &[KnownRole] = &[
    KnownRole::Button,
    KnownRole::Link,
    KnownRole::Heading,
    KnownRole::Checkbox,
    KnownRole::Radio,
    KnownRole::Switch,
    KnownRole::Textbox,
    KnownRole::Searchbox,
    KnownRole::Combobox,
    KnownRole::Slider,
    KnownRole::Spinbutton,
    KnownRole::Listbox,
    KnownRole::Menuitem,
    KnownRole::Tab,
    KnownRole::Dialog,
    KnownRole::Alertdialog,
];

const NEW_WINDOW_TARGETS: &[&str] = &["_blank"];

const INTERACTIVE: &[KnownRole] = &[
    KnownRole::Button,
    KnownRole::Link,
    KnownRole::Checkbox,
    KnownRole::Radio,
    KnownRole::Switch,
    KnownRole::Textbox,
    KnownRole::Searchbox,
    KnownRole::Combobox,
    KnownRole::Slider,
    KnownRole::Spinbutton,
    KnownRole::Listbox,
    KnownRole::Menuitem,
    KnownRole::Tab,
];

const TABLE_ROLES: &[KnownRole] = &[KnownRole::Table, KnownRole::Grid, KnownRole::Treegrid];

const CELL_ROLES: &[KnownRole] = &[
    KnownRole::Cell,
    KnownRole::Gridcell,
    KnownRole::Columnheader,
    KnownRole::Rowheader,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    PageTitle,
    PageLang,
    ImageAlt,
    AccessibleName,
    HeadingLevel,
    LinkTarget,
    NestedInteractive,
    HiddenFocusable,
    TableSize,
    TablePosition,
}

/// Every rule, in evaluation order
pub const RULES: [Rule; 10] = [
    Rule::PageTitle,
    Rule::PageLang,
    Rule::ImageAlt,
    Rule::AccessibleName,
    Rule::HeadingLevel,
    Rule::LinkTarget,
    Rule::NestedInteractive,
    Rule::HiddenFocusable,
    Rule::TableSize,
    Rule::TablePosition,
];

impl Rule {
    pub fn id(self) -> &'static str {
        match self {
            Rule::PageTitle => "page-title",
            Rule::PageLang => "page-lang",
            Rule::ImageAlt => "image-alt",
            Rule::AccessibleName => "accessible-name",
            Rule::HeadingLevel => "heading-level",
            Rule::LinkTarget => "link-target",
            Rule::NestedInteractive => "nested-interactive",
            Rule::HiddenFocusable => "hidden-focusable",
            Rule::TableSize => "table-size",
            Rule::TablePosition => "table-position",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Rule::PageTitle => "the document has a title",
            Rule::PageLang => "the document element declares a language",
            Rule::ImageAlt => "images carry an alt attribute",
            Rule::AccessibleName => "controls, links and headings have an accessible name",
            Rule::HeadingLevel => "reports the level of each heading",
            Rule::LinkTarget => "links that open a new window",
            Rule::NestedInteractive => "interactive elements inside other interactive elements",
            Rule::HiddenFocusable => "focusable elements hidden with aria-hidden",
            Rule::TableSize => "reports rows and columns of each table",
            Rule::TablePosition => "reports the row and column of each table cell",
        }
    }

    pub fn default_options(self) -> RuleOptions {
        match self {
            Rule::AccessibleName => RuleOptions::NameRequired {
                roles: NAME_REQUIRED,
            },
            Rule::LinkTarget => RuleOptions::LinkTarget {
                targets: NEW_WINDOW_TARGETS,
            },
            Rule::NestedInteractive => RuleOptions::Interactive {
                roles: INTERACTIVE,
            },
            _ => RuleOptions::None,
        }
    }

    /// Whether this rule looks at `node` at all
    pub fn applies<D: Document + ?Sized>(
        self,
        doc: &D,
        node: NodeId,
        role: Option<KnownRole>,
    ) -> bool {
        let role_in = |roles: &[KnownRole]| role.is_some_and(|r| roles.contains(&r));
        match self {
            Rule::PageTitle | Rule::PageLang => doc.body() == Some(node),
            Rule::ImageAlt => doc.tag_name(node) == "img",
            Rule::AccessibleName => match self.default_options() {
                RuleOptions::NameRequired { roles } => role_in(roles),
                _ => false,
            },
            Rule::HeadingLevel => role == Some(KnownRole::Heading),
            Rule::LinkTarget => role == Some(KnownRole::Link),
            Rule::NestedInteractive => match self.default_options() {
                RuleOptions::Interactive { roles } => role_in(roles),
                _ => false,
            },
            Rule::HiddenFocusable => is_focusable(doc, node),
            Rule::TableSize => role_in(TABLE_ROLES),
            Rule::TablePosition => role_in(CELL_ROLES),
        }
    }

    /// Evaluate this rule on `node`. `Ok(None)` means nothing to report.
    pub fn evaluate<D: Document + ?Sized>(
        self,
        node: NodeId,
        options: &RuleOptions,
        ctx: &mut RuleContext<'_, D>,
    ) -> Result<Option<RuleResult>, RuleError> {
        match self {
            Rule::PageTitle => Ok(page::title(ctx)),
            Rule::PageLang => Ok(page::lang(ctx)),
            Rule::ImageAlt => Ok(naming::image_alt(node, ctx)),
            Rule::AccessibleName => Ok(naming::accessible_name(ctx)),
            Rule::HeadingLevel => naming::heading_level(node, ctx).map(Some),
            Rule::LinkTarget => {
                let targets = match options {
                    RuleOptions::LinkTarget { targets } => *targets,
                    _ => NEW_WINDOW_TARGETS,
                };
                Ok(structure::link_target(node, targets, ctx))
            }
            Rule::NestedInteractive => {
                let roles = match options {
                    RuleOptions::Interactive { roles } => *roles,
                    _ => INTERACTIVE,
                };
                Ok(structure::nested_interactive(node, roles, ctx))
            }
            Rule::HiddenFocusable => Ok(structure::hidden_focusable(node, ctx)),
            Rule::TableSize => Ok(Some(table::size(node, ctx))),
            Rule::TablePosition => table::position(node, TABLE_ROLES, ctx),
        }
    }
}

/// Run every applicable rule on `node` in registry order.
///
/// A failing rule is logged and contributes nothing; the remaining rules
/// still run.
pub fn evaluate_rules<D: Document + ?Sized>(
    node: NodeId,
    ctx: &mut RuleContext<'_, D>,
) -> Vec<RuleResult> {
    let mut results = Vec::new();
    for rule in RULES {
        if !rule.applies(ctx.document, node, ctx.role) {
            continue;
        }
        match rule.evaluate(node, &rule.default_options(), ctx) {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(err) => warn!(rule = rule.id(), %node, error = %err, "rule evaluation failed"),
        }
    }
    results
}


#[cfg(test)]
mod tests {
    use super::test_support::{ids, run};
    use super::*;
    use crate::dom::{ElementSpec, PageSnapshot};
    use pretty_assertions::assert_eq;

    fn page() -> PageSnapshot {
        PageSnapshot::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_registry_order_and_ids() {
        let ids: Vec<_> = RULES.iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec![
                "page-title",
                "page-lang",
                "image-alt",
                "accessible-name",
                "heading-level",
                "link-target",
                "nested-interactive",
                "hidden-focusable",
                "table-size",
                "table-position",
            ]
        );
    }

    #[test]
    fn test_results_follow_declaration_order() {
        let mut page = page();
        let body = page.body_element();
        let button = page.append(body, ElementSpec::new("button"));
        let link = page.append(
            button,
            ElementSpec::new("a")
                .attr("href", "/")
                .attr("target", "_blank")
                .attr("aria-hidden", "true"),
        );

        let results = run(&page, link, &mut Tables::new(), false);
        assert_eq!(
            ids(&results),
            vec![
                "accessible-name",
                "link-target",
                "nested-interactive",
                "hidden-focusable"
            ]
        );
    }

    #[test]
    fn test_failing_rule_is_omitted_and_others_continue() {
        let mut page = page();
        let body = page.body_element();
        let heading = page.append(body, ElementSpec::new("h2").attr("aria-level", "deep"));

        let results = run(&page, heading, &mut Tables::new(), false);
        assert_eq!(ids(&results), vec!["accessible-name"]);
        assert_eq!(
            Rule::HeadingLevel.evaluate(
                heading,
                &RuleOptions::None,
                &mut RuleContext {
                    tables: &mut Tables::new(),
                    document: &page,
                    viewport: Viewport::default(),
                    name: "",
                    role: Some(KnownRole::Heading),
                    embedded: false,
                }
            ),
            Err(RuleError::InvalidAttribute {
                node: heading,
                name: "aria-level",
                value: "deep".to_string()
            })
        );
    }

    #[test]
    fn test_plain_nodes_get_no_results() {
        let mut page = page();
        let body = page.body_element();
        let div = page.append(body, ElementSpec::new("div"));
        assert!(run(&page, div, &mut Tables::new(), false).is_empty());
    }
}
