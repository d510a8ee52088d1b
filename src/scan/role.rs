//! Role and accessible-name resolution

use std::fmt;

use serde::{Serialize, Serializer};

use crate::dom::{Document, NodeId};

macro_rules! known_roles {
    ($($variant:ident => $name:literal,)*) => {
        /// The closed set of accessibility roles the scanner reports
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum KnownRole {
            $($variant,)*
        }

        impl KnownRole {
            pub const ALL: &'static [KnownRole] = &[$(KnownRole::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(KnownRole::$variant => $name,)*
                }
            }

            /// Exact, case-sensitive lookup of a role token
            pub fn from_token(token: &str) -> Option<Self> {
                match token {
                    $($name => Some(KnownRole::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

known_roles! {
    Alert => "alert",
    Alertdialog => "alertdialog",
    Application => "application",
    Article => "article",
    Banner => "banner",
    Blockquote => "blockquote",
    Button => "button",
    Caption => "caption",
    Cell => "cell",
    Checkbox => "checkbox",
    Code => "code",
    Columnheader => "columnheader",
    Combobox => "combobox",
    Command => "command",
    Complementary => "complementary",
    Composite => "composite",
    Contentinfo => "contentinfo",
    Definition => "definition",
    Deletion => "deletion",
    Dialog => "dialog",
    Directory => "directory",
    Document => "document",
    Emphasis => "emphasis",
    Feed => "feed",
    Figure => "figure",
    Form => "form",
    Generic => "generic",
    Grid => "grid",
    Gridcell => "gridcell",
    Group => "group",
    Heading => "heading",
    Img => "img",
    Input => "input",
    Insertion => "insertion",
    Landmark => "landmark",
    Link => "link",
    List => "list",
    Listbox => "listbox",
    Listitem => "listitem",
    Log => "log",
    Main => "main",
    Marquee => "marquee",
    Math => "math",
    Meter => "meter",
    Menu => "menu",
    Menubar => "menubar",
    Menuitem => "menuitem",
    Menuitemcheckbox => "menuitemcheckbox",
    Menuitemradio => "menuitemradio",
    Navigation => "navigation",
    None => "none",
    Note => "note",
    Option => "option",
    Paragraph => "paragraph",
    Presentation => "presentation",
    Progressbar => "progressbar",
    Radio => "radio",
    Radiogroup => "radiogroup",
    Range => "range",
    Region => "region",
    Roletype => "roletype",
    Row => "row",
    Rowgroup => "rowgroup",
    Rowheader => "rowheader",
    Scrollbar => "scrollbar",
    Search => "search",
    Searchbox => "searchbox",
    Section => "section",
    Sectionhead => "sectionhead",
    Select => "select",
    Separator => "separator",
    Slider => "slider",
    Spinbutton => "spinbutton",
    Status => "status",
    Strong => "strong",
    Structure => "structure",
    Subscript => "subscript",
    Superscript => "superscript",
    Switch => "switch",
    Tab => "tab",
    Table => "table",
    Tablist => "tablist",
    Tabpanel => "tabpanel",
    Term => "term",
    Textbox => "textbox",
    Time => "time",
    Timer => "timer",
    Toolbar => "toolbar",
    Tooltip => "tooltip",
    Tree => "tree",
    Treegrid => "treegrid",
    Treeitem => "treeitem",
    Widget => "widget",
    Window => "window",
}

impl fmt::Display for KnownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for KnownRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Resolve a node to a known role.
///
/// The platform's answer wins when it is a known role, then the first known
/// token of the `role` attribute, then the input-type table for `<input>`.
pub fn resolve_role<D: Document + ?Sized>(doc: &D, node: NodeId) -> Option<KnownRole> {
    if let Some(role) = doc
        .computed_role(node)
        .and_then(|r| KnownRole::from_token(&r))
    {
        return Some(role);
    }
    if let Some(role) = doc
        .attribute(node, "role")
        .and_then(|attr| attr.split_whitespace().find_map(KnownRole::from_token))
    {
        return Some(role);
    }
    if doc.tag_name(node) == "input" {
        let has_list = doc.attribute(node, "list").is_some_and(|l| !l.is_empty());
        return input_role(doc.attribute(node, "type"), has_list);
    }
    None
}

/// Role for an `<input>` by its `type` attribute.
///
/// Types without an ARIA mapping get the role browsers expose in practice
/// (e.g. `color` and `file` behave as buttons, date and time pickers as
/// textboxes). `hidden` has no role.
pub fn input_role(input_type: Option<&str>, has_list: bool) -> Option<KnownRole> {
    let role = match input_type.map(str::to_ascii_lowercase).as_deref() {
        Some("button" | "reset" | "submit" | "image") => KnownRole::Button,
        Some("checkbox") => KnownRole::Checkbox,
        Some("radio") => KnownRole::Radio,
        Some("range") => KnownRole::Slider,
        Some("number") => KnownRole::Spinbutton,
        Some("search") if has_list => KnownRole::Combobox,
        Some("search") => KnownRole::Searchbox,
        Some("hidden") => return None,
        Some("color" | "file") => KnownRole::Button,
        Some("date" | "month" | "week" | "time" | "datetime-local" | "password") => {
            KnownRole::Textbox
        }
        _ if has_list => KnownRole::Combobox,
        _ => KnownRole::Textbox,
    };
    Some(role)
}

/// The node's accessible name, empty when it has none
pub fn resolve_name<D: Document + ?Sized>(doc: &D, node: NodeId) -> String {
    doc.accessible_name(node).unwrap_or_default()
}

/// Nearest ancestor (the node itself excluded) carrying one of `roles`.
///
/// An ancestor qualifies through its resolved role or through any token of
/// its `role` attribute, so `role="unknownbutton button"` counts as a button.
pub fn closest_by_roles<D: Document + ?Sized>(
    doc: &D,
    node: NodeId,
    roles: &[KnownRole],
) -> Option<NodeId> {
    crate::dom::ancestors(doc, node).find(|&ancestor| {
        let resolved = resolve_role(doc, ancestor).is_some_and(|r| roles.contains(&r));
        resolved
            || doc.attribute(ancestor, "role").is_some_and(|attr| {
                attr.split_whitespace()
                    .filter_map(KnownRole::from_token)
                    .any(|r| roles.contains(&r))
            })
    })
}
