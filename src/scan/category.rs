//! Category classification and the category → selector table

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::role::KnownRole;
use crate::dom::{Document, NodeId};
use crate::selector::SelectorList;
use crate::settings::CategorySettings;

/// Semantic category of a scanned node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Page,
    Landmark,
    Heading,
    Image,
    Button,
    Link,
    FormControl,
    Table,
    List,
    LiveRegion,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Page,
        Category::Landmark,
        Category::Heading,
        Category::Image,
        Category::Button,
        Category::Link,
        Category::FormControl,
        Category::Table,
        Category::List,
        Category::LiveRegion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Page => "page",
            Category::Landmark => "landmark",
            Category::Heading => "heading",
            Category::Image => "image",
            Category::Button => "button",
            Category::Link => "link",
            Category::FormControl => "form-control",
            Category::Table => "table",
            Category::List => "list",
            Category::LiveRegion => "live-region",
        }
    }

    /// Selector source for this category; `page` is selected structurally
    pub fn selector_source(self) -> Option<&'static str> {
        let source = match self {
            Category::Page => return None,
            Category::Landmark => concat!(
                "header, footer, nav, main, aside, search, ",
                "form[aria-label], form[aria-labelledby], ",
                "section[aria-label], section[aria-labelledby], ",
                "[role~=banner], [role~=contentinfo], [role~=navigation], [role~=main], ",
                "[role~=complementary], [role~=region], [role~=form], [role~=search]"
            ),
            Category::Heading => "h1, h2, h3, h4, h5, h6, [role~=heading]",
            Category::Image => "img, svg, [role~=img]",
            Category::Button => concat!(
                "button, input[type=button], input[type=submit], ",
                "input[type=reset], input[type=image], [role~=button]"
            ),
            Category::Link => "a[href], area[href], [role~=link]",
            Category::FormControl => concat!(
                "input:not([type=button], [type=submit], [type=reset], [type=image], [type=hidden]), ",
                "select, textarea, ",
                "[role~=textbox], [role~=searchbox], [role~=combobox], [role~=checkbox], ",
                "[role~=radio], [role~=switch], [role~=slider], [role~=spinbutton], [role~=listbox]"
            ),
            Category::Table => concat!(
                "table, th, td, [role~=table], [role~=grid], [role~=treegrid], ",
                "[role~=cell], [role~=gridcell], [role~=columnheader], [role~=rowheader]"
            ),
            Category::List => "ul, ol, li, dl, menu, [role~=list], [role~=listitem]",
            Category::LiveRegion => concat!(
                "output, [aria-live], [role~=alert], [role~=status], [role~=log], ",
                "[role~=timer], [role~=marquee]"
            ),
        };
        Some(source)
    }

    /// Parsed selectors for this category
    pub fn selectors(self) -> Option<&'static SelectorList> {
        SELECTORS
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, list)| list)
    }

    fn from_role(role: KnownRole) -> Option<Self> {
        use KnownRole as R;
        let category = match role {
            R::Banner
            | R::Contentinfo
            | R::Navigation
            | R::Main
            | R::Complementary
            | R::Region
            | R::Form
            | R::Search => Category::Landmark,
            R::Heading => Category::Heading,
            R::Img => Category::Image,
            R::Button => Category::Button,
            R::Link => Category::Link,
            R::Textbox
            | R::Searchbox
            | R::Combobox
            | R::Checkbox
            | R::Radio
            | R::Switch
            | R::Slider
            | R::Spinbutton
            | R::Listbox => Category::FormControl,
            R::Table
            | R::Grid
            | R::Treegrid
            | R::Cell
            | R::Gridcell
            | R::Columnheader
            | R::Rowheader => Category::Table,
            R::List | R::Listitem => Category::List,
            R::Alert | R::Status | R::Log | R::Timer | R::Marquee => Category::LiveRegion,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

static SELECTORS: Lazy<Vec<(Category, SelectorList)>> = Lazy::new(|| {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let source = category.selector_source()?;
            let list = source
                .parse::<SelectorList>()
                .expect("built-in category selectors are valid");
            Some((category, list))
        })
        .collect()
});

/// Selector lists of every enabled category, in category order
pub fn enabled_selectors(settings: &CategorySettings) -> Vec<&'static SelectorList> {
    Category::ALL
        .into_iter()
        .filter(|&c| settings.is_enabled(c))
        .filter_map(Category::selectors)
        .collect()
}

/// Classify a node.
///
/// The body is the page. Otherwise the role decides; nodes whose role says
/// nothing fall back to the first category whose selectors match them.
pub fn classify<D: Document + ?Sized>(
    doc: &D,
    node: NodeId,
    role: Option<KnownRole>,
) -> Option<Category> {
    if doc.body() == Some(node) {
        return Some(Category::Page);
    }
    if let Some(category) = role.and_then(Category::from_role) {
        return Some(category);
    }
    SELECTORS
        .iter()
        .find(|(_, list)| doc.matches(node, list))
        .map(|(category, _)| *category)
}
