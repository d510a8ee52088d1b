//! Selector syntax tree

use std::fmt;

/// Comma-separated selector list; matches when any member matches
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

/// Compound selectors joined by combinators, written left to right
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub head: CompoundSelector,
    pub tail: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// The compound at `index`, where 0 is the head
    pub fn compound(&self, index: usize) -> &CompoundSelector {
        match index {
            0 => &self.head,
            i => &self.tail[i - 1].1,
        }
    }
}

/// Optional type selector plus filters, all applying to one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    /// Lowercase tag name; `None` for `*` or an implied universal selector
    pub tag: Option<String>,
    pub filters: Vec<SimpleSelector>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimpleSelector {
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
    Not(SelectorList),
    /// `:is()` and `:where()`; specificity is irrelevant here
    Is(SelectorList),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    /// Lowercase attribute name
    pub name: String,
    pub op: Option<(AttrOp, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `=`
    Equals,
    /// `~=` whitespace-separated token
    Includes,
    /// `|=` exact or followed by `-`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, complex) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", complex)?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for (combinator, compound) in &self.tail {
            let sep = match combinator {
                Combinator::Descendant => " ",
                Combinator::Child => " > ",
                Combinator::NextSibling => " + ",
                Combinator::SubsequentSibling => " ~ ",
            };
            write!(f, "{}{}", sep, compound)?;
        }
        Ok(())
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.tag, self.filters.is_empty()) {
            (Some(tag), _) => write!(f, "{}", tag)?,
            (None, true) => write!(f, "*")?,
            (None, false) => {}
        }
        for filter in &self.filters {
            match filter {
                SimpleSelector::Id(id) => write!(f, "#{}", id)?,
                SimpleSelector::Class(class) => write!(f, ".{}", class)?,
                SimpleSelector::Attribute(attr) => write!(f, "{}", attr)?,
                SimpleSelector::Not(list) => write!(f, ":not({})", list)?,
                SimpleSelector::Is(list) => write!(f, ":is({})", list)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            None => write!(f, "[{}]", self.name),
            Some((op, value)) => {
                let op = match op {
                    AttrOp::Equals => "=",
                    AttrOp::Includes => "~=",
                    AttrOp::DashMatch => "|=",
                    AttrOp::Prefix => "^=",
                    AttrOp::Suffix => "$=",
                    AttrOp::Substring => "*=",
                };
                write!(f, "[{}{}\"{}\"]", self.name, op, value)
            }
        }
    }
}
