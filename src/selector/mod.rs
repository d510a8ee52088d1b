//! CSS selector lists: lexing, parsing and matching
//!
//! Category tables and layer detection are written as selector lists, e.g.
//! `input:not([type=hidden]), [role~="textbox"]`. Only the structural subset
//! that a static snapshot can answer is supported: type, id, class and
//! attribute selectors, the four combinators and `:not()` / `:is()` /
//! `:where()`.

mod ast;
mod grammar;
pub mod lexer;
mod matching;

pub use ast::*;
pub use grammar::parse;
pub use matching::matches;

use std::str::FromStr;

use crate::error::SelectorError;

impl FromStr for SelectorList {
    type Err = SelectorError;

    /// Parse a selector list, keeping only the first diagnostic
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).map_err(|errs| {
            errs.into_iter()
                .next()
                .unwrap_or_else(|| SelectorError::Syntax {
                    span: 0..s.len(),
                    message: "invalid selector".to_string(),
                    expected: Vec::new(),
                })
        })
    }
}
