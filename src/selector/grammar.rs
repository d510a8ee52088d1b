//! Selector parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::SelectorError;
use crate::selector::ast::*;
use crate::selector::lexer::{lex, Token};

/// Parse a selector list such as `nav a[href], [role~="link"]`
pub fn parse(input: &str) -> Result<SelectorList, Vec<SelectorError>> {
    let len = input.len();

    let token_iter = lex(input).map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    selector_list_parser()
        .then_ignore(end())
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

fn selector_list_parser<'a, I>() -> impl Parser<'a, I, SelectorList, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|list| {
        let ident = select! {
            Token::Ident(s) => s,
        };

        let value = select! {
            Token::Ident(s) => s,
            Token::String(s) => s,
            Token::Number(s) => s,
        };

        let attr_op = select! {
            Token::Equals => AttrOp::Equals,
            Token::Includes => AttrOp::Includes,
            Token::DashMatch => AttrOp::DashMatch,
            Token::Prefix => AttrOp::Prefix,
            Token::Suffix => AttrOp::Suffix,
            Token::Substring => AttrOp::Substring,
        };

        let id = select! {
            Token::Id(s) => SimpleSelector::Id(s),
        };

        let class = just(Token::Dot)
            .ignore_then(ident.clone())
            .map(SimpleSelector::Class);

        let attribute = ident
            .clone()
            .then(attr_op.then(value).or_not())
            .delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
            .map(|(name, op)| {
                SimpleSelector::Attribute(AttributeSelector {
                    name: name.to_ascii_lowercase(),
                    op,
                })
            });

        // Only the logical pseudo-classes carry meaning for a static snapshot
        let pseudo = just(Token::Colon)
            .ignore_then(ident.clone())
            .then(
                list.delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
                    .or_not(),
            )
            .try_map(|(name, args), span| match (name.to_ascii_lowercase().as_str(), args) {
                ("not", Some(args)) => Ok(SimpleSelector::Not(args)),
                ("is" | "where", Some(args)) => Ok(SimpleSelector::Is(args)),
                ("not" | "is" | "where", None) => Err(Rich::custom(
                    span,
                    format!("':{}' needs a selector list argument", name),
                )),
                _ => Err(Rich::custom(span, format!("unsupported pseudo-class ':{}'", name))),
            });

        let filter = choice((id, class, attribute, pseudo));

        let type_selector = choice((
            ident.map(|tag| Some(tag.to_ascii_lowercase())),
            just(Token::Star).to(None),
        ));

        let compound = choice((
            type_selector
                .then(filter.clone().repeated().collect::<Vec<_>>())
                .map(|(tag, filters)| CompoundSelector { tag, filters }),
            filter
                .repeated()
                .at_least(1)
                .collect::<Vec<_>>()
                .map(|filters| CompoundSelector { tag: None, filters }),
        ));

        let combinator = select! {
            Token::Whitespace => Combinator::Descendant,
            Token::Child => Combinator::Child,
            Token::Adjacent => Combinator::NextSibling,
            Token::Sibling => Combinator::SubsequentSibling,
        };

        let complex = compound
            .clone()
            .then(combinator.then(compound).repeated().collect::<Vec<_>>())
            .map(|(head, tail)| ComplexSelector { head, tail });

        complex
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<_>>()
            .map(SelectorList)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compound(tag: Option<&str>, filters: Vec<SimpleSelector>) -> CompoundSelector {
        CompoundSelector {
            tag: tag.map(str::to_string),
            filters,
        }
    }

    fn attr(name: &str, op: Option<(AttrOp, &str)>) -> SimpleSelector {
        SimpleSelector::Attribute(AttributeSelector {
            name: name.to_string(),
            op: op.map(|(o, v)| (o, v.to_string())),
        })
    }

    #[test]
    fn test_parse_type_and_attribute() {
        let list = parse("a[href]").expect("Should parse");
        assert_eq!(
            list,
            SelectorList(vec![ComplexSelector {
                head: compound(Some("a"), vec![attr("href", None)]),
                tail: vec![],
            }])
        );
    }

    #[test]
    fn test_parse_combinators() {
        let list = parse("nav ul > li + li ~ a").expect("Should parse");
        let combinators: Vec<_> = list.0[0].tail.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            combinators,
            vec![
                Combinator::Descendant,
                Combinator::Child,
                Combinator::NextSibling,
                Combinator::SubsequentSibling
            ]
        );
    }

    #[test]
    fn test_parse_filters_without_type() {
        let list = parse(r#"#main.wide[role~="region"]"#).expect("Should parse");
        assert_eq!(
            list.0[0].head,
            compound(
                None,
                vec![
                    SimpleSelector::Id("main".to_string()),
                    SimpleSelector::Class("wide".to_string()),
                    attr("role", Some((AttrOp::Includes, "region"))),
                ]
            )
        );
    }

    #[test]
    fn test_parse_nested_not() {
        let list = parse("input:not([type=hidden], [type=button])").expect("Should parse");
        match &list.0[0].head.filters[0] {
            SimpleSelector::Not(inner) => assert_eq!(inner.0.len(), 2),
            other => panic!("Expected :not, got {:?}", other),
        }
    }

    #[test]
    fn test_type_names_are_lowercased() {
        let list = parse("BUTTON, [ARIA-LABEL]").expect("Should parse");
        assert_eq!(list.to_string(), "button, [aria-label]");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let source = r#"section[aria-label] > h2 ~ p, :is(img, svg):not([alt=""])"#;
        let list = parse(source).expect("Should parse");
        let reparsed = parse(&list.to_string()).expect("Display output should parse");
        assert_eq!(list, reparsed);
    }

    #[test]
    fn test_unknown_pseudo_class_is_an_error() {
        let errs = parse("a:hover").unwrap_err();
        assert!(errs[0].to_string().contains("unsupported pseudo-class ':hover'"));
    }

    #[test]
    fn test_dangling_combinator_is_an_error() {
        assert!(parse("ul >").is_err());
        assert!(parse("").is_err());
        assert!(parse("a,").is_err());
    }
}
