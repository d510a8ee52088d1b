//! Lexer for CSS selector lists using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// Only survives `lex` where it separates two compound selectors
    #[regex(r"[ \t\n\r\x0C]+")]
    Whitespace,

    // Combinators
    #[token(">")]
    Child,
    #[token("+")]
    Adjacent,
    #[token("~")]
    Sibling,

    // Attribute operators (longer patterns win over `~` and `*`)
    #[token("=")]
    Equals,
    #[token("~=")]
    Includes,
    #[token("|=")]
    DashMatch,
    #[token("^=")]
    Prefix,
    #[token("$=")]
    Suffix,
    #[token("*=")]
    Substring,

    // Delimiters
    #[token("*")]
    Star,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,

    #[regex(r"#-?[_a-zA-Z][-_a-zA-Z0-9]*", |lex| lex.slice()[1..].to_string())]
    Id(String),

    #[regex(r"-?[_a-zA-Z][-_a-zA-Z0-9]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    String(String),

    /// Kept as written so `[aria-level=2]` compares against the raw text
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    /// A character outside the selector grammar
    Unknown,
}

impl Token {
    fn ends_compound(&self) -> bool {
        matches!(
            self,
            Token::Ident(_) | Token::Id(_) | Token::Star | Token::BracketClose | Token::ParenClose
        )
    }

    fn starts_compound(&self) -> bool {
        matches!(
            self,
            Token::Ident(_)
                | Token::Id(_)
                | Token::Star
                | Token::Dot
                | Token::Colon
                | Token::BracketOpen
        )
    }
}

/// Lex input string into tokens with spans.
///
/// Whitespace is dropped unless it sits between the end of one compound
/// selector and the start of the next, where it is the descendant combinator.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    let tokens: Vec<(Token, Span)> = Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Unknown), span))
        .collect();

    let mut kept = Vec::with_capacity(tokens.len());
    for (index, (tok, span)) in tokens.iter().enumerate() {
        if *tok == Token::Whitespace {
            let before = index.checked_sub(1).map(|i| &tokens[i].0);
            let after = tokens.get(index + 1).map(|(t, _)| t);
            let separates = before.is_some_and(Token::ends_compound)
                && after.is_some_and(Token::starts_compound);
            if !separates {
                continue;
            }
        }
        kept.push((tok.clone(), span.clone()));
    }
    kept.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_descendant_whitespace_is_kept() {
        assert_eq!(
            tokens("nav a"),
            vec![
                Token::Ident("nav".to_string()),
                Token::Whitespace,
                Token::Ident("a".to_string())
            ]
        );
    }

    #[test]
    fn test_whitespace_around_punctuation_is_dropped() {
        assert_eq!(
            tokens(" ul > li , [ role ~= \"list\" ] "),
            vec![
                Token::Ident("ul".to_string()),
                Token::Child,
                Token::Ident("li".to_string()),
                Token::Comma,
                Token::BracketOpen,
                Token::Ident("role".to_string()),
                Token::Includes,
                Token::String("list".to_string()),
                Token::BracketClose,
            ]
        );
    }

    #[test]
    fn test_attribute_operators() {
        assert_eq!(
            tokens("= ~= |= ^= $= *="),
            vec![
                Token::Equals,
                Token::Includes,
                Token::DashMatch,
                Token::Prefix,
                Token::Suffix,
                Token::Substring
            ]
        );
    }

    #[test]
    fn test_ids_numbers_and_quotes() {
        assert_eq!(
            tokens("#main-nav [aria-level='2'] [x=10]"),
            vec![
                Token::Id("main-nav".to_string()),
                Token::Whitespace,
                Token::BracketOpen,
                Token::Ident("aria-level".to_string()),
                Token::Equals,
                Token::String("2".to_string()),
                Token::BracketClose,
                Token::Whitespace,
                Token::BracketOpen,
                Token::Ident("x".to_string()),
                Token::Equals,
                Token::Number("10".to_string()),
                Token::BracketClose,
            ]
        );
    }

    #[test]
    fn test_unknown_characters_are_reported() {
        assert_eq!(
            tokens("a@"),
            vec![Token::Ident("a".to_string()), Token::Unknown]
        );
    }
}
