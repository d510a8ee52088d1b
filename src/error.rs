//! Error types for selector parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::selector::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("Selector error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl SelectorError {
    pub fn span(&self) -> &Span {
        match self {
            SelectorError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            SelectorError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for SelectorError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of selector".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of selector".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        SelectorError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::Id(s) => format!("id '#{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::Whitespace => "descendant combinator".to_string(),
        Token::Child => "'>'".to_string(),
        Token::Adjacent => "'+'".to_string(),
        Token::Sibling => "'~'".to_string(),
        Token::Equals => "'='".to_string(),
        Token::Includes => "'~='".to_string(),
        Token::DashMatch => "'|='".to_string(),
        Token::Prefix => "'^='".to_string(),
        Token::Suffix => "'$='".to_string(),
        Token::Substring => "'*='".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Unknown => "unrecognised character".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::selector::parse;

    #[test]
    fn test_error_names_offending_token() {
        let errs = parse("ul > > li").unwrap_err();
        assert!(errs[0].to_string().contains("Unexpected '>'"), "{}", errs[0]);
        assert!(errs[0].span().start >= 3);
    }

    #[test]
    fn test_format_includes_source_label() {
        let source = "button:hover";
        let errs = parse(source).unwrap_err();
        let report = errs[0].format(source, "categories.toml");
        assert!(report.contains("categories.toml"));
        assert!(report.contains("unsupported pseudo-class ':hover'"));
    }
}
