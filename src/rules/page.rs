//! Document-level rules, evaluated on the body

use super::{Rule, RuleContext, RuleResult, Severity};
use crate::dom::Document;

pub(super) fn title<D: Document + ?Sized>(ctx: &RuleContext<'_, D>) -> Option<RuleResult> {
    if ctx.embedded {
        return None;
    }
    let result = match ctx.document.title().map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => RuleResult::new(Rule::PageTitle, Severity::Info, format!("title \"{}\"", title)),
        None => RuleResult::new(Rule::PageTitle, Severity::Error, "document has no title"),
    };
    Some(result)
}

pub(super) fn lang<D: Document + ?Sized>(ctx: &RuleContext<'_, D>) -> Option<RuleResult> {
    if ctx.embedded {
        return None;
    }
    let lang = ctx
        .document
        .document_element()
        .and_then(|html| ctx.document.attribute(html, "lang"))
        .map(str::trim)
        .filter(|l| !l.is_empty());
    let result = match lang {
        Some(lang) => RuleResult::new(Rule::PageLang, Severity::Info, format!("lang \"{}\"", lang)),
        None => RuleResult::new(
            Rule::PageLang,
            Severity::Error,
            "document element has no lang attribute",
        ),
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use crate::dom::{ElementSpec, PageSnapshot, Viewport};
    use crate::rules::test_support::run;
    use crate::rules::{Severity, Tables};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_title_and_lang_are_errors() {
        let page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let results = run(&page, page.body_element(), &mut Tables::new(), false);
        let found: Vec<_> = results.iter().map(|r| (r.rule, r.severity)).collect();
        assert_eq!(
            found,
            vec![("page-title", Severity::Error), ("page-lang", Severity::Error)]
        );
    }

    #[test]
    fn test_present_title_and_lang_are_reported() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        page.set_title("Checkout");
        let html = page.html_element();
        page.update(html, ElementSpec::new("html").attr("lang", "ja"));

        let results = run(&page, page.body_element(), &mut Tables::new(), false);
        let messages: Vec<_> = results.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["title \"Checkout\"", "lang \"ja\""]);
    }

    #[test]
    fn test_embedded_documents_are_skipped() {
        let page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        assert!(run(&page, page.body_element(), &mut Tables::new(), true).is_empty());
    }
}
