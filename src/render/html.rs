//! DOM processing for server-rendered HTML
//!
//! `scraper::Html` is not `Send`, so these helpers parse the document on
//! every call and never keep it around across an await.

use crate::crawler::ExtractionRules;
use crate::render::AnchorLink;
use scraper::{ElementRef, Html, Selector};

/// Elements whose contents are never visible text
const NEVER_TEXT: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements rendered on their own line, so their text must not run into
/// the text of their siblings
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Lists every `<a href>` of the document in document order
///
/// An anchor is flagged `in_nav` when any of its ancestors is a `<nav>`.
pub fn anchors(html: &str) -> Vec<AnchorLink> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let in_nav = anchor
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|el| el.value().name() == "nav");
            Some(AnchorLink::new(href, in_nav))
        })
        .collect()
}

/// Returns the visible text of the document's primary content
///
/// The first content selector with a match outside the chrome wins;
/// otherwise the whole body is used. Chrome elements are skipped wherever
/// they appear. Whitespace is left as found.
pub fn main_text(html: &str, rules: &ExtractionRules) -> String {
    let document = Html::parse_document(html);
    let chrome = compile(&rules.chrome_selectors);
    let containers = compile(&rules.content_selectors);

    let container = containers.iter().find_map(|selector| {
        document
            .select(selector)
            .find(|el| !inside_chrome(*el, &chrome))
    });

    let root = container
        .or_else(|| {
            Selector::parse("body")
                .ok()
                .and_then(|body| document.select(&body).next())
        })
        .unwrap_or_else(|| document.root_element());

    let mut text = String::new();
    collect_text(root, &chrome, &mut text);
    text
}

fn compile(selectors: &[String]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

fn is_chrome(element: ElementRef<'_>, chrome: &[Selector]) -> bool {
    NEVER_TEXT.contains(&element.value().name()) || chrome.iter().any(|s| s.matches(&element))
}

fn inside_chrome(element: ElementRef<'_>, chrome: &[Selector]) -> bool {
    is_chrome(element, chrome)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_chrome(ancestor, chrome))
}

fn collect_text(element: ElementRef<'_>, chrome: &[Selector], out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if is_chrome(child_el, chrome) {
                continue;
            }
            let block = BLOCK_ELEMENTS.contains(&child_el.value().name());
            if block {
                out.push(' ');
            }
            collect_text(child_el, chrome, out);
            if block {
                out.push(' ');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}
