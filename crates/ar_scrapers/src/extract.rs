//! Selector-priority text extraction over rendered HTML.
//!
//! Every extraction in the pipeline (reference bodies, source titles and
//! bodies, link discovery) walks an ordered list of selectors and accepts the
//! first one that yields a good enough result.

use ar_core::PageText;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

/// Paragraphs at or under this many characters are treated as boilerplate.
pub const MIN_PARAGRAPH_CHARS: usize = 50;
/// A container must yield more than this many characters to count.
pub const MIN_CONTENT_CHARS: usize = 200;
/// Extracted reference text is cut to this many characters.
pub const MAX_CONTENT_CHARS: usize = 2000;

pub const ARTICLE_SELECTORS: &[&str] = &[
    "article",
    ".article-content",
    ".post-content",
    ".entry-content",
    "main article",
    "[role=\"article\"]",
    ".content",
];

pub const TITLE_SELECTORS: &[&str] = &["h1", ".article-title", ".post-title", "[class*=\"title\"]"];

pub const SOURCE_BODY_SELECTORS: &[&str] = &[
    "article",
    ".article-content",
    ".post-content",
    ".entry-content",
    "main",
    "[class*=\"content\"]",
];

/// One step of a prioritized extraction: where to look, and how long the
/// result must be (strictly greater than `min_len` characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy<'a> {
    pub selector: &'a str,
    pub min_len: usize,
}

impl<'a> Strategy<'a> {
    pub const fn new(selector: &'a str, min_len: usize) -> Self {
        Self { selector, min_len }
    }

    /// Same threshold for every selector.
    pub fn all(selectors: &[&'a str], min_len: usize) -> Vec<Self> {
        selectors.iter().map(|s| Self::new(s, min_len)).collect()
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector, error = ?e, "Skipping invalid selector");
            None
        }
    }
}

/// Applies `f` to the first element matched by each strategy in turn and
/// returns the first result long enough for its strategy.
pub fn first_match<F>(document: &Html, strategies: &[Strategy<'_>], mut f: F) -> Option<String>
where
    F: FnMut(ElementRef<'_>) -> Option<String>,
{
    for strategy in strategies {
        let Some(selector) = parse_selector(strategy.selector) else {
            continue;
        };
        let Some(element) = document.select(&selector).next() else {
            continue;
        };
        if let Some(text) = f(element) {
            if text.chars().count() > strategy.min_len {
                return Some(text);
            }
        }
    }
    None
}

/// Collapses whitespace runs into single spaces and trims.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Character-boundary safe truncation.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

pub fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = normalize_whitespace(&element.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

/// Substantial paragraphs under `element`, separated by blank lines.
pub fn paragraph_text(element: ElementRef<'_>) -> Option<String> {
    let paragraph = parse_selector("p")?;
    let text = element
        .select(&paragraph)
        .map(|p| normalize_whitespace(&p.text().collect::<String>()))
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect::<Vec<_>>()
        .join("\n\n");
    (!text.is_empty()).then_some(text)
}

/// Main body text of an external article, bounded to `MAX_CONTENT_CHARS`.
pub fn extract_main_text(html: &str) -> PageText {
    let document = Html::parse_document(html);
    let strategies = Strategy::all(ARTICLE_SELECTORS, MIN_CONTENT_CHARS);

    match first_match(&document, &strategies, paragraph_text) {
        Some(text) => PageText::Extracted(truncate_chars(&text, MAX_CONTENT_CHARS)),
        None => PageText::NotExtracted,
    }
}

pub fn extract_title(document: &Html) -> Option<String> {
    first_match(document, &Strategy::all(TITLE_SELECTORS, 0), element_text)
}

/// Body of a source article. Prefers a container over `MIN_CONTENT_CHARS`,
/// otherwise settles for the first container with any substantial paragraph.
pub fn extract_body(document: &Html) -> Option<String> {
    first_match(
        document,
        &Strategy::all(SOURCE_BODY_SELECTORS, MIN_CONTENT_CHARS),
        paragraph_text,
    )
    .or_else(|| first_match(document, &Strategy::all(SOURCE_BODY_SELECTORS, 0), paragraph_text))
}

/// Resolves `href`s matched by `selectors` in order, keeping absolute http(s)
/// links accepted by `keep`, without duplicates. Stops after the selector that
/// brings the count to `limit`; the result never exceeds `limit`.
pub fn collect_links<F>(
    document: &Html,
    base: &Url,
    selectors: &[&str],
    limit: usize,
    mut keep: F,
) -> Vec<Url>
where
    F: FnMut(&Url) -> bool,
{
    let mut links: Vec<Url> = Vec::new();

    for selector in selectors {
        let Some(parsed) = parse_selector(selector) else {
            continue;
        };
        for element in document.select(&parsed) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(mut url) = base.join(href.trim()) else {
                continue;
            };
            if !matches!(url.scheme(), "http" | "https") {
                continue;
            }
            url.set_fragment(None);
            if !links.contains(&url) && keep(&url) {
                links.push(url);
            }
        }
        if links.len() >= limit {
            break;
        }
    }

    links.truncate(limit);
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(seed: &str) -> String {
        format!("{} {}", seed, "and this sentence pads the paragraph beyond fifty characters.")
    }

    fn article_html(container: &str, paragraphs: usize) -> String {
        let body = (0..paragraphs)
            .map(|i| format!("<p>{}</p>", paragraph(&format!("Paragraph {}", i))))
            .collect::<String>();
        format!("<html><body><nav><p>Menu</p></nav>{}</body></html>", container.replace("{}", &body))
    }

    #[test]
    fn test_extract_main_text_joins_long_paragraphs() {
        let html = article_html("<article><p>Too short.</p>{}</article>", 3);
        let text = extract_main_text(&html);

        let PageText::Extracted(text) = text else {
            panic!("expected extracted text");
        };
        assert!(!text.contains("Too short."));
        assert_eq!(text.split("\n\n").count(), 3);
        assert!(text.starts_with("Paragraph 0 and this sentence"));
    }

    #[test]
    fn test_extract_main_text_falls_through_selectors() {
        // `article` exists but is too thin, `.entry-content` satisfies the minimum
        let html = format!(
            "<html><body><article><p>{}</p></article><div class=\"entry-content\">{}</div></body></html>",
            paragraph("Lonely"),
            (0..4).map(|i| format!("<p>{}</p>", paragraph(&format!("Entry {}", i)))).collect::<String>()
        );

        let text = extract_main_text(&html).into_text().unwrap();
        assert!(text.starts_with("Entry 0"));
        assert!(!text.contains("Lonely"));
    }

    #[test]
    fn test_extract_main_text_misses_short_pages() {
        let html = article_html("<article>{}</article>", 1);
        assert_eq!(extract_main_text(&html), PageText::NotExtracted);
        assert_eq!(extract_main_text("<html><body></body></html>"), PageText::NotExtracted);
    }

    #[test]
    fn test_extract_main_text_is_bounded() {
        let html = article_html("<main><article>{}</article></main>", 100);
        let text = extract_main_text(&html).into_text().unwrap();
        assert_eq!(text.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_extracted_text_is_never_short() {
        for paragraphs in 0..8 {
            let html = article_html("<div class=\"content\">{}</div>", paragraphs);
            match extract_main_text(&html) {
                PageText::Extracted(text) => assert!(text.chars().count() > MIN_CONTENT_CHARS),
                other => assert!(!other.is_usable()),
            }
        }
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_extract_title_prefers_h1() {
        let html = Html::parse_document(
            "<div class=\"post-title\">Secondary</div><h1>  Main\n Title </h1>",
        );
        assert_eq!(extract_title(&html).as_deref(), Some("Main Title"));

        let html = Html::parse_document("<h1>   </h1><span class=\"entry-title\">Fallback</span>");
        assert_eq!(extract_title(&html).as_deref(), Some("Fallback"));

        assert!(extract_title(&Html::parse_document("<p>No title</p>")).is_none());
    }

    #[test]
    fn test_extract_body_accepts_short_content_as_last_resort() {
        let html = Html::parse_document(&format!("<main><p>{}</p></main>", paragraph("Short")));
        let body = extract_body(&html).unwrap();
        assert!(body.starts_with("Short"));

        assert!(extract_body(&Html::parse_document("<main><p>tiny</p></main>")).is_none());
    }

    #[test]
    fn test_first_match_skips_invalid_selectors() {
        let html = Html::parse_document("<h1>Title</h1>");
        let strategies = [Strategy::new("[[invalid", 0), Strategy::new("h1", 0)];
        assert_eq!(first_match(&html, &strategies, element_text).as_deref(), Some("Title"));
    }

    #[test]
    fn test_collect_links_resolves_dedupes_and_limits() {
        let html = Html::parse_document(
            r##"
            <a class="x" href="/blogs/one">1</a>
            <a class="x" href="/blogs/one#comments">1 again</a>
            <a class="x" href="mailto:team@example.com">mail</a>
            <a class="y" href="https://example.com/blogs/two">2</a>
            <a class="y" href="https://example.com/blogs/three">3</a>
            "##,
        );
        let base = Url::parse("https://example.com/blogs/").unwrap();

        let links = collect_links(&html, &base, &["a.x", "a.y"], 5, |_| true);
        let links: Vec<_> = links.iter().map(Url::as_str).collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/blogs/one",
                "https://example.com/blogs/two",
                "https://example.com/blogs/three",
            ]
        );

        let limited = collect_links(&html, &base, &["a.x", "a.y"], 1, |_| true);
        assert_eq!(limited.len(), 1);

        let filtered = collect_links(&html, &base, &["a.x", "a.y"], 5, |u| u.path().ends_with("two"));
        assert_eq!(filtered.len(), 1);
    }
}
