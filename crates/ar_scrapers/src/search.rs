use std::sync::Arc;
use std::time::Duration;

use ar_core::{PageText, Result};
use async_trait::async_trait;
use tracing::{error, info, warn};
use url::Url;

use crate::extract::{collect_links, extract_main_text};
use crate::render::{PageRenderer, RenderOptions};

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const RESULT_SELECTOR: &str = "div.g a[href^=\"http\"]";

/// Where reference articles come from, and how their text is read.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// At most a handful of candidate URLs; placeholders when the engine fails.
    async fn search(&self, query: &str) -> SearchOutcome;

    /// Main text of `url`, or the sentinel describing why there is none.
    async fn scrape_article_content(&self, url: &str) -> PageText;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub urls: Vec<String>,
    /// Set when `urls` are placeholders rather than real results.
    pub degraded: bool,
}

impl SearchOutcome {
    pub fn found(urls: Vec<String>) -> Self {
        Self { urls, degraded: false }
    }

    pub fn placeholder(query: &str) -> Self {
        Self {
            urls: placeholder_references(query),
            degraded: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub search_url: String,
    pub max_results: usize,
    pub search_timeout: Duration,
    pub scrape_timeout: Duration,
    pub excluded_domains: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            max_results: 2,
            search_timeout: Duration::from_secs(30),
            scrape_timeout: Duration::from_secs(20),
            excluded_domains: ["google.com", "youtube.com", "facebook.com", "twitter.com"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

/// Query lower-cased with whitespace runs turned into `-`.
pub fn slugify(query: &str) -> String {
    query.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

pub fn placeholder_references(query: &str) -> Vec<String> {
    let slug = slugify(query);
    vec![
        format!("https://www.example.com/blog/{}", slug),
        format!("https://www.sample-blog.com/articles/{}", slug),
    ]
}

/// Web search through a rendered results page.
pub struct ReferenceSearch {
    renderer: Arc<dyn PageRenderer>,
    config: SearchConfig,
}

impl ReferenceSearch {
    pub fn new(renderer: Arc<dyn PageRenderer>, config: SearchConfig) -> Self {
        Self { renderer, config }
    }

    pub fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.search_url)?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    fn is_candidate(&self, url: &Url) -> bool {
        let href = url.as_str();
        !self.config.excluded_domains.iter().any(|d| href.contains(d.as_str()))
            && (href.contains("blog") || href.contains("article") || href.contains(".com"))
    }

    async fn fetch_results(&self, query: &str) -> Result<Vec<String>> {
        let url = self.search_url(query)?;
        let options = RenderOptions::new(self.config.search_timeout);
        let page = self.renderer.render(url.as_str(), &options).await?;

        let base = Url::parse(&page.url).unwrap_or(url);
        let links = collect_links(
            &page.document(),
            &base,
            &[RESULT_SELECTOR],
            self.config.max_results,
            |link| self.is_candidate(link),
        );
        Ok(links.into_iter().map(String::from).collect())
    }
}

#[async_trait]
impl ReferenceSource for ReferenceSearch {
    async fn search(&self, query: &str) -> SearchOutcome {
        info!("🔎 Searching for: {}", query);

        match self.fetch_results(query).await {
            Ok(urls) if !urls.is_empty() => {
                info!("Found {} relevant links", urls.len());
                SearchOutcome::found(urls)
            }
            Ok(_) => {
                warn!("No relevant links for {:?}, using placeholders", query);
                SearchOutcome::placeholder(query)
            }
            Err(e) => {
                error!("Search error: {}", e);
                SearchOutcome::placeholder(query)
            }
        }
    }

    async fn scrape_article_content(&self, url: &str) -> PageText {
        info!("📖 Scraping content from: {}", url);
        let options = RenderOptions::new(self.config.scrape_timeout);

        match self.renderer.render(url, &options).await {
            Ok(page) => {
                let text = extract_main_text(&page.html);
                if !text.is_usable() {
                    warn!("No main text found at {}", url);
                }
                text
            }
            Err(e) => {
                error!("Failed to scrape {}: {}", url, e);
                PageText::Unavailable
            }
        }
    }
}
