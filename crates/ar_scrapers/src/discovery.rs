use std::sync::Arc;
use std::time::Duration;

use ar_core::{Result, ScrapedArticle, CONTENT_NOT_AVAILABLE};
use async_trait::async_trait;
use tracing::{error, info, warn};
use url::Url;

use crate::extract::{collect_links, extract_body, extract_title};
use crate::render::{PageRenderer, RenderOptions};

pub const DEFAULT_SOURCE_URL: &str = "https://www.beyondchats.com/blogs";
pub const UNTITLED_ARTICLE: &str = "Untitled Article";

/// Anything that looks like a post listing; waited for but not required.
pub const LISTING_READY_SELECTOR: &str =
    "article, .blog-post, .post-item, [class*=\"blog\"], [class*=\"article\"]";

pub const LINK_SELECTORS: &[&str] = &[
    "article a[href*=\"blog\"]",
    ".blog-post a",
    ".post-item a",
    "a[href*=\"/blog/\"]",
    "a[href*=\"/blogs/\"]",
    "[class*=\"blog\"] a[href]",
    "[class*=\"article\"] a[href]",
];

/// Produces the articles to seed storage with. Never fails outright: when the
/// source cannot be read the fixed sample set stands in.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn scrape_source(&self) -> Vec<ScrapedArticle>;
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub listing_url: String,
    pub max_articles: usize,
    pub listing_timeout: Duration,
    pub listing_wait: Duration,
    pub article_timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_SOURCE_URL.to_string(),
            max_articles: 5,
            listing_timeout: Duration::from_secs(30),
            listing_wait: Duration::from_secs(10),
            article_timeout: Duration::from_secs(20),
        }
    }
}

fn bare_host(url: &Url) -> Option<&str> {
    url.host_str().map(|host| host.strip_prefix("www.").unwrap_or(host))
}

fn same_site(a: &Url, b: &Url) -> bool {
    matches!((bare_host(a), bare_host(b)), (Some(x), Some(y)) if x.eq_ignore_ascii_case(y))
}

fn same_page(a: &Url, b: &Url) -> bool {
    same_site(a, b) && a.path().trim_end_matches('/') == b.path().trim_end_matches('/')
}

pub struct SourceScraper {
    renderer: Arc<dyn PageRenderer>,
    config: ScraperConfig,
}

impl SourceScraper {
    pub fn new(renderer: Arc<dyn PageRenderer>, config: ScraperConfig) -> Self {
        Self { renderer, config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Same-site article links from a listing page, in selector priority order.
    pub async fn discover_article_links(&self, listing_url: &str) -> Result<Vec<String>> {
        let options = RenderOptions::new(self.config.listing_timeout)
            .wait_for(LISTING_READY_SELECTOR, self.config.listing_wait);
        let page = self.renderer.render(listing_url, &options).await?;

        let base = Url::parse(&page.url).or_else(|_| Url::parse(listing_url))?;
        let listing = Url::parse(listing_url)?;
        let document = page.document();

        let links = collect_links(&document, &base, LINK_SELECTORS, self.config.max_articles, |link| {
            same_site(link, &listing) && !same_page(link, &listing) && !same_page(link, &base)
        });

        Ok(links.into_iter().map(String::from).collect())
    }

    pub async fn scrape_article(&self, url: &str) -> Result<ScrapedArticle> {
        let options = RenderOptions::new(self.config.article_timeout);
        let page = self.renderer.render(url, &options).await?;
        let document = page.document();

        Ok(ScrapedArticle {
            title: extract_title(&document).unwrap_or_else(|| UNTITLED_ARTICLE.to_string()),
            content: extract_body(&document).unwrap_or_else(|| CONTENT_NOT_AVAILABLE.to_string()),
            original_url: url.to_string(),
        })
    }
}

#[async_trait]
impl ArticleSource for SourceScraper {
    async fn scrape_source(&self) -> Vec<ScrapedArticle> {
        info!("🔍 Starting to scrape {}", self.config.listing_url);

        let links = match self.discover_article_links(&self.config.listing_url).await {
            Ok(links) => links,
            Err(e) => {
                error!("Scraper error: {}", e);
                return sample_articles();
            }
        };

        info!("Found {} article links", links.len());
        if links.is_empty() {
            warn!("No articles found, using sample data");
            return sample_articles();
        }

        let mut articles = Vec::new();
        for link in links.iter().take(self.config.max_articles) {
            match self.scrape_article(link).await {
                Ok(article) => {
                    info!("📄 Scraped: {}", article.title);
                    articles.push(article);
                }
                Err(e) => error!("Failed to scrape {}: {}", link, e),
            }
        }

        if articles.is_empty() {
            warn!("Every article failed to load, using sample data");
            return sample_articles();
        }
        articles
    }
}

/// Fixed stand-in set used whenever the live source yields nothing.
pub fn sample_articles() -> Vec<ScrapedArticle> {
    let sample = |title: &str, content: &str, slug: &str| ScrapedArticle {
        title: title.to_string(),
        content: content.to_string(),
        original_url: format!("{}/{}", DEFAULT_SOURCE_URL, slug),
    };

    vec![
        sample(
            "The Future of AI-Powered Customer Support",
            "Artificial Intelligence is revolutionizing how businesses interact with customers. Modern AI chatbots can understand context, provide personalized responses, and handle complex queries with ease. This transformation is making customer support more efficient and accessible than ever before.",
            "ai-customer-support",
        ),
        sample(
            "Best Practices for Implementing Chatbots",
            "Implementing a chatbot requires careful planning and strategy. Start by identifying your users' most common questions, design conversational flows that feel natural, and always provide an option to reach a human agent. Regular testing and iteration are key to success.",
            "chatbot-best-practices",
        ),
        sample(
            "How AI is Transforming Business Communication",
            "Business communication is evolving rapidly with AI technology. From automated email responses to intelligent meeting schedulers, AI tools are helping teams work more efficiently. The key is finding the right balance between automation and human touch.",
            "ai-business-communication",
        ),
        sample(
            "Understanding Natural Language Processing",
            "Natural Language Processing (NLP) enables computers to understand human language. This technology powers everything from voice assistants to sentiment analysis tools. As NLP continues to advance, we're seeing more sophisticated and accurate language understanding capabilities.",
            "nlp-explained",
        ),
        sample(
            "The ROI of Customer Service Automation",
            "Automating customer service can significantly reduce costs while improving response times. Studies show that businesses implementing AI chatbots see up to 30% reduction in support costs and 24/7 availability. However, it's important to measure success beyond just cost savings.",
            "automation-roi",
        ),
    ]
}
