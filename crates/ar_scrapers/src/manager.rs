use std::sync::Arc;
use std::time::Duration;

use ar_core::{Article, ArticleStorage, Error, PageText, Result, ScrapeSummary, UpdateSummary};
use ar_inference::RewriteEngine;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::discovery::ArticleSource;
use crate::search::ReferenceSource;

pub const DEFAULT_UPDATE_DELAY: Duration = Duration::from_secs(2);

/// What happened to one pending article during an update pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleStatus {
    Updated { search_degraded: bool, rewrite_degraded: bool },
    NoReferences,
    NoReferenceContent,
}

/// Drives the scrape and enrichment workflows over the configured storage.
pub struct UpdateManager {
    storage: Arc<dyn ArticleStorage>,
    source: Arc<dyn ArticleSource>,
    references: Arc<dyn ReferenceSource>,
    rewriter: RewriteEngine,
    delay: Duration,
}

impl UpdateManager {
    pub fn new(
        storage: Arc<dyn ArticleStorage>,
        source: Arc<dyn ArticleSource>,
        references: Arc<dyn ReferenceSource>,
        rewriter: RewriteEngine,
    ) -> Self {
        Self {
            storage,
            source,
            references,
            rewriter,
            delay: DEFAULT_UPDATE_DELAY,
        }
    }

    /// Pause after each successfully updated article.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn storage(&self) -> &Arc<dyn ArticleStorage> {
        &self.storage
    }

    pub fn rewriter(&self) -> &RewriteEngine {
        &self.rewriter
    }

    /// Enriches every pending article. Only failing to list pending articles
    /// is an error; anything that goes wrong with a single article is logged
    /// and that article stays pending.
    pub async fn run_update(&self) -> Result<UpdateSummary> {
        info!("🚀 Starting article update process...");

        let pending = self.storage.find_pending().await?;
        if pending.is_empty() {
            info!("No articles to update");
            return Ok(UpdateSummary::nothing_pending());
        }

        let total = pending.len();
        info!("Found {} articles to update", total);

        let mut updated = 0;
        for article in pending {
            let title = article.title.clone();
            info!("📰 Processing: {}", title);

            match self.process_article(article).await {
                Ok(ArticleStatus::Updated { search_degraded, rewrite_degraded }) => {
                    updated += 1;
                    info!(search_degraded, rewrite_degraded, "✅ Updated: {}", title);
                    if !self.delay.is_zero() {
                        sleep(self.delay).await;
                    }
                }
                Ok(ArticleStatus::NoReferences) => warn!("No search results for: {}", title),
                Ok(ArticleStatus::NoReferenceContent) => {
                    warn!("Could not scrape reference articles for: {}", title)
                }
                Err(e) => error!("Error updating article {}: {}", title, e),
            }
        }

        info!("✨ Update complete: {}/{} articles updated", updated, total);
        Ok(UpdateSummary::completed(updated, total))
    }

    async fn process_article(&self, mut article: Article) -> Result<ArticleStatus> {
        let search = self.references.search(&article.title).await;
        if search.urls.is_empty() {
            return Ok(ArticleStatus::NoReferences);
        }
        if search.degraded {
            debug!("Using placeholder references for: {}", article.title);
        }

        let mut used = Vec::new();
        let mut contents = Vec::new();
        for url in &search.urls {
            match self.references.scrape_article_content(url).await {
                PageText::Extracted(text) => {
                    used.push(url.clone());
                    contents.push(text);
                }
                other => debug!("Skipping reference {}: {}", url, other),
            }
        }
        if contents.is_empty() {
            return Ok(ArticleStatus::NoReferenceContent);
        }

        info!("🤖 Rewriting with {} references", contents.len());
        let rewrite = self
            .rewriter
            .rewrite(&article.title, &article.content, &contents)
            .await;

        article.enrich(rewrite.content, used);
        info!("💾 Storing updated article");
        self.storage.save(&article).await?;

        Ok(ArticleStatus::Updated {
            search_degraded: search.degraded,
            rewrite_degraded: rewrite.degraded,
        })
    }

    /// Pulls articles from the source and stores the ones not seen before,
    /// matching on exact title. An empty source is `Error::NotFound`.
    pub async fn scrape_and_save(&self) -> Result<ScrapeSummary> {
        let scraped = self.source.scrape_source().await;
        if scraped.is_empty() {
            return Err(Error::NotFound("No articles found".to_string()));
        }
        info!("Scraped {} articles", scraped.len());

        let mut saved = Vec::new();
        for article in scraped {
            if self.storage.find_by_title(&article.title).await?.is_some() {
                info!("Article already exists: {}", article.title);
                continue;
            }
            let created = self.storage.create(article.into()).await?;
            info!("💾 Saved: {}", created.title);
            saved.push(created);
        }

        Ok(ScrapeSummary::saved(saved))
    }
}
