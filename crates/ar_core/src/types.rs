use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel returned when a page rendered but no selector yielded enough text.
pub const CONTENT_NOT_EXTRACTED: &str = "Content could not be extracted";
/// Sentinel returned when the page could not be rendered at all.
pub const CONTENT_UNAVAILABLE: &str = "Content unavailable";
/// Body placeholder for source articles whose text could not be located.
pub const CONTENT_NOT_AVAILABLE: &str = "Content not available";

/// A persisted article. `updated_content` being `None` marks it as pending
/// enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_content: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn new(article: NewArticle) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: article.title,
            content: article.content,
            original_url: article.original_url,
            updated_content: article.updated_content,
            references: article.references,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.updated_content.is_none()
    }

    /// Records a completed enrichment and refreshes `updated_at`.
    pub fn enrich(&mut self, updated_content: String, references: Vec<String>) {
        self.updated_content = Some(updated_content);
        self.references = references;
        self.updated_at = Utc::now();
    }

    /// Applies the fields present in `patch`.
    pub fn apply(&mut self, patch: ArticlePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(original_url) = patch.original_url {
            self.original_url = Some(original_url);
        }
        if let Some(updated_content) = patch.updated_content {
            self.updated_content = Some(updated_content);
        }
        if let Some(references) = patch.references {
            self.references = references;
        }
        self.updated_at = Utc::now();
    }
}

/// Fields accepted when creating an article, either from a scrape or from an
/// external request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub updated_content: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

impl NewArticle {
    pub fn validate(&self) -> crate::Result<()> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(crate::Error::Validation(
                "Title and content are required".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<ScrapedArticle> for NewArticle {
    fn from(article: ScrapedArticle) -> Self {
        Self {
            title: article.title,
            content: article.content,
            original_url: Some(article.original_url),
            updated_content: None,
            references: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub updated_content: Option<String>,
    #[serde(default)]
    pub references: Option<Vec<String>>,
}

impl ArticlePatch {
    /// A patch may leave the title out but never blank it.
    pub fn validate(&self) -> crate::Result<()> {
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(crate::Error::Validation("Title cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Article pulled from the source site, before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedArticle {
    pub title: String,
    pub content: String,
    pub original_url: String,
}

/// Best-effort text pulled from an external page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageText {
    Extracted(String),
    /// Rendered, but no selector produced enough text.
    NotExtracted,
    /// Rendering failed.
    Unavailable,
}

impl PageText {
    pub fn as_str(&self) -> &str {
        match self {
            PageText::Extracted(text) => text,
            PageText::NotExtracted => CONTENT_NOT_EXTRACTED,
            PageText::Unavailable => CONTENT_UNAVAILABLE,
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, PageText::Extracted(_))
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            PageText::Extracted(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for PageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an enrichment batch, shaped as the HTTP envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub success: bool,
    pub message: String,
    pub updated: usize,
    pub total: usize,
}

impl UpdateSummary {
    pub fn nothing_pending() -> Self {
        Self {
            success: true,
            message: "No articles to update".to_string(),
            updated: 0,
            total: 0,
        }
    }

    pub fn completed(updated: usize, total: usize) -> Self {
        Self {
            success: true,
            message: format!("Updated {} articles", updated),
            updated,
            total,
        }
    }
}

/// Outcome of a source scrape, shaped as the HTTP envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeSummary {
    pub success: bool,
    pub message: String,
    pub articles: Vec<Article>,
}

impl ScrapeSummary {
    pub fn saved(articles: Vec<Article>) -> Self {
        Self {
            success: true,
            message: format!("Scraped and saved {} articles", articles.len()),
            articles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_article() -> NewArticle {
        NewArticle {
            title: "Test Article".to_string(),
            content: "This is a test article about chatbots.".to_string(),
            original_url: Some("https://www.beyondchats.com/blogs/test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_article_is_pending() {
        let article = Article::new(new_article());
        assert!(article.is_pending());
        assert!(article.references.is_empty());
        assert_eq!(article.created_at, article.updated_at);
        assert!(!article.id.is_empty());
    }

    #[test]
    fn test_enrich_clears_pending() {
        let mut article = Article::new(new_article());
        article.enrich(
            "# Test Article".to_string(),
            vec!["https://blog.example.com/a".to_string()],
        );
        assert!(!article.is_pending());
        assert_eq!(article.references.len(), 1);
        assert!(article.updated_at >= article.created_at);
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let mut article = Article::new(new_article());
        article.apply(ArticlePatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        });
        assert_eq!(article.title, "Renamed");
        assert_eq!(article.content, "This is a test article about chatbots.");
        assert!(article.is_pending());
    }

    #[test]
    fn test_validate_requires_title_and_content() {
        assert!(new_article().validate().is_ok());

        let missing_content = NewArticle {
            title: "Only a title".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            missing_content.validate(),
            Err(crate::Error::Validation(_))
        ));
    }

    #[test]
    fn test_patch_rejects_blank_title() {
        assert!(ArticlePatch::default().validate().is_ok());

        let blank = ArticlePatch {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(blank.validate(), Err(crate::Error::Validation(_))));
    }

    #[test]
    fn test_article_serializes_camel_case() {
        let article = Article::new(new_article());
        let json = serde_json::to_value(&article).unwrap();
        assert!(json.get("originalUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedContent").is_none());
    }

    #[test]
    fn test_page_text_sentinels() {
        assert_eq!(PageText::Unavailable.as_str(), CONTENT_UNAVAILABLE);
        assert_eq!(PageText::NotExtracted.to_string(), CONTENT_NOT_EXTRACTED);
        assert!(!PageText::NotExtracted.is_usable());
        assert_eq!(
            PageText::Extracted("body".to_string()).into_text(),
            Some("body".to_string())
        );
    }

    #[test]
    fn test_update_summary_messages() {
        let empty = UpdateSummary::nothing_pending();
        assert_eq!((empty.updated, empty.total), (0, 0));
        assert_eq!(empty.message, "No articles to update");

        let done = UpdateSummary::completed(1, 3);
        assert_eq!(done.message, "Updated 1 articles");
        assert!(done.success);
    }
}
