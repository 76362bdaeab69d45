use async_trait::async_trait;
use crate::types::{Article, ArticlePatch, NewArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Articles without `updated_content`, oldest first
    async fn find_pending(&self) -> Result<Vec<Article>>;

    /// Exact title match
    async fn find_by_title(&self, title: &str) -> Result<Option<Article>>;

    async fn create(&self, article: NewArticle) -> Result<Article>;

    /// Upsert of every mutable field, last write wins
    async fn save(&self, article: &Article) -> Result<Article>;

    /// All articles, newest first
    async fn list(&self) -> Result<Vec<Article>>;

    async fn get(&self, id: &str) -> Result<Option<Article>>;

    async fn update(&self, id: &str, patch: ArticlePatch) -> Result<Option<Article>>;

    /// Returns false when no article had this id
    async fn delete(&self, id: &str) -> Result<bool>;
}
