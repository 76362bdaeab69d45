use async_trait::async_trait;
use ar_core::{Article, ArticlePatch, ArticleStorage, NewArticle, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.articles.iter().position(|a| a.id == id)
    }

    pub fn find_pending(&self) -> Vec<Article> {
        let mut pending = self.articles.iter()
            .filter(|a| a.is_pending())
            .cloned()
            .collect::<Vec<_>>();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        pending
    }

    pub fn find_by_title(&self, title: &str) -> Option<Article> {
        self.articles.iter().find(|a| a.title == title).cloned()
    }

    pub fn insert(&mut self, article: Article) -> Article {
        self.articles.push(article.clone());
        article
    }

    pub fn save(&mut self, article: &Article) -> Article {
        match self.position(&article.id) {
            Some(i) => self.articles[i] = article.clone(),
            None => self.articles.push(article.clone()),
        }
        article.clone()
    }

    pub fn list(&self) -> Vec<Article> {
        let mut articles = self.articles.clone();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        articles
    }

    pub fn get(&self, id: &str) -> Option<Article> {
        self.position(id).map(|i| self.articles[i].clone())
    }

    pub fn update(&mut self, id: &str, patch: ArticlePatch) -> Option<Article> {
        let i = self.position(id)?;
        self.articles[i].apply(patch);
        Some(self.articles[i].clone())
    }

    pub fn delete(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) => {
                self.articles.remove(i);
                true
            }
            None => false,
        }
    }
}

/// Process-local store, lost on exit.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn name() -> &'static str {
        "memory"
    }

    async fn connect(_url: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn find_pending(&self) -> Result<Vec<Article>> {
        Ok(self.store.read().await.find_pending())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Article>> {
        Ok(self.store.read().await.find_by_title(title))
    }

    async fn create(&self, article: NewArticle) -> Result<Article> {
        let mut store = self.store.write().await;
        Ok(store.insert(Article::new(article)))
    }

    async fn save(&self, article: &Article) -> Result<Article> {
        let mut store = self.store.write().await;
        Ok(store.save(article))
    }

    async fn list(&self) -> Result<Vec<Article>> {
        Ok(self.store.read().await.list())
    }

    async fn get(&self, id: &str) -> Result<Option<Article>> {
        Ok(self.store.read().await.get(id))
    }

    async fn update(&self, id: &str, patch: ArticlePatch) -> Result<Option<Article>> {
        let mut store = self.store.write().await;
        Ok(store.update(id, patch))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut store = self.store.write().await;
        Ok(store.delete(id))
    }
}
