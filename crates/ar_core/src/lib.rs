pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::{RewriteModel, RewriteRequest};
pub use storage::ArticleStorage;
pub use types::{
    Article, ArticlePatch, NewArticle, PageText, ScrapeSummary, ScrapedArticle, UpdateSummary,
    CONTENT_NOT_AVAILABLE, CONTENT_NOT_EXTRACTED, CONTENT_UNAVAILABLE,
};

pub mod prelude {
    pub use super::{Article, ArticleStorage, Error, Result, RewriteModel};
}
