use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// Input to a rewrite: the original article plus the text of each reference.
#[derive(Debug, Clone, Copy)]
pub struct RewriteRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub references: &'a [String],
}

#[async_trait]
pub trait RewriteModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Produce an improved version of the article
    async fn rewrite(&self, request: &RewriteRequest<'_>) -> Result<String>;
}
