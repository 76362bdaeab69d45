use std::fmt;
use std::sync::Arc;
use ar_core::{Result, RewriteModel, RewriteRequest};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use crate::models::{create_model, TemplateModel};
use crate::Config;

/// Rewritten article text. `degraded` is set when it came from the template
/// rather than the generative service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rewrite {
    pub content: String,
    pub degraded: bool,
}

pub struct RewriteEngine {
    primary: Option<Arc<dyn RewriteModel>>,
    fallback: TemplateModel,
}

impl fmt::Debug for RewriteEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteEngine")
            .field("primary", &self.primary.as_ref().map(|m| m.name().to_string()))
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl RewriteEngine {
    pub fn new(primary: Option<Arc<dyn RewriteModel>>) -> Self {
        Self {
            primary,
            fallback: TemplateModel::new(),
        }
    }

    /// Template-only engine.
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(create_model(config)?))
    }

    pub fn is_online(&self) -> bool {
        self.primary.is_some()
    }

    /// Never fails: any service problem falls back to the template.
    pub async fn rewrite(&self, title: &str, content: &str, references: &[String]) -> Rewrite {
        info!(title = %title, references = references.len(), "Rewriting article");

        let Some(model) = &self.primary else {
            warn!("No generative service configured, returning enhanced version");
            return self.degraded(title, content);
        };

        let request = RewriteRequest {
            title,
            content,
            references,
        };
        match model.rewrite(&request).await {
            Ok(content) => {
                info!("Article rewritten successfully");
                Rewrite {
                    content,
                    degraded: false,
                }
            }
            Err(e) => {
                error!(model = model.name(), error = %e, "Rewrite service error");
                self.degraded(title, content)
            }
        }
    }

    fn degraded(&self, title: &str, content: &str) -> Rewrite {
        Rewrite {
            content: self.fallback.render(title, content),
            degraded: true,
        }
    }
}

impl Default for RewriteEngine {
    fn default() -> Self {
        Self::offline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_core::Error;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FailingModel;

    #[async_trait]
    impl RewriteModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        async fn rewrite(&self, _request: &RewriteRequest<'_>) -> Result<String> {
            Err(Error::Service("429 Too Many Requests".to_string()))
        }
    }

    #[derive(Debug)]
    struct EchoModel;

    #[async_trait]
    impl RewriteModel for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn rewrite(&self, request: &RewriteRequest<'_>) -> Result<String> {
            Ok(format!("{} with {} references", request.title, request.references.len()))
        }
    }

    fn references() -> Vec<String> {
        vec!["Reference text".to_string()]
    }

    #[tokio::test]
    async fn test_offline_engine_is_deterministic() {
        let engine = RewriteEngine::offline();
        let first = engine.rewrite("AI Support", "Body text", &references()).await;
        let second = engine.rewrite("AI Support", "Body text", &references()).await;

        assert!(first.degraded);
        assert_eq!(first, second);
        assert!(first.content.starts_with("# AI Support"));
    }

    #[tokio::test]
    async fn test_service_failure_falls_back_to_template() {
        let engine = RewriteEngine::new(Some(Arc::new(FailingModel)));
        let rewrite = engine.rewrite("AI Support", "Body text", &references()).await;

        assert!(rewrite.degraded);
        assert_eq!(rewrite.content, TemplateModel::new().render("AI Support", "Body text"));
    }

    #[tokio::test]
    async fn test_service_output_is_returned_verbatim() {
        let engine = RewriteEngine::new(Some(Arc::new(EchoModel)));
        assert!(engine.is_online());

        let rewrite = engine.rewrite("AI Support", "Body text", &references()).await;
        assert!(!rewrite.degraded);
        assert_eq!(rewrite.content, "AI Support with 1 references");
    }
}
