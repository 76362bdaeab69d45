use std::sync::Arc;
use ar_core::{Result, RewriteModel};
use tracing::{info, warn};
use crate::Config;

pub mod openai;
pub mod template;

pub use openai::OpenAiModel;
pub use template::TemplateModel;

/// Builds the generative model for `config`, or `None` when no credential is
/// configured and rewrites should go straight to the template.
pub fn create_model(config: &Config) -> Result<Option<Arc<dyn RewriteModel>>> {
    if config.api_key().is_none() {
        warn!("No OpenAI API key found, rewrites will use the template fallback");
        return Ok(None);
    }

    let model = OpenAiModel::new(config)?;
    info!("🧠 Rewrite model initialized (using {} / {})", model.name(), config.model_name);
    Ok(Some(Arc::new(model)))
}
