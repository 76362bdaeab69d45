use async_trait::async_trait;
use ar_core::{ArticleStorage, Error, Result};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn name() -> &'static str;

    /// Opens the backend. `url` is backend specific; `None` selects its default.
    async fn connect(url: Option<&str>) -> Result<Self> where Self: Sized;
}

async fn open<T: StorageBackend + ArticleStorage + 'static>(url: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    let storage = T::connect(url).await?;
    info!("🏦 Storage backend initialized (using {})", T::name());
    Ok(Arc::new(storage))
}

/// Builds the storage backend named by `kind`.
pub async fn create_storage(kind: &str, url: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        "memory" => open::<InMemoryStorage>(url).await,
        #[cfg(feature = "sqlite")]
        "sqlite" => open::<SQLiteStorage>(url).await,
        other => Err(Error::Persistence(format!(
            "Unsupported storage backend: {} (available: {})",
            other,
            available_backends().join(", ")
        ))),
    }
}

pub fn available_backends() -> Vec<&'static str> {
    let mut backends = vec!["memory"];
    if cfg!(feature = "sqlite") {
        backends.push("sqlite");
    }
    backends
}

pub mod prelude {
    pub use super::{create_storage, StorageBackend};
    pub use super::backends::*;
}
