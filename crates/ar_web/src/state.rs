use std::sync::Arc;
use ar_core::ArticleStorage;
use ar_scrapers::UpdateManager;

pub struct AppState {
    pub storage: Arc<dyn ArticleStorage>,
    pub manager: Arc<UpdateManager>,
}

impl AppState {
    pub fn new(manager: Arc<UpdateManager>) -> Self {
        Self {
            storage: manager.storage().clone(),
            manager,
        }
    }
}
