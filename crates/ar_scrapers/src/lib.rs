pub mod discovery;
pub mod extract;
pub mod manager;
pub mod render;
pub mod search;

#[cfg(test)]
pub(crate) mod test_utils;

pub use discovery::{sample_articles, ArticleSource, ScraperConfig, SourceScraper};
pub use manager::{ArticleStatus, UpdateManager};
pub use render::{with_page, ChromeRenderer, PageRenderer, RenderConfig, RenderOptions, RenderedPage};
pub use search::{ReferenceSearch, ReferenceSource, SearchConfig, SearchOutcome};

pub mod prelude {
    pub use super::{
        ArticleSource, ChromeRenderer, PageRenderer, ReferenceSearch, ReferenceSource, SourceScraper,
        UpdateManager,
    };
    pub use ar_core::{Article, Error, PageText, Result};
}
