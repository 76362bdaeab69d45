//! Headless page rendering.
//!
//! A [`PageRenderer`] turns a URL into the HTML the page shows after its
//! scripts have run. [`ChromeRenderer`] drives a real headless Chrome through
//! chromiumoxide and launches a fresh browser for every page, so nothing leaks
//! between loads and a crashed browser only costs one page.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ar_core::{Error, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use scraper::Html;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Bound on the whole load, launch excluded.
    pub timeout: Duration,
    /// Selector to wait for once the document is complete. Absence is tolerated.
    pub wait_for: Option<String>,
    pub wait_timeout: Duration,
}

impl RenderOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            wait_for: None,
            wait_timeout: Duration::ZERO,
        }
    }

    pub fn wait_for(mut self, selector: impl Into<String>, timeout: Duration) -> Self {
        self.wait_for = Some(selector.into());
        self.wait_timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Final URL after redirects.
    pub url: String,
    pub html: String,
}

impl RenderedPage {
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<RenderedPage>;
}

/// Renders `url` and hands the page to `f`. The browser is already torn down
/// by the time `f` runs, whatever `f` does.
pub async fn with_page<R, T, F>(renderer: &R, url: &str, options: &RenderOptions, f: F) -> Result<T>
where
    R: PageRenderer + ?Sized,
    F: FnOnce(&RenderedPage) -> T,
{
    let page = renderer.render(url, options).await?;
    Ok(f(&page))
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Chrome binary; chromiumoxide searches the usual locations when unset.
    pub chrome_executable: Option<PathBuf>,
    pub user_agent: String,
    pub headless: bool,
    /// Quiet period after `document.readyState` reaches `complete`.
    pub settle: Duration,
    pub launch_timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headless: true,
            settle: Duration::from_millis(500),
            launch_timeout: Duration::from_secs(30),
        }
    }
}

fn render_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Render(format!("{}: {}", context, e))
}

/// One launched browser with its event loop and throwaway profile.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserSession {
    async fn launch(config: &RenderConfig) -> Result<Self> {
        let user_data_dir = std::env::temp_dir().join(format!("ar_chrome_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&user_data_dir)
            .map_err(|e| render_error("Failed to create browser profile", e))?;

        match Self::start(config, &user_data_dir).await {
            Ok((browser, handler)) => Ok(Self {
                browser,
                handler,
                user_data_dir: Some(user_data_dir),
            }),
            Err(e) => {
                let _ = std::fs::remove_dir_all(&user_data_dir);
                Err(e)
            }
        }
    }

    async fn start(config: &RenderConfig, user_data_dir: &Path) -> Result<(Browser, JoinHandle<()>)> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(config.launch_timeout)
            .user_data_dir(user_data_dir)
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .arg(format!("--user-agent={}", config.user_agent));
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder
            .build()
            .map_err(|e| render_error("Failed to build browser config", e))?;

        let (browser, mut handler) = tokio::time::timeout(config.launch_timeout, Browser::launch(browser_config))
            .await
            .map_err(|_| Error::Render("Timed out launching browser".to_string()))?
            .map_err(|e| render_error("Failed to launch browser", e))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {:?}", e);
                }
            }
        });

        Ok((browser, handler))
    }

    async fn load(&self, url: &str, options: &RenderOptions, config: &RenderConfig) -> Result<RenderedPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| render_error("Failed to open page", e))?;

        let result = load_page(&page, url, options, config).await;
        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }
        result
    }

    /// Explicit teardown. `Drop` covers every path that never gets here.
    async fn close(mut self) {
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, self.browser.close()).await {
            Ok(Ok(_)) => {
                if let Err(e) = tokio::time::timeout(SHUTDOWN_TIMEOUT, self.browser.wait()).await {
                    debug!("Browser did not exit in time: {}", e);
                }
            }
            Ok(Err(e)) => debug!("Failed to close browser: {}", e),
            Err(_) => warn!("Timed out closing browser"),
        }
        self.cleanup();
    }

    fn cleanup(&mut self) {
        self.handler.abort();
        if let Some(path) = self.user_data_dir.take() {
            if let Err(e) = std::fs::remove_dir_all(&path) {
                debug!("Failed to remove browser profile {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Browser's own Drop kills the child process
        self.cleanup();
    }
}

async fn load_page(page: &Page, url: &str, options: &RenderOptions, config: &RenderConfig) -> Result<RenderedPage> {
    page.goto(url)
        .await
        .map_err(|e| render_error(&format!("Failed to navigate to {}", url), e))?;

    wait_until_complete(page).await;
    tokio::time::sleep(config.settle).await;

    if let Some(selector) = &options.wait_for {
        if !wait_for_selector(page, selector, options.wait_timeout).await {
            debug!(selector = %selector, "Selector did not appear, continuing");
        }
    }

    let html = page
        .content()
        .await
        .map_err(|e| render_error("Failed to read page content", e))?;
    let final_url = page.url().await.ok().flatten().unwrap_or_else(|| url.to_string());

    Ok(RenderedPage { url: final_url, html })
}

/// Polls `document.readyState`. Bounded by the caller's load timeout.
async fn wait_until_complete(page: &Page) {
    loop {
        match page.evaluate("document.readyState").await {
            Ok(result) => {
                if result.into_value::<String>().map(|s| s == "complete").unwrap_or(false) {
                    return;
                }
            }
            Err(e) => debug!("Failed to check readyState: {}, retrying", e),
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration) -> bool {
    let start = Instant::now();
    loop {
        if page.find_element(selector).await.is_ok() {
            return true;
        }
        if start.elapsed() >= timeout {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Headless Chrome, one browser per render.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    config: RenderConfig,
}

impl ChromeRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<RenderedPage> {
        info!("🌐 Rendering {}", url);
        let session = BrowserSession::launch(&self.config).await?;

        let outcome = tokio::time::timeout(options.timeout, session.load(url, options, &self.config)).await;
        session.close().await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(Error::Render(format!(
                "Timed out after {}s loading {}",
                options.timeout.as_secs_f32(),
                url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StaticRenderer;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new(Duration::from_secs(30))
            .wait_for("article", Duration::from_secs(10));
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.wait_for.as_deref(), Some("article"));
        assert_eq!(options.wait_timeout, Duration::from_secs(10));

        let plain = RenderOptions::new(Duration::from_secs(20));
        assert!(plain.wait_for.is_none());
    }

    #[tokio::test]
    async fn test_with_page_passes_rendered_page() {
        let renderer = StaticRenderer::new().route("https://example.com/a", "<h1>Hello</h1>");
        let options = RenderOptions::new(Duration::from_secs(1));

        let title = with_page(&renderer, "https://example.com/a", &options, |page| {
            crate::extract::extract_title(&page.document())
        })
        .await
        .unwrap();
        assert_eq!(title.as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn test_with_page_propagates_render_failure() {
        let renderer = StaticRenderer::new();
        let options = RenderOptions::new(Duration::from_secs(1));

        let result = with_page(&renderer, "https://missing.example.com", &options, |_| ()).await;
        assert!(matches!(result, Err(Error::Render(_))));
    }

    #[tokio::test]
    async fn test_chrome_renderer_reports_missing_browser() {
        let renderer = ChromeRenderer::new(RenderConfig {
            chrome_executable: Some(PathBuf::from("/nonexistent/chrome")),
            launch_timeout: Duration::from_secs(5),
            ..RenderConfig::default()
        });
        let options = RenderOptions::new(Duration::from_secs(5));

        let result = renderer.render("https://example.com", &options).await;
        assert!(matches!(result, Err(Error::Render(_))));
    }
}
