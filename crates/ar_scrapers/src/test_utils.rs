use std::collections::HashMap;
use std::sync::Mutex;

use ar_core::{Error, Result};
use async_trait::async_trait;

use crate::render::{PageRenderer, RenderOptions, RenderedPage};

/// Serves canned HTML by exact URL and records every request.
#[derive(Default)]
pub struct StaticRenderer {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&self, url: &str, _options: &RenderOptions) -> Result<RenderedPage> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => Ok(RenderedPage {
                url: url.to_string(),
                html: html.clone(),
            }),
            None => Err(Error::Render(format!("net::ERR_NAME_NOT_RESOLVED at {}", url))),
        }
    }
}

pub fn paragraphs(seed: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("<p>{} paragraph {} carries enough words to count as real content.</p>", seed, i))
        .collect()
}

pub fn article_page(title: &str, paragraph_count: usize) -> String {
    format!(
        "<html><body><header><a href=\"/\">Home</a></header><h1>{}</h1><article>{}</article></body></html>",
        title,
        paragraphs(title, paragraph_count)
    )
}
