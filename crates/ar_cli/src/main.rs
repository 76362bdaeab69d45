use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use ar_inference::RewriteEngine;
use ar_scrapers::discovery::DEFAULT_SOURCE_URL;
use ar_scrapers::{
    ChromeRenderer, PageRenderer, ReferenceSearch, RenderConfig, ScraperConfig, SearchConfig,
    SourceScraper, UpdateManager,
};
use ar_web::AppState;

mod duration;
mod logging;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape blog articles and rewrite them with reference material", long_about = None)]
pub struct Cli {
    /// Storage backend: memory or sqlite
    #[arg(long, env = "AR_STORAGE", default_value = "memory", global = true)]
    storage: String,
    /// SQLite database file, ignored by the memory backend
    #[arg(long, env = "AR_DATABASE_URL", default_value = "articles.db", global = true)]
    database_url: String,
    /// Credential for the generative service; without it rewrites use the template
    #[arg(long, env = "OPENAI_KEY", hide_env_values = true, global = true)]
    openai_key: Option<String>,
    #[arg(long, env = "AR_MODEL", default_value = "gpt-3.5-turbo", global = true)]
    model: String,
    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "AR_MODEL_URL", default_value = "https://api.openai.com/v1", global = true)]
    model_url: String,
    /// Blog listing page to scrape
    #[arg(long, env = "AR_SOURCE_URL", default_value = DEFAULT_SOURCE_URL, global = true)]
    source_url: String,
    /// Chrome or Chromium binary
    #[arg(long, env = "CHROME", global = true)]
    chrome_executable: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "AR_BIND", default_value = "0.0.0.0:5000")]
        bind: SocketAddr,
    },
    /// Scrape the source blog and store articles not seen before
    Scrape,
    /// Rewrite every pending article
    Update {
        /// Keep running, one pass per interval (e.g. 30m, 1h, 1h15m)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Print stored articles
    List,
}

async fn build_manager(cli: &Cli) -> anyhow::Result<UpdateManager> {
    let database_url = (cli.storage != "memory").then_some(cli.database_url.as_str());
    let storage = ar_storage::create_storage(&cli.storage, database_url).await?;

    let renderer: Arc<dyn PageRenderer> = Arc::new(ChromeRenderer::new(RenderConfig {
        chrome_executable: cli.chrome_executable.clone(),
        ..RenderConfig::default()
    }));
    let source = SourceScraper::new(
        renderer.clone(),
        ScraperConfig {
            listing_url: cli.source_url.clone(),
            ..ScraperConfig::default()
        },
    );
    let references = ReferenceSearch::new(renderer, SearchConfig::default());

    let config = ar_inference::Config {
        api_key: cli.openai_key.clone(),
        model_name: cli.model.clone(),
        base_url: cli.model_url.clone(),
        ..ar_inference::Config::default()
    };
    let rewriter = RewriteEngine::from_config(&config)?;
    if rewriter.is_online() {
        info!("🧠 Rewrites use {} at {}", config.model_name, config.base_url);
    } else {
        info!("🧠 Rewrites use the offline template");
    }

    Ok(UpdateManager::new(
        storage,
        Arc::new(source),
        Arc::new(references),
        rewriter,
    ))
}

async fn update_once(manager: &UpdateManager) -> anyhow::Result<()> {
    let summary = manager.run_update().await?;
    println!("{} ({} of {} pending)", summary.message, summary.updated, summary.total);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let manager = Arc::new(build_manager(&cli).await?);

    match cli.command {
        Commands::Serve { bind } => {
            ar_web::serve(AppState::new(manager), bind).await?;
        }
        Commands::Scrape => {
            let summary = manager.scrape_and_save().await?;
            println!("{}", summary.message);
            for article in &summary.articles {
                println!("  + {}", article.title);
            }
        }
        Commands::Update { interval: None } => update_once(&manager).await?,
        Commands::Update { interval: Some(interval) } => {
            info!("Running in periodic mode every {}s", interval.0.as_secs());
            loop {
                if let Err(e) = update_once(&manager).await {
                    error!("Error during update: {}", e);
                }
                info!("Waiting {}s before next update", interval.0.as_secs());
                tokio::time::sleep(interval.0).await;
            }
        }
        Commands::List => {
            let articles = manager.storage().list().await?;
            println!("{} articles", articles.len());
            for article in articles {
                let marker = if article.is_pending() { " " } else { "✓" };
                println!("[{}] {}  {}", marker, article.id, article.title);
            }
        }
    }

    Ok(())
}
