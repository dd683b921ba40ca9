mod duration;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use cb_core::{ArticleFeed, ArticleSearch, Publisher, SearchHit, SeenUrlStore};
use cb_pipeline::{load_config, load_hashtags, Bot, BotConfig, Collaborators, RunOptions, RunOutcome};
use cb_render::{SkiaRasterizer, TtfFont, TtfFontSet};
use cb_scrapers::{DryRunPublisher, GoogleSearch, SoccerNewsScraper, TimelineFeed, XPublisher};
use clap::Parser;
use tracing::{info, warn, Level};

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turns SoccerNews articles into image posts", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration
    #[arg(long, default_value = "bot.toml")]
    config: PathBuf,
    #[arg(long, default_value = "info")]
    log_level: Level,
    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Timeout for every outbound call (e.g. 30s, 1m)
    #[arg(long)]
    timeout: Option<HumanDuration>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Process the newest article (or the given one) and publish it
    Run {
        #[arg(long)]
        url: Option<String>,
        /// Process the article even if it was seen before
        #[arg(long)]
        force: bool,
        /// Write the image to disk and log the caption instead of posting
        #[arg(long)]
        dry_run: bool,
    },
    /// Show classification, attribution and caption for an article
    Preview {
        url: String,
        /// Also write the image here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the image for an article, accepted or not
    Render {
        url: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Stands in for Google search when no credentials are configured.
struct UnconfiguredSearch;

#[async_trait]
impl ArticleSearch for UnconfiguredSearch {
    async fn search(&self, _query: &str) -> cb_core::Result<Vec<SearchHit>> {
        Err(cb_core::Error::Search(
            "API_KEY and SEARCH_ENGINE_ID are not set".to_string(),
        ))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn load_fonts(config: &BotConfig) -> Result<Arc<TtfFontSet>> {
    let fonts = &config.layout.fonts;
    let load = |path: &Path, size: f32| {
        TtfFont::load(path, size).with_context(|| format!("Failed to load font {}", path.display()))
    };
    Ok(Arc::new(TtfFontSet::new(
        load(&fonts.title.path, fonts.title.size)?,
        load(&fonts.preface.path, fonts.preface.size)?,
        load(&fonts.body.path, fonts.body.size)?,
    )))
}

fn build_bot(config: &BotConfig, dry_run: bool) -> Result<Bot> {
    let timeout = config.http.timeout();
    let client = cb_scrapers::http_client(&config.http.user_agent, timeout)?;

    let scraper = SoccerNewsScraper::new(&config.http.user_agent, timeout)?;

    let feed: Option<Arc<dyn ArticleFeed>> = match env_var("X_BEARER_TOKEN") {
        Some(token) => Some(Arc::new(TimelineFeed::new(client.clone(), token, &config.feed.account))),
        None => {
            warn!("⚠️ X_BEARER_TOKEN not set, an article URL is required");
            None
        }
    };

    let search: Arc<dyn ArticleSearch> = match (env_var("API_KEY"), env_var("SEARCH_ENGINE_ID")) {
        (Some(key), Some(engine)) => Arc::new(GoogleSearch::new(client.clone(), key, engine)),
        _ => {
            warn!("⚠️ Search credentials not set, quotes will not be traced to a link");
            Arc::new(UnconfiguredSearch)
        }
    };

    let (store, publisher): (Arc<dyn SeenUrlStore>, Arc<dyn Publisher>) = if dry_run {
        info!("🧪 Dry run: nothing is posted and the seen-URL marker is left alone");
        (
            cb_storage::create_store("memory", &config.storage.path)?,
            Arc::new(DryRunPublisher::new(&config.output_path, &config.caption.link_marker)),
        )
    } else {
        let token = env_var("X_USER_TOKEN").context("X_USER_TOKEN must be set to publish")?;
        (
            cb_storage::create_store(&config.storage.kind, &config.storage.path)?,
            Arc::new(XPublisher::new(client, token)),
        )
    };

    let fonts = load_fonts(config)?;
    let hashtags = load_hashtags(&config.hashtags_path)?;

    let collaborators = Collaborators {
        scrapers: vec![Arc::new(scraper)],
        feed,
        search,
        store,
        fonts: fonts.clone(),
        rasterizer: Arc::new(SkiaRasterizer::new(fonts)),
        publisher,
    };
    Ok(Bot::new(config, hashtags, collaborators)?)
}

fn write_image(path: &Path, image: &[u8]) -> Result<()> {
    std::fs::write(path, image).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Image written to {}", path.display());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cb_scrapers::init_logging(cli.log_level, cli.log_file.as_deref())?;

    let mut config = load_config(&cli.config)?;
    if let Some(HumanDuration(timeout)) = cli.timeout {
        config.http.timeout_secs = timeout.as_secs();
    }

    match cli.command {
        Commands::Run { url, force, dry_run } => {
            let bot = build_bot(&config, dry_run)?;
            match bot.run(RunOptions { url, force }).await? {
                RunOutcome::AlreadySeen { url } => info!("😴 Nothing to do, {} was already handled", url),
                RunOutcome::Rejected { url, reason } => info!("🚫 {} rejected ({})", url, reason),
                RunOutcome::Published { url, result, .. } => match result.url {
                    Some(link) => info!("🎉 {} published at {}", url, link),
                    None => info!("🎉 {} published", url),
                },
            }
        }
        Commands::Preview { url, out } => {
            let bot = build_bot(&config, true)?;
            let preview = bot.preview(&url).await?;
            let article = &preview.article;
            println!("Title:    {}", article.title);
            println!("Length:   {} characters", article.text_length());
            println!("Keywords: {}", article.keywords.join(", "));
            match preview.classification.reason {
                Some(reason) => println!("Verdict:  rejected ({})", reason),
                None => println!("Verdict:  accepted"),
            }
            if let Some(post) = preview.post {
                println!("Source:   {:?}", post.attribution);
                println!("\n{}", post.caption);
                if let Some(out) = out {
                    write_image(&out, &post.image)?;
                }
            }
        }
        Commands::Render { url, out } => {
            let bot = build_bot(&config, true)?;
            let image = bot.render(&url).await?;
            write_image(out.as_deref().unwrap_or(config.output_path.as_path()), &image)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "cb",
            "--timeout",
            "1m",
            "--log-level",
            "debug",
            "run",
            "--url",
            "https://www.soccernews.nl/news/1",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.timeout.map(|t| t.0.as_secs()), Some(60));
        assert_eq!(cli.log_level, Level::DEBUG);
        assert!(matches!(
            cli.command,
            Commands::Run { force: false, dry_run: true, ref url } if url.as_deref() == Some("https://www.soccernews.nl/news/1")
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_search_fails_softly() {
        let err = UnconfiguredSearch.search("\"quote\"").await.unwrap_err();
        assert!(err.is_recoverable());
    }
}
