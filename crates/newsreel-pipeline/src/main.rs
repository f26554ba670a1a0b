//! Article-to-video worker binary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsreel_media::{FfprobeDuration, RenderExecutor};
use newsreel_models::Article;
use newsreel_pipeline::{AssetResolver, Pipeline, PipelineConfig, RenderPlanner};
use newsreel_providers::{HttpImageFetcher, ImageGenClient, ImageSearchClient, SpeechClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("newsreel=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let mut args = std::env::args().skip(1);
    let article_path = args
        .next()
        .context("usage: newsreel-worker <article.json> [narration.txt]")?;
    let narration_path = args.next();

    let raw = tokio::fs::read_to_string(&article_path)
        .await
        .with_context(|| format!("reading article {}", article_path))?;
    let article: Article =
        serde_json::from_str(&raw).with_context(|| format!("parsing article {}", article_path))?;

    // Narration defaults to the article body when no script is supplied
    let narration = match &narration_path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading narration {}", path))?,
        None => article.content.clone(),
    };

    info!("Starting newsreel-worker");
    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    let resolver = AssetResolver::new(
        Arc::new(SpeechClient::from_env().context("creating speech client")?),
        Arc::new(ImageSearchClient::from_env().context("creating image search client")?),
        Arc::new(ImageGenClient::from_env().context("creating image generation client")?),
        Arc::new(
            HttpImageFetcher::new(Duration::from_secs(30)).context("creating image fetcher")?,
        ),
        config.max_parallel_segments,
    );
    let planner = RenderPlanner::new(
        config.output.clone(),
        config.motion.clone(),
        config.effect_weights.clone(),
        Arc::new(FfprobeDuration),
    );
    let executor = RenderExecutor::new(config.render_timeout_secs);
    let pipeline = Pipeline::new(config, resolver, planner, executor);

    match pipeline.run(&article, &narration).await {
        Ok(outcome) => {
            info!(
                "Run {} finished: {}",
                outcome.run_id,
                outcome.output.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}
