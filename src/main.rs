mod api_types;
mod bonus;
mod config;
mod deliver;
mod fetch;
mod llm;
mod models;
mod narrative;
mod orchestrator;
mod parse;
mod prompts;
mod render;
mod select;

use anyhow::{anyhow, Result};
use awful_aj::{config as aj_config, template};
use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{resolve_aj_config, Config};
use crate::deliver::{DeliveryChannel, SmtpMailer, StdoutChannel};
use crate::fetch::ArxivSource;
use crate::llm::AwfulJadeGenerator;
use crate::orchestrator::{run_daily, RunSettings};

/// arXiv Digest - daily AI research picks, summarized and emailed
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to awful_aj config file (overrides AJ_CONFIG environment variable)
    #[arg(short, long)]
    config: Option<String>,

    /// Print the digest to stdout instead of emailing it
    #[arg(long)]
    dry_run: bool,

    /// Seed for the bonus-reading sampler
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    info!("Starting arxiv_digest");

    let args = Args::parse();
    let settings = Config::from_env(!args.dry_run)?;

    let cfg_path = resolve_aj_config(args.config.as_deref())?;
    debug!("Using awful_aj config: {}", cfg_path.display());

    // Friendlier error if missing
    if !cfg_path.exists() {
        return Err(anyhow!(
            "awful_aj config not found at {}\n\
             Use --config to specify a config file, or set AJ_CONFIG environment variable.\n\
             Example config.yaml:\n\
             api_key: \"YOUR_KEY\"\napi_base: \"http://localhost:5001/v1\"\nmodel: \"qwen3_30b_a3\"\n",
            cfg_path.display()
        ));
    }

    let cfg = aj_config::load_config(
        cfg_path
            .to_str()
            .ok_or_else(|| anyhow!("invalid config path"))?,
    )
    .map_err(|e| anyhow!(e.to_string()))?;

    let tpl_select = template::load_template(&settings.tpl_select)
        .await
        .map_err(|e| anyhow!("loading template {}: {}", settings.tpl_select, e))?;
    let tpl_narrative = template::load_template(&settings.tpl_narrative)
        .await
        .map_err(|e| anyhow!("loading template {}: {}", settings.tpl_narrative, e))?;

    let today = Utc::now().with_timezone(&settings.timezone).date_naive();
    info!("Digest date={} (timezone={})", today, settings.timezone);

    let generator = AwfulJadeGenerator::new(cfg, tpl_select, tpl_narrative, settings.llm_timeout);
    let source = ArxivSource::new(reqwest::Client::builder().build()?);

    let channel: Box<dyn DeliveryChannel> = match (&settings.smtp, args.dry_run) {
        (Some(smtp), false) => Box::new(SmtpMailer::new(smtp.clone())),
        _ => Box::new(StdoutChannel),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    run_daily(
        &source,
        &generator,
        channel.as_ref(),
        RunSettings {
            max_results: settings.max_results,
            narrative_concurrency: settings.narrative_concurrency,
            recipients: &settings.recipients,
            date: today,
        },
        &mut rng,
    )
    .await?;

    info!("Done.");
    Ok(())
}
