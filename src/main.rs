use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daily_leetcode_bot::config::Config;
use daily_leetcode_bot::pipeline::DailyBot;
use daily_leetcode_bot::scheduler::{run_with_timeout, ScheduleTrigger};
use daily_leetcode_bot::server::{self, AppState};

#[derive(Parser)]
#[command(
    name = "daily-leetcode-bot",
    version,
    about = "Posts the LeetCode daily question, a Grind75 practice set and the Advent of Code puzzle",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TOML configuration file (environment variables are used otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run on the configured schedule until interrupted
    Run,

    /// Execute a single run now
    Once {
        /// Evaluate the run at this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<String>,

        /// Print the composed message instead of delivering it
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },

    /// Compose today's message and print it without delivering
    Preview {
        /// Evaluate at this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<String>,

        /// Which rendering to print
        #[arg(short, long, value_enum, default_value_t = PreviewFormat::Markdown)]
        format: PreviewFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PreviewFormat {
    Markdown,
    Blocks,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    config.validate().context("Invalid configuration")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Daily LeetCode bot starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            tracing::info!(
                cron = %config.schedule.cron,
                timezone = %config.schedule.timezone,
                "Starting run command"
            );
            run(config).await?;
        }

        Commands::Once { at, dry_run } => {
            tracing::info!(at = ?at, dry_run = %dry_run, "Starting once command");
            once(&config, parse_instant(at.as_deref())?, dry_run).await?;
        }

        Commands::Preview { at, format } => {
            tracing::info!(at = ?at, "Starting preview command");
            preview(&config, parse_instant(at.as_deref())?, format).await?;
        }
    }

    tracing::info!("Daily LeetCode bot finished");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::from_env().context("Failed to load configuration from environment"),
    }
}

fn parse_instant(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(value) => Ok(DateTime::parse_from_rfc3339(value)
            .with_context(|| format!("Invalid RFC 3339 instant: {value}"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("daily_leetcode_bot=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("daily_leetcode_bot={level},warn"))
            .with_context(|| format!("Invalid log level: {level}"))?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn run(config: Config) -> Result<()> {
    let bot = Arc::new(DailyBot::from_config(&config)?);
    let trigger = Arc::new(ScheduleTrigger::new(
        config.trigger_config(),
        config.run_timeout(),
    )?);

    tracing::info!(
        destinations = ?bot.notifier().channel_names(),
        next_run = ?trigger.next_run(),
        "Bot ready"
    );

    let (shutdown_tx, _) = tokio::sync::watch::channel(false);

    let server = match config.server.port {
        Some(port) => {
            let listener = server::bind(port).await?;
            let mut shutdown = shutdown_tx.subscribe();
            Some(tokio::spawn(server::serve(
                listener,
                AppState::new(Arc::clone(&trigger)),
                async move {
                    let _ = shutdown.changed().await;
                },
            )))
        }
        None => None,
    };

    {
        let trigger = Arc::clone(&trigger);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown requested");
            trigger.stop();
            shutdown_tx.send_replace(true);
        });
    }

    trigger
        .start(move |scheduled| {
            let bot = Arc::clone(&bot);
            async move {
                let mut rng = ChaCha8Rng::from_entropy();
                bot.run_at(scheduled, &mut rng, false).await.map(|_| ())
            }
        })
        .await?;

    if let Some(handle) = server {
        handle.await.context("Status server task panicked")??;
    }

    Ok(())
}

async fn once(config: &Config, at: DateTime<Utc>, dry_run: bool) -> Result<()> {
    let bot = if dry_run {
        DailyBot::without_delivery(config)?
    } else {
        DailyBot::from_config(config)?
    };

    let mut rng = ChaCha8Rng::from_entropy();
    let report = run_with_timeout(config.run_timeout(), bot.run_at(at, &mut rng, dry_run)).await?;

    if dry_run {
        println!("{}", report.message.markdown);
        println!("{}", serde_json::to_string_pretty(&report.message.blocks)?);
        return Ok(());
    }

    for status in &report.deliveries {
        println!("{status}");
    }

    if report.delivered_count() == 0 {
        anyhow::bail!("No destination accepted the message");
    }

    Ok(())
}

async fn preview(config: &Config, at: DateTime<Utc>, format: PreviewFormat) -> Result<()> {
    let bot = DailyBot::without_delivery(config)?;
    let mut rng = ChaCha8Rng::from_entropy();
    let message = run_with_timeout(config.run_timeout(), bot.preview(at, &mut rng)).await?;

    match format {
        PreviewFormat::Markdown => println!("{}", message.markdown),
        PreviewFormat::Blocks => println!("{}", serde_json::to_string_pretty(&message.blocks)?),
    }

    Ok(())
}
