use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unimarket_optimizer::app::{optimize_file, App};
use unimarket_optimizer::image::{profile, SizeProfile, WebpOptimizer};
use unimarket_optimizer::models::{Config, ListingKind};

#[derive(Debug, Parser)]
#[command(name = "unimarket-optimizer")]
#[command(about = "Optimize UniMarket listing photos")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Re-encode one image file as bounded WebP next to the input.
    File {
        path: PathBuf,
        #[arg(long, value_enum, default_value = "product")]
        profile: ProfileArg,
    },
    /// Re-encode one batch of a listing table's inline photos.
    Sweep {
        kind: KindArg,
        #[arg(long, default_value_t = 10)]
        batch_size: usize,
    },
    /// Convert one batch of legacy free-text prices to structured ranges.
    MigratePrices {
        kind: KindArg,
        #[arg(long, default_value_t = 50)]
        batch_size: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    Product,
    Service,
    House,
    Thumbnail,
}

impl From<ProfileArg> for SizeProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Product => profile::PRODUCT,
            ProfileArg::Service => profile::SERVICE,
            ProfileArg::House => profile::HOUSE,
            ProfileArg::Thumbnail => profile::THUMBNAIL,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Products,
    Services,
    Houses,
}

impl From<KindArg> for ListingKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Products => ListingKind::Product,
            KindArg::Services => ListingKind::Service,
            KindArg::Houses => ListingKind::House,
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::File { path, profile } => {
            let optimizer = WebpOptimizer::new();
            let output = optimize_file(&optimizer, &path, profile.into()).await?;
            info!("Wrote {}", output.display());
        }
        Command::Sweep { kind, batch_size } => {
            let config = Config::from_env()?;
            let app = App::new(&config);
            let report = app.sweep_photos(kind.into(), batch_size).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::MigratePrices { kind, batch_size } => {
            let config = Config::from_env()?;
            let app = App::new(&config);
            let report = app.migrate_prices(kind.into(), batch_size).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unimarket_optimizer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}
