use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use gallery_bridge::config::BridgeConfig;
use gallery_bridge::feed::client::GalleryFeedClient;
use gallery_bridge::server::{self, AppState};
use gallery_bridge::service::spawn::TokioSpawn;
use gallery_bridge::service::synthesizer::RegistrationService;
use gallery_bridge::store::memory::MemoryStore;

#[derive(Parser)]
#[command(name = "gallery-bridge")]
#[command(version, about = "NuGet v2 to v3 registration bridge")]
struct Cli {
    /// Address to listen on
    #[arg(long)]
    listen: Option<String>,

    /// Upstream NuGet v2 feed base URL
    #[arg(long)]
    upstream: Option<String>,

    /// Concurrent upstream fetches during readahead
    #[arg(long)]
    concurrency: Option<usize>,

    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> anyhow::Result<BridgeConfig> {
    let mut config = match &cli.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => BridgeConfig::default(),
    };
    if let Some(listen) = &cli.listen {
        config.listen_addr = listen.clone();
    }
    if let Some(upstream) = &cli.upstream {
        config.upstream_url = upstream.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.readahead_concurrency = concurrency;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = load_config(&cli)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    let public_base = config
        .public_base
        .as_deref()
        .map(Url::parse)
        .transpose()?;

    let service = RegistrationService::new(
        Arc::new(GalleryFeedClient::new(&config.upstream_url)),
        Arc::new(MemoryStore::new()),
        Arc::new(TokioSpawn),
        &config,
    );

    let state = Arc::new(AppState::new(service, public_base));
    server::run(state, &config.listen_addr).await
}
