use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use antennas::{
    backend::{ListingsBackend, TvheadendClient},
    config::Config,
    device::DeviceIdentity,
    guide::{GuideCompiler, GuideService},
    scheduler::GuideScheduler,
    ssdp::SsdpAdvertiser,
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "antennas")]
#[command(version)]
#[command(about = "Presents a Tvheadend server as a network tuner with an XMLTV guide")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.log_level == "trace" {
        format!("antennas={},tower_http=trace", cli.log_level)
    } else {
        format!("antennas={},tower_http=info", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Antennas v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match Config::load_from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Refusing to start: {}", e);
            return Err(e.into());
        }
    };
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    let config = Arc::new(config);

    let client = TvheadendClient::new(&config.backend)?;
    info!("Using Tvheadend at {}", client.display_url());
    let backend: Arc<dyn ListingsBackend> = Arc::new(client);

    let identity = Arc::new(DeviceIdentity::from_config(&config));
    let compiler = GuideCompiler::new(
        backend.clone(),
        config.guide.path.clone(),
        u64::from(config.guide.page_size),
    );
    let guide = Arc::new(GuideService::new(compiler));

    let cancel = CancellationToken::new();
    let mut background = Vec::new();

    let scheduler = GuideScheduler::new(guide.clone(), &config.guide)?;
    background.push(tokio::spawn(scheduler.run(cancel.child_token())));

    if config.discovery.enabled {
        let advertiser = SsdpAdvertiser::new(&identity, &config.discovery)?;
        background.push(tokio::spawn(advertiser.run(cancel.child_token())));
    } else {
        info!("SSDP discovery disabled by configuration");
    }

    let web_server = WebServer::new(AppState {
        config: config.clone(),
        identity,
        backend,
        guide,
    })?;

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, shutting down");
                shutdown.cancel();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let served = web_server.serve_with_cancellation(cancel.clone()).await;
    // A bind failure must still stop the background tasks
    cancel.cancel();
    for handle in background {
        if let Err(e) = handle.await {
            error!("Background task failed: {}", e);
        }
    }

    served?;
    info!("Antennas stopped");
    Ok(())
}
