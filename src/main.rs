use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use constellation::api::{self, MockBackend};
use constellation::engine::reasoning::{overall_confidence, reasoning_segments};
use constellation::providers::{AgentBackend, HttpBackend};
use constellation::store::{ConstellationStore, DEFAULT_THOUGHT_CENTER};
use constellation::{Config, ConstellationPoller, QueryRequest, ResourceRegistry, ThoughtNetwork};

#[derive(Parser)]
#[command(name = "constellation")]
#[command(about = "Agent constellation state derivation and mock agent backend", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file; environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the backend and print constellation snapshots as JSON
    Watch {
        #[arg(long)]
        backend_url: Option<String>,
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Poll a single time and exit
        #[arg(long)]
        once: bool,
    },
    /// Run the simulated agent backend
    MockServer {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Send a query to the backend
    Query {
        #[arg(help = "Query text")]
        text: String,
        #[arg(long)]
        backend_url: Option<String>,
    },
    /// Ask the backend to stop processing
    Stop {
        #[arg(long)]
        backend_url: Option<String>,
    },
    /// Print the thought network derived from reasoning text
    Reason {
        #[arg(help = "Reasoning text")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Watch {
            backend_url,
            interval_ms,
            once,
        } => {
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.poll_interval());
            watch_backend(&config, backend_url, interval, once).await
        }
        Commands::MockServer { port } => {
            let backend = Arc::new(MockBackend::new(config.query_delay()));
            api::serve(backend, port.unwrap_or(config.mock_port)).await
        }
        Commands::Query { text, backend_url } => {
            let backend = HttpBackend::new(Some(backend_url.unwrap_or(config.backend_url)));
            let response = backend
                .send_query(QueryRequest {
                    query: text,
                    tts_enabled: false,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Commands::Stop { backend_url } => {
            let backend = HttpBackend::new(Some(backend_url.unwrap_or(config.backend_url)));
            let response = backend.stop().await?;
            println!("{}", response.message);
            Ok(())
        }
        Commands::Reason { text } => print_reasoning(&text),
    };

    ResourceRegistry::shared().shutdown();
    result
}

async fn watch_backend(
    config: &Config,
    backend_url: Option<String>,
    interval: Duration,
    once: bool,
) -> Result<()> {
    let backend_url = backend_url.unwrap_or_else(|| config.backend_url.clone());
    let backend: Arc<dyn AgentBackend> = Arc::new(HttpBackend::new(Some(backend_url)));
    let store = Arc::new(ConstellationStore::with_defaults());
    let poller = ConstellationPoller::new(backend, store.clone());
    let radius = config.constellation_radius;

    if once {
        let mut rng = StdRng::from_entropy();
        if !poller.poll_once(&mut rng).await {
            anyhow::bail!("Backend did not answer");
        }
        println!("{}", serde_json::to_string_pretty(&store.snapshot(radius))?);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl+C received, shutting down");
        }
        let _ = shutdown_tx.send(true);
    });

    poller
        .run(interval, shutdown_rx, |ok, store| {
            if !ok {
                return;
            }
            match serde_json::to_string(&store.snapshot(radius)) {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
            }
        })
        .await
}

fn print_reasoning(text: &str) -> Result<()> {
    let mut rng = StdRng::from_entropy();
    let network = ThoughtNetwork::build(text, DEFAULT_THOUGHT_CENTER, 1.0, &mut rng);
    let segments = reasoning_segments(text, DEFAULT_THOUGHT_CENTER, &mut rng);

    let output = serde_json::json!({
        "network": network,
        "segments": segments,
        "overall_confidence": overall_confidence(&segments),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
