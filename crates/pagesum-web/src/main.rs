//! PageSum web server - summarize pages through a small HTTP API

mod routes;

use clap::Parser;
use pagesum::{Config, PageSummarizer, DEFAULT_MODEL};
use routes::AppState;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// PageSum web server
#[derive(Parser, Debug)]
#[command(name = "pagesum-web")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API key for the completion endpoint (required)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API root of an OpenAI-compatible endpoint
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Model identifier
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Address to bind
    #[arg(long, env = "PAGESUM_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PAGESUM_PORT", default_value_t = 5000)]
    port: u16,

    /// Verbose logging
    #[arg(long, env = "PAGESUM_DEBUG")]
    debug: bool,
}

impl Args {
    fn config(&self) -> Option<Config> {
        let api_key = self.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        let mut config = Config::new(api_key).model(self.model.clone());
        if let Some(ref base_url) = self.base_url {
            config = config.base_url(base_url.clone());
        }
        Some(config)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(config) = args.config() else {
        eprintln!("Error: OPENAI_API_KEY is not set");
        eprintln!("Set it in the environment or pass --api-key:");
        eprintln!("  export OPENAI_API_KEY=\"your_key\"");
        std::process::exit(1);
    };

    let summarizer = match PageSummarizer::from_config(&config) {
        Ok(summarizer) => summarizer,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let app = routes::router(AppState {
        summarizer: Arc::new(summarizer),
    });

    let addr = format!("{}:{}", args.host, args.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(
        local = %format!("http://localhost:{}", args.port),
        network = %format!("http://{addr}"),
        debug = args.debug,
        model = %config.model,
        "PageSum server started"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
