use std::sync::Arc;

use anyhow::{Context, Result};
use maud::Render;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use facefeed::components::FeedFragment;
use facefeed::config::Config;
use facefeed::graph::GraphClient;
use facefeed::{web, widget};

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Print every configured feed to stdout once.
    Render,
    /// Serve feeds over HTTP until interrupted.
    Serve,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let mode = parse_mode(std::env::args().nth(1).as_deref())?;

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        graph_url = %config.graph_url,
        targets = config.targets.len(),
        ?mode,
        "Configuration loaded"
    );

    let client = GraphClient::new(&config.graph_url, config.http_timeout)
        .context("Failed to create Graph API client")?;

    match mode {
        Mode::Render => render(&config, &client).await,
        Mode::Serve => serve(config, client).await,
    }
}

fn parse_mode(arg: Option<&str>) -> Result<Mode> {
    match arg {
        None | Some("render") => Ok(Mode::Render),
        Some("serve") => Ok(Mode::Serve),
        Some(other) => anyhow::bail!("unknown command '{other}' (expected 'render' or 'serve')"),
    }
}

async fn render(config: &Config, client: &GraphClient) -> Result<()> {
    let outputs = widget::load_all(client, &config.targets).await;

    let mut failed = 0usize;
    for output in &outputs {
        if output.result.is_err() {
            failed += 1;
        }
        println!(
            "{}",
            FeedFragment::new(&output.widget.name, output.html.as_str())
                .render()
                .into_string()
        );
    }

    if failed > 0 {
        warn!(failed, total = outputs.len(), "Some feeds could not be loaded");
    }
    Ok(())
}

async fn serve(config: Config, client: GraphClient) -> Result<()> {
    let server = tokio::spawn(web::serve(config, Arc::new(client)));

    tokio::select! {
        result = server => {
            result.context("Web server task panicked")??;
        }
        () = shutdown_signal() => {
            info!("Shutting down...");
        }
    }

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,facefeed=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    // Logs go to stderr so rendered HTML on stdout stays clean.
    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
