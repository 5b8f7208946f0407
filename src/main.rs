use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use finperf_gateway::catalog::CatalogStore;
use finperf_gateway::completion::HttpCompletionClient;
use finperf_gateway::config::Config;
use finperf_gateway::invoker::EndpointInvoker;
use finperf_gateway::orchestrator::{OrchestrationEngine, SessionStore};
use finperf_gateway::web::{catalog_reload_handler, health_check, query_handler, AppState};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = finperf_gateway::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Server host
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(long)]
    port: Option<u16>,

    /// Override catalogue file path
    #[arg(long)]
    catalog: Option<String>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let config = Config::load(&cli.config, cli.host, cli.port, cli.catalog).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Catalogue load failure is a startup-fatal configuration error
    let catalog = Arc::new(CatalogStore::load(&config.catalog.path).map_err(|e| {
        error!("Failed to load catalogue: {}", e);
        e
    })?);

    let completion = Arc::new(HttpCompletionClient::new(config.completion.clone())?);
    let invoker = EndpointInvoker::new(
        config.catalog.default_base_url.clone(),
        config.catalog.invoke_timeout,
    )?;

    let engine = Arc::new(OrchestrationEngine::new(
        Arc::clone(&catalog),
        completion,
        invoker,
    ));

    let app_state = web::Data::new(AppState {
        engine,
        sessions: SessionStore::new(),
        catalog,
    });

    info!(
        "Starting finperf-gateway v{} on {}:{}",
        finperf_gateway::VERSION,
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .route("/health", web::get().to(health_check))
            .route("/query", web::post().to(query_handler))
            .route("/catalog/reload", web::post().to(catalog_reload_handler))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    Ok(())
}
