use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use tracing::info;

use askdb_api::config::ApiConfig;
use askdb_api::handlers;
use askdb_api::AppState;
use askdb_llm::groq::GroqClient;

#[derive(Parser, Debug)]
#[command(name = "askdb-api", about = "Natural language to SQL API server")]
struct Args {
    /// Bind host, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides the config file
    #[arg(long)]
    port: Option<u16>,

    /// Database file to open at startup instead of the demo database
    #[arg(long)]
    database: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let (config, config_path) = ApiConfig::load().context("failed to load configuration")?;
    info!(path = %config_path.display(), "configuration loaded");

    // The API key lives in the environment only. A missing key is a
    // startup failure, not a per-query surprise.
    let api_key = std::env::var("GROQ_API_KEY")
        .context("GROQ_API_KEY environment variable is not set")?;
    let llm_client = GroqClient::new(api_key).context("failed to create Groq client")?;

    let demo_path = config.database.demo_path.clone();
    if !demo_path.exists() {
        info!(path = %demo_path.display(), "seeding demo database");
        handlers::database::seed_demo_at(&demo_path).context("failed to seed demo database")?;
    }

    let db_path = args.database.unwrap_or_else(|| demo_path.clone());

    let state = web::Data::new(AppState::new(
        db_path,
        demo_path,
        Arc::new(llm_client),
        config.llm.model.clone(),
        config.llm.max_tokens,
        config.executor.max_rows,
    ));

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    info!("Starting askdb-api server at http://{}", bind_addr);

    let allowed_origins = config
        .cors
        .map(|c| c.allowed_origins)
        .unwrap_or_default();

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header();
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(handlers::ask::ask)
            .service(handlers::execute::execute)
            .service(handlers::schema::schema)
            .service(handlers::database::select_database)
            .service(handlers::database::reset_demo_database)
            .service(handlers::logs::logs)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
