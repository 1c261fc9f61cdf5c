use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use carelink_server::{create_app, AppConfig, CareLinkServer};

/// CareLink Engine HTTP Server
#[derive(Parser, Debug)]
#[command(name = "carelink-server")]
#[command(about = "Care appointment booking API server")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Run with in-memory storage (no database required)
    #[arg(long)]
    memory: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    info!("Starting CareLink Engine HTTP server");
    info!(version = env!("CARGO_PKG_VERSION"), "build");

    let config = AppConfig::from_env();

    let server = if args.memory {
        info!("Using in-memory storage (development mode, nothing persists)");
        CareLinkServer::in_memory(&config)
    } else {
        let url = config
            .database_url
            .clone()
            .context("DATABASE_URL must be set (or pass --memory)")?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&url)
            .await
            .context("failed to connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;
        info!("Database connected and migrated");
        CareLinkServer::with_postgres(pool, &config)
    };

    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("CareLink Engine listening on http://{addr}");
    info!("API v1 available at http://{addr}/api/v1");
    info!("Authentication endpoints at http://{addr}/api/v1/auth");

    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("carelink_server={default_level},tower_http=info,sqlx=warn").into()
    });

    let is_development = std::env::var("CARELINK_ENV")
        .map(|v| v == "development")
        .unwrap_or(true);

    if is_development {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .init();
    } else {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_ansi(false).json())
            .init();
    }
}
