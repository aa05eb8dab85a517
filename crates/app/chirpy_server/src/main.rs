//! Chirpy API server binary.
//!
//! Reads `.env`, connects to PostgreSQL, runs migrations and serves the API.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use chirpy_api::AppState;
use chirpy_api::config::ApiConfig;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "chirpy_server", about = "Chirpy API server")]
struct Args {
    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Interface to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Full listen address; takes precedence over `--host` and `--port`.
    #[arg(long, env = "BIND_ADDR")]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/chirpy"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep all data in process memory instead of PostgreSQL.
    #[arg(long, default_value_t = false)]
    in_memory: bool,
}

impl Args {
    fn listen_addr(&self) -> String {
        self.bind_addr
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.host, self.port))
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,chirpy_api=debug,chirpy_core=debug")),
        )
        .init();

    let args = Args::parse();

    let config = ApiConfig {
        bind_addr: args.listen_addr(),
        pg_connection_url: args.database_url.clone(),
        ..ApiConfig::from_env()
    };

    info!(
        bind_addr = %config.bind_addr,
        platform = %config.platform,
        in_memory = args.in_memory,
        "starting chirpy_server"
    );

    let state = if args.in_memory {
        AppState::in_memory(config.clone())
    } else {
        info!(max_connections = args.max_connections, "configuring connection pool");
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&args.database_url)
            .await?;

        info!("running database migrations");
        chirpy_api::migrate(&pool).await?;

        AppState::postgres(config.clone(), pool)
    };

    let app = chirpy_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_overrides_host_and_port() {
        let args = Args::try_parse_from([
            "chirpy_server",
            "--bind-addr",
            "0.0.0.0:9000",
            "--port",
            "1",
        ])
        .expect("parse");
        assert_eq!(args.listen_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn host_and_port_form_the_address() {
        let args = Args::try_parse_from(["chirpy_server", "--host", "0.0.0.0", "--port", "9001"])
            .expect("parse");
        if args.bind_addr.is_none() {
            assert_eq!(args.listen_addr(), "0.0.0.0:9001");
        }
    }
}
