use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use duit_api::auth::{generate_token, Claims};
use duit_api::config::AppConfig;
use duit_api::state::AppState;
use duit_api::{database, routes};

#[derive(Parser)]
#[command(name = "duit-api", version, about = "Backend API for the duit personal finance tracker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (the default).
    Serve {
        /// Override the configured listen port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Mint a signed bearer token for a user. Operational aid for poking the
    /// API from the command line; the identity row must already exist.
    Token {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value_t = 24)]
        expires_hours: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Token {
            user_id,
            email,
            expires_hours,
        } => {
            let claims = Claims::new(user_id, email, expires_hours);
            let token = generate_token(&claims, &config.jwt_secret)?;
            println!("{token}");
        }
        Command::Serve { port } => serve(config, port).await?,
    }

    Ok(())
}

async fn serve(config: AppConfig, port_override: Option<u16>) -> anyhow::Result<()> {
    let pool = database::connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    database::MIGRATOR
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let service_pool = match &config.service_database_url {
        Some(url) => Some(
            database::connect(url)
                .await
                .context("failed to connect with the service credential")?,
        ),
        None => {
            tracing::warn!(
                "SERVICE_DATABASE_URL is not set; admin endpoints will report a configuration error"
            );
            None
        }
    };

    let port = port_override.unwrap_or(config.port);
    let state = AppState::new(&config, pool, service_pool);

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("duit-api listening on http://{bind_addr}");

    axum::serve(listener, routes::app(state)).await?;
    Ok(())
}
