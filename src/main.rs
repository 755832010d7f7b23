use clap::Parser;
use sqlx::migrate::Migrator;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_core::cli::{Cli, Commands, DbCommands, WalletCommands};
use wallet_core::{cli, config, create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env()?;
    let cli_args = Cli::parse();

    match cli_args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Wallet(WalletCommands::Create { balance }) => {
            cli::handle_wallet_create(&config, balance.as_deref()).await
        }
        Commands::Config => cli::handle_config_validate(&config),
    }
}

async fn serve(config: &config::Config) -> anyhow::Result<()> {
    // Database pool
    let pool = db::create_pool(config).await?;

    // Run migrations
    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("Database migrations completed");

    // Build router with state
    let app_state = AppState { db: pool };
    let app = create_app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
