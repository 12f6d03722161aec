/// Annil Server - audio library server
use anyhow::Context;
use annil_server::{
    api::{self, account},
    config::ServerConfig,
    library,
    services::{PasswordHasher, SessionStore},
    state::AppState,
};
use annil_storage::{accounts, invites, Database};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "annil-server")]
#[command(about = "Annil audio library server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml)
    #[arg(short, long, global = true, env = "ANNIL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new account
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Grant admin rights
        #[arg(long)]
        admin: bool,
        /// Allow the account to create share links
        #[arg(long)]
        allow_share: bool,
    },
    /// List all accounts
    ListUsers,
    /// Create an invite code
    CreateInvite {
        /// Number of uses, or -1 for unlimited
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "annil_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser {
            username,
            password,
            admin,
            allow_share,
        } => add_user(&config, &username, &password, admin, allow_share).await?,
        Commands::ListUsers => list_users(&config).await?,
        Commands::CreateInvite { limit } => create_invite(&config, limit).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Annil Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let db = Arc::new(open_database(&config).await?);
    tracing::info!("Database connected");

    let library = library::build_library(&config.content).await?;
    tracing::info!(
        backends = library.len(),
        timeout_secs = config.content.backend_timeout_secs,
        "Content library initialized"
    );

    let app_state = AppState::new(db, Arc::new(library), &config);
    let sweeper =
        SessionStore::spawn_sweeper(&app_state.sessions, config.sessions.sweep_interval());

    let app = api::create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<Database> {
    Database::new(&config.storage.database_url)
        .await
        .with_context(|| format!("opening database {}", config.storage.database_url))
}

async fn add_user(
    config: &ServerConfig,
    username: &str,
    password: &str,
    admin: bool,
    allow_share: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        account::is_valid_username(username),
        "username must be 2-15 letters, digits or underscores"
    );
    anyhow::ensure!(
        password.len() >= account::MIN_PASSWORD_LEN,
        "password must be at least {} characters",
        account::MIN_PASSWORD_LEN
    );

    let db = open_database(config).await?;
    let hash = PasswordHasher::new(config.auth.bcrypt_cost).hash(password)?;

    accounts::create(db.pool(), username, &hash).await?;
    if admin {
        accounts::set_admin(db.pool(), username, true).await?;
    }
    if allow_share {
        accounts::set_allow_share(db.pool(), username, true).await?;
    }

    println!("Created user {username} (admin: {admin}, allow share: {allow_share})");
    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let db = open_database(config).await?;
    let users = accounts::list(db.pool()).await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - admin: {}, allow share: {}, registered {}",
            user.username,
            user.is_admin,
            user.allow_share,
            user.registered_at.to_rfc3339()
        );
    }

    Ok(())
}

async fn create_invite(config: &ServerConfig, limit: i64) -> anyhow::Result<()> {
    let db = open_database(config).await?;
    let invite = invites::create(db.pool(), limit).await?;

    println!("{}", invite.code);
    Ok(())
}
