//! HTTP server command for the widgetctl API
//!
//! Runs the widget/installation API against Postgres.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser};

use widgetctl_server::db::{create_pool_with_options, ensure_schema, DEFAULT_MAX_CONNECTIONS};
use widgetctl_server::http::{run_server, ServerConfig};
use widgetctl_server::{DatabaseSettings, PgStore};

/// Database connection flags shared by every command that touches Postgres
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Full database URL (overrides the individual DB_* parts)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database host, optionally with :port
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Maximum pooled connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    fn settings(&self, secret_key: Option<String>) -> DatabaseSettings {
        DatabaseSettings {
            database_url: self.database_url.clone(),
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            host: self.db_host.clone(),
            name: self.db_name.clone(),
            secret_key,
        }
    }

    async fn connect(&self, settings: &DatabaseSettings) -> Result<PgStore> {
        let url = settings.url().context("Database is not configured")?;
        let pool = create_pool_with_options(&url, self.max_connections)
            .await
            .context("Failed to create database pool")?;
        Ok(PgStore::new(pool))
    }
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "WIDGETCTL_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Create missing tables before serving
    #[arg(long)]
    pub init_schema: bool,

    /// Application secret key
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Arguments for the init-schema command
#[derive(Parser, Debug)]
pub struct InitSchemaArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let settings = args.db.settings(args.secret_key.clone());
    settings
        .secret_key()
        .context("SECRET_KEY not set. Set via --secret-key, SECRET_KEY env, or .env")?;
    tracing::debug!(?settings, "configuration loaded");

    tracing::info!("Starting widgetctl server on {}", args.bind);
    let store = args.db.connect(&settings).await?;

    if args.init_schema {
        ensure_schema(store.pool())
            .await
            .context("Failed to create schema")?;
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        request_timeout: Duration::from_secs(args.timeout),
    };

    // Run server (blocks until shutdown)
    run_server(Arc::new(store), config)
        .await
        .context("Server error")?;

    Ok(())
}

/// Create missing tables and exit
pub async fn run_init_schema(args: InitSchemaArgs) -> Result<()> {
    let settings = args.db.settings(None);
    let store = args.db.connect(&settings).await?;
    ensure_schema(store.pool())
        .await
        .context("Failed to create schema")?;
    println!("Schema ready");
    Ok(())
}
