//! widgetctl-server: HTTP API for widgets and their installations
//!
//! Widgets are licensable components; installations record a widget
//! deployed on a client domain with its trial flag, status and expiry date.
//! Handlers validate input, call a [`db::Store`] and render JSON.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DatabaseSettings};
pub use db::{MemoryStore, PgStore, Store, StoreError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
