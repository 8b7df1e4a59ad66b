//! Database connection settings
//!
//! The binary fills these from flags or the environment:
//! - `DATABASE_URL`: full connection string, wins over the parts below
//! - `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_NAME`: assembled into a URL
//! - `SECRET_KEY`: application secret, required at startup

use std::fmt;

/// Configuration error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
}

/// Everything needed to reach the database and start the server.
#[derive(Clone, Default)]
pub struct DatabaseSettings {
    pub database_url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub name: Option<String>,
    pub secret_key: Option<String>,
}

impl DatabaseSettings {
    /// Connection URL, either given directly or assembled from parts.
    ///
    /// User and password are percent-encoded. The password may be absent
    /// (trust or peer authentication).
    ///
    /// # Example
    /// ```
    /// use widgetctl_server::config::DatabaseSettings;
    ///
    /// let settings = DatabaseSettings {
    ///     user: Some("app".into()),
    ///     password: Some("p@ss".into()),
    ///     host: Some("db:5432".into()),
    ///     name: Some("widgets".into()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(settings.url().unwrap(), "postgres://app:p%40ss@db:5432/widgets");
    /// ```
    pub fn url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }

        let user = self.user.as_deref().ok_or(ConfigError::Missing("DB_USER"))?;
        let host = self.host.as_deref().ok_or(ConfigError::Missing("DB_HOST"))?;
        let name = self.name.as_deref().ok_or(ConfigError::Missing("DB_NAME"))?;

        let credentials = match self.password.as_deref() {
            Some(password) => format!(
                "{}:{}",
                urlencoding::encode(user),
                urlencoding::encode(password)
            ),
            None => urlencoding::encode(user).into_owned(),
        };

        Ok(format!("postgres://{}@{}/{}", credentials, host, name))
    }

    /// The application secret; startup refuses to continue without it.
    pub fn secret_key(&self) -> Result<&str, ConfigError> {
        self.secret_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("SECRET_KEY"))
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("DatabaseSettings")
            .field("database_url", &redact(&self.database_url))
            .field("user", &self.user)
            .field("password", &redact(&self.password))
            .field("host", &self.host)
            .field("name", &self.name)
            .field("secret_key", &redact(&self.secret_key))
            .finish()
    }
}
