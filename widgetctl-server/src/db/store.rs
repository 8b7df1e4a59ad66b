//! Store abstraction used by the HTTP handlers
//!
//! Handlers receive an `Arc<dyn Store>` through the router state. The
//! Postgres implementation backs production; the in-memory one backs tests
//! and local experiments.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::repos::{
    Installation, InstallationRepo, InstallationView, StoreError, Widget, WidgetRepo,
};
use crate::models::{InstallationKey, NewInstallation, NewWidget, WidgetChanges};

/// Read/write access to widgets and installations.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip proving the backing store answers.
    async fn ping(&self) -> Result<(), StoreError>;

    /// One widget; `NotFound` when absent.
    async fn get_widget(&self, id: &str) -> Result<Widget, StoreError>;

    /// Every widget, ordered by id.
    async fn list_widgets(&self) -> Result<Vec<Widget>, StoreError>;

    /// Insert a widget; `Conflict` when the id is taken.
    async fn create_widget(&self, widget: NewWidget) -> Result<Widget, StoreError>;

    /// Patch a widget; `NotFound` when absent.
    async fn update_widget(&self, id: &str, changes: WidgetChanges) -> Result<Widget, StoreError>;

    /// Delete a widget; `NotFound` when absent, `Conflict` while installed.
    async fn delete_widget(&self, id: &str) -> Result<(), StoreError>;

    /// Installations of a widget joined with widget fields.
    async fn installations_by_widget(
        &self,
        id_widget: &str,
    ) -> Result<Vec<InstallationView>, StoreError>;

    /// Installations on a client domain joined with widget fields.
    async fn installations_by_client_domain(
        &self,
        client_domain: &str,
    ) -> Result<Vec<InstallationView>, StoreError>;

    /// Insert an installation; `NotFound` for an unknown widget, `Conflict`
    /// for a duplicate key.
    async fn create_installation(
        &self,
        installation: NewInstallation,
    ) -> Result<Installation, StoreError>;

    /// Add `days` to the expiry date and return the new date.
    async fn extend_installation(
        &self,
        key: &InstallationKey,
        days: i32,
    ) -> Result<NaiveDate, StoreError>;

    /// Delete an installation; `NotFound` when absent.
    async fn delete_installation(&self, key: &InstallationKey) -> Result<(), StoreError>;

    /// Distinct client domains, sorted.
    async fn client_domains(&self) -> Result<Vec<String>, StoreError>;
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_widget(&self, id: &str) -> Result<Widget, StoreError> {
        WidgetRepo::new(&self.pool).get(id).await
    }

    async fn list_widgets(&self) -> Result<Vec<Widget>, StoreError> {
        WidgetRepo::new(&self.pool).list().await
    }

    async fn create_widget(&self, widget: NewWidget) -> Result<Widget, StoreError> {
        WidgetRepo::new(&self.pool).create(widget).await
    }

    async fn update_widget(&self, id: &str, changes: WidgetChanges) -> Result<Widget, StoreError> {
        WidgetRepo::new(&self.pool).update(id, changes).await
    }

    async fn delete_widget(&self, id: &str) -> Result<(), StoreError> {
        WidgetRepo::new(&self.pool).delete(id).await
    }

    async fn installations_by_widget(
        &self,
        id_widget: &str,
    ) -> Result<Vec<InstallationView>, StoreError> {
        InstallationRepo::new(&self.pool).list_by_widget(id_widget).await
    }

    async fn installations_by_client_domain(
        &self,
        client_domain: &str,
    ) -> Result<Vec<InstallationView>, StoreError> {
        InstallationRepo::new(&self.pool)
            .list_by_client_domain(client_domain)
            .await
    }

    async fn create_installation(
        &self,
        installation: NewInstallation,
    ) -> Result<Installation, StoreError> {
        InstallationRepo::new(&self.pool).create(installation).await
    }

    async fn extend_installation(
        &self,
        key: &InstallationKey,
        days: i32,
    ) -> Result<NaiveDate, StoreError> {
        InstallationRepo::new(&self.pool).extend(key, days).await
    }

    async fn delete_installation(&self, key: &InstallationKey) -> Result<(), StoreError> {
        InstallationRepo::new(&self.pool).delete(key).await
    }

    async fn client_domains(&self) -> Result<Vec<String>, StoreError> {
        InstallationRepo::new(&self.pool).client_domains().await
    }
}
