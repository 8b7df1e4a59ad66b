//! In-memory implementation of Store for testing and development
//!
//! Mirrors the Postgres constraints: primary keys, the installation to
//! widget foreign key (RESTRICT on delete) and date range checks.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;

use super::repos::{Installation, InstallationView, StoreError, Widget};
use super::store::Store;
use crate::models::{add_days, InstallationKey, NewInstallation, NewWidget, WidgetChanges};

/// In-memory data store
#[derive(Debug, Default)]
struct MemoryState {
    /// Widgets keyed by id
    widgets: BTreeMap<String, Widget>,
    /// Installations keyed by (client_domain, id_widget)
    installations: BTreeMap<(String, String), Installation>,
}

impl MemoryState {
    fn view(&self, installation: &Installation) -> Option<InstallationView> {
        let widget = self.widgets.get(&installation.id_widget)?;
        Some(InstallationView {
            client_domain: installation.client_domain.clone(),
            widget_name: widget.name_widget.clone(),
            paid: widget.paid,
            date_install: installation.date_install,
            date_expire: installation.date_expire,
            trial: installation.trial,
            status: installation.status,
        })
    }
}

/// Store backed by ordered maps behind a tokio RwLock
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn map_key(key: &InstallationKey) -> (String, String) {
    (
        key.client_domain.as_str().to_owned(),
        key.id_widget.as_str().to_owned(),
    )
}

fn installation_not_found(key: &InstallationKey) -> StoreError {
    StoreError::NotFound {
        resource: "installation",
        id: format!("{}/{}", key.client_domain.as_str(), key.id_widget.as_str()),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_widget(&self, id: &str) -> Result<Widget, StoreError> {
        let state = self.state.read().await;
        state
            .widgets
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                resource: "widget",
                id: id.to_owned(),
            })
    }

    async fn list_widgets(&self) -> Result<Vec<Widget>, StoreError> {
        let state = self.state.read().await;
        Ok(state.widgets.values().cloned().collect())
    }

    async fn create_widget(&self, widget: NewWidget) -> Result<Widget, StoreError> {
        let mut state = self.state.write().await;
        if state.widgets.contains_key(widget.id.as_str()) {
            return Err(StoreError::Conflict(format!(
                "a widget with id '{}' already exists",
                widget.id.as_str()
            )));
        }

        let record = Widget::from(widget);
        state
            .widgets
            .insert(record.id_widget.clone(), record.clone());
        debug!(id_widget = %record.id_widget, "memory store: widget inserted");
        Ok(record)
    }

    async fn update_widget(&self, id: &str, changes: WidgetChanges) -> Result<Widget, StoreError> {
        let mut state = self.state.write().await;
        let widget = state.widgets.get_mut(id).ok_or_else(|| StoreError::NotFound {
            resource: "widget",
            id: id.to_owned(),
        })?;

        widget.apply(changes);
        Ok(widget.clone())
    }

    async fn delete_widget(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.widgets.contains_key(id) {
            return Err(StoreError::NotFound {
                resource: "widget",
                id: id.to_owned(),
            });
        }
        if state.installations.values().any(|i| i.id_widget == id) {
            return Err(StoreError::Conflict(format!(
                "widget '{}' still has installations",
                id
            )));
        }

        state.widgets.remove(id);
        Ok(())
    }

    async fn installations_by_widget(
        &self,
        id_widget: &str,
    ) -> Result<Vec<InstallationView>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .installations
            .values()
            .filter(|i| i.id_widget == id_widget)
            .filter_map(|i| state.view(i))
            .collect())
    }

    async fn installations_by_client_domain(
        &self,
        client_domain: &str,
    ) -> Result<Vec<InstallationView>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .installations
            .values()
            .filter(|i| i.client_domain == client_domain)
            .filter_map(|i| state.view(i))
            .collect())
    }

    async fn create_installation(
        &self,
        installation: NewInstallation,
    ) -> Result<Installation, StoreError> {
        let mut state = self.state.write().await;
        let key = map_key(&installation.key);

        if !state.widgets.contains_key(&key.1) {
            return Err(StoreError::NotFound {
                resource: "widget",
                id: key.1,
            });
        }
        if state.installations.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "widget '{}' is already installed on '{}'",
                key.1, key.0
            )));
        }

        let record = Installation::from(installation);
        state.installations.insert(key, record.clone());
        Ok(record)
    }

    async fn extend_installation(
        &self,
        key: &InstallationKey,
        days: i32,
    ) -> Result<NaiveDate, StoreError> {
        let mut state = self.state.write().await;
        let installation = state
            .installations
            .get_mut(&map_key(key))
            .ok_or_else(|| installation_not_found(key))?;

        let new_date = add_days(installation.date_expire, days).ok_or_else(|| {
            StoreError::InvalidValue(format!("extending by {} days overflows the date", days))
        })?;
        installation.date_expire = new_date;
        Ok(new_date)
    }

    async fn delete_installation(&self, key: &InstallationKey) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .installations
            .remove(&map_key(key))
            .map(|_| ())
            .ok_or_else(|| installation_not_found(key))
    }

    async fn client_domains(&self) -> Result<Vec<String>, StoreError> {
        let state = self.state.read().await;
        let mut domains: Vec<String> = state
            .installations
            .keys()
            .map(|(domain, _)| domain.clone())
            .collect();
        domains.dedup();
        Ok(domains)
    }
}
