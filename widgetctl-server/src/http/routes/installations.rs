//! Installation endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::db::repos::InstallationView;
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{
    extend_days, parse_date, InstallationKey, NewInstallation, ValidationError,
};

/// Body naming one installation
#[derive(Deserialize)]
pub struct InstallationKeyRequest {
    pub client_domain: Option<String>,
    pub id_widget: Option<String>,
}

impl InstallationKeyRequest {
    fn key(&self) -> Result<InstallationKey, ValidationError> {
        InstallationKey::from_parts(self.client_domain.as_deref(), self.id_widget.as_deref())
    }
}

/// Extend expiry request
#[derive(Deserialize)]
pub struct ExtendRequest {
    #[serde(flatten)]
    pub key: InstallationKeyRequest,
    pub days: Option<i64>,
}

/// Create installation request
#[derive(Deserialize)]
pub struct CreateInstallationRequest {
    #[serde(flatten)]
    pub key: InstallationKeyRequest,
    pub date_install: Option<String>,
    pub date_expire: Option<String>,
    pub trial: Option<bool>,
    pub status: Option<i16>,
}

impl CreateInstallationRequest {
    fn into_new_installation(self) -> Result<NewInstallation, ValidationError> {
        let key = self.key.key()?;
        let date_install = parse_date(
            "date_install",
            self.date_install
                .as_deref()
                .ok_or(ValidationError::Empty { field: "date_install" })?,
        )?;
        let date_expire = parse_date(
            "date_expire",
            self.date_expire
                .as_deref()
                .ok_or(ValidationError::Empty { field: "date_expire" })?,
        )?;
        let status = self.status.ok_or(ValidationError::Empty { field: "status" })?;

        NewInstallation {
            key,
            date_install,
            date_expire,
            trial: self.trial,
            status,
        }
        .validate()
    }
}

/// Installation joined with its widget
#[derive(Debug, Serialize)]
pub struct InstallationResponse {
    pub client_domain: String,
    pub widget_name: String,
    pub paid: Option<bool>,
    pub date_install: String,
    pub date_expire: String,
    pub trial: Option<bool>,
    pub status: i16,
}

impl From<InstallationView> for InstallationResponse {
    fn from(i: InstallationView) -> Self {
        Self {
            client_domain: i.client_domain,
            widget_name: i.widget_name,
            paid: i.paid,
            date_install: i.date_install.to_string(),
            date_expire: i.date_expire.to_string(),
            trial: i.trial,
            status: i.status,
        }
    }
}

/// Body of a successful create
#[derive(Serialize)]
pub struct InstallationCreatedResponse {
    pub message: &'static str,
    pub client_domain: String,
    pub id_widget: String,
}

/// Body of a successful extension
#[derive(Serialize)]
pub struct ExtendResponse {
    pub message: String,
    pub new_expiration_date: String,
}

fn render(views: Vec<InstallationView>) -> Json<Vec<InstallationResponse>> {
    Json(views.into_iter().map(InstallationResponse::from).collect())
}

/// GET /installations/widget/{id_widget}
async fn list_by_widget(
    State(state): State<Arc<AppState>>,
    Path(id_widget): Path<String>,
) -> Result<Json<Vec<InstallationResponse>>, ApiError> {
    let views = state.store.installations_by_widget(&id_widget).await?;
    if views.is_empty() {
        return Err(ApiError::not_found("No installations found for this widget."));
    }
    Ok(render(views))
}

/// GET /installations/client_domain/{*client_domain}
///
/// The wildcard keeps slashes, so `a.com/shop` is looked up verbatim.
async fn list_by_client_domain(
    State(state): State<Arc<AppState>>,
    Path(client_domain): Path<String>,
) -> Result<Json<Vec<InstallationResponse>>, ApiError> {
    let views = state
        .store
        .installations_by_client_domain(&client_domain)
        .await?;
    if views.is_empty() {
        return Err(ApiError::not_found("No installations found for this client."));
    }
    Ok(render(views))
}

/// POST /installations - create an installation for an existing widget
async fn create_installation(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateInstallationRequest>,
) -> Result<(StatusCode, Json<InstallationCreatedResponse>), ApiError> {
    let new_installation = req.into_new_installation()?;
    let created = state.store.create_installation(new_installation).await?;
    tracing::info!(
        client_domain = %created.client_domain,
        id_widget = %created.id_widget,
        "installation created"
    );

    Ok((
        StatusCode::CREATED,
        Json(InstallationCreatedResponse {
            message: "The installation was created successfully.",
            client_domain: created.client_domain,
            id_widget: created.id_widget,
        }),
    ))
}

/// PATCH /installations/extend - push the expiry date
async fn extend_installation(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ExtendRequest>,
) -> Result<Json<ExtendResponse>, ApiError> {
    let key = req.key.key()?;
    let days = extend_days(req.days)?;

    let new_date = state.store.extend_installation(&key, days).await?;
    tracing::info!(
        client_domain = %key.client_domain.as_str(),
        id_widget = %key.id_widget.as_str(),
        days,
        %new_date,
        "installation extended"
    );

    Ok(Json(ExtendResponse {
        message: format!("The end date has been extended by {} day(s)", days),
        new_expiration_date: new_date.to_string(),
    }))
}

/// DELETE /installations - delete one installation
async fn delete_installation(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<InstallationKeyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = req.key()?;
    state.store.delete_installation(&key).await?;
    tracing::info!(
        client_domain = %key.client_domain.as_str(),
        id_widget = %key.id_widget.as_str(),
        "installation deleted"
    );

    Ok(Json(MessageResponse::new("Installation deleted successfully")))
}

/// Installation routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/installations",
            post(create_installation).delete(delete_installation),
        )
        .route("/installations/extend", patch(extend_installation))
        .route("/installations/widget/{id_widget}", get(list_by_widget))
        .route(
            "/installations/client_domain/{*client_domain}",
            get(list_by_client_domain),
        )
}
