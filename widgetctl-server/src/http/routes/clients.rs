//! Client domain endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// One distinct client domain
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ClientDomainResponse {
    pub client_domain: String,
}

/// GET /clients_domains - distinct client domains across installations
async fn list_client_domains(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ClientDomainResponse>>, ApiError> {
    let domains = state.store.client_domains().await?;
    if domains.is_empty() {
        return Err(ApiError::not_found("No clients domains found."));
    }

    Ok(Json(
        domains
            .into_iter()
            .map(|client_domain| ClientDomainResponse { client_domain })
            .collect(),
    ))
}

/// Client domain routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/clients_domains", get(list_client_domains))
}
