//! Widget endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MessageResponse;
use crate::db::repos::Widget;
use crate::http::error::ApiError;
use crate::http::extractors::{present, ApiJson};
use crate::http::server::AppState;
use crate::models::price::parse_nullable_price;
use crate::models::validation::require_text;
use crate::models::{parse_paid, NewWidget, Price, ValidationError, WidgetChanges, WidgetId};

/// Create widget request
///
/// `paid` and `price` stay raw JSON so several input shapes can be coerced.
#[derive(Deserialize)]
pub struct CreateWidgetRequest {
    pub id_widget: Option<String>,
    pub name_widget: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub paid: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
}

impl CreateWidgetRequest {
    fn into_new_widget(self) -> Result<NewWidget, ValidationError> {
        let id = WidgetId::new(self.id_widget.as_deref().unwrap_or_default())?;
        let name = require_text("name_widget", self.name_widget.as_deref(), None)?;
        let paid = match self.paid {
            None => false,
            Some(value) => parse_paid(&value)?,
        };
        let price = match self.price {
            None => Some(Price::zero()),
            Some(value) => parse_nullable_price(&value)?,
        };

        Ok(NewWidget {
            id,
            name,
            paid,
            price,
        })
    }
}

/// Partial widget update; only keys present in the body are applied
#[derive(Deserialize)]
pub struct UpdateWidgetRequest {
    #[serde(default, deserialize_with = "present")]
    pub name_widget: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub paid: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
}

impl UpdateWidgetRequest {
    fn into_changes(self) -> Result<WidgetChanges, ValidationError> {
        let name = self
            .name_widget
            .map(|value| require_text("name_widget", value.as_str(), None))
            .transpose()?;
        let paid = self
            .paid
            .map(|value| match value {
                Value::Null => Ok(None),
                other => parse_paid(&other).map(Some),
            })
            .transpose()?;
        let price = self
            .price
            .map(|value| parse_nullable_price(&value))
            .transpose()?;

        Ok(WidgetChanges { name, paid, price })
    }
}

/// Widget response
#[derive(Debug, Serialize)]
pub struct WidgetResponse {
    pub id_widget: String,
    pub name_widget: String,
    pub paid: Option<bool>,
    pub price: Option<Decimal>,
}

impl From<Widget> for WidgetResponse {
    fn from(w: Widget) -> Self {
        Self {
            id_widget: w.id_widget,
            name_widget: w.name_widget,
            paid: w.paid,
            price: w.price,
        }
    }
}

/// Body of a successful create
#[derive(Serialize)]
pub struct WidgetCreatedResponse {
    pub message: &'static str,
    pub id_widget: String,
}

/// GET /widgets - list all widgets
async fn list_widgets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WidgetResponse>>, ApiError> {
    let widgets = state.store.list_widgets().await?;
    if widgets.is_empty() {
        return Err(ApiError::not_found("Widgets not found."));
    }

    Ok(Json(widgets.into_iter().map(WidgetResponse::from).collect()))
}

/// POST /widgets - create a widget
async fn create_widget(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateWidgetRequest>,
) -> Result<(StatusCode, Json<WidgetCreatedResponse>), ApiError> {
    let new_widget = req.into_new_widget()?;
    let widget = state.store.create_widget(new_widget).await?;
    tracing::info!(id_widget = %widget.id_widget, "widget created");

    Ok((
        StatusCode::CREATED,
        Json(WidgetCreatedResponse {
            message: "The widget was created successfully.",
            id_widget: widget.id_widget,
        }),
    ))
}

/// PATCH /widgets/{id_widget} - update supplied fields
///
/// A missing widget is reported before the body is looked at. An empty
/// patch returns the row as it is.
async fn update_widget(
    State(state): State<Arc<AppState>>,
    Path(id_widget): Path<String>,
    body: Result<ApiJson<UpdateWidgetRequest>, ApiError>,
) -> Result<Json<WidgetResponse>, ApiError> {
    let current = state.store.get_widget(&id_widget).await?;

    let ApiJson(req) = body?;
    let changes = req.into_changes()?;
    if changes.is_empty() {
        return Ok(Json(WidgetResponse::from(current)));
    }

    let widget = state.store.update_widget(&id_widget, changes).await?;
    tracing::info!(id_widget = %widget.id_widget, "widget updated");

    Ok(Json(WidgetResponse::from(widget)))
}

/// DELETE /widgets/{id_widget} - delete a widget without installations
async fn delete_widget(
    State(state): State<Arc<AppState>>,
    Path(id_widget): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_widget(&id_widget).await?;
    tracing::info!(id_widget = %id_widget, "widget deleted");

    Ok(Json(MessageResponse::new("The widget was successfully deleted")))
}

/// Widget routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/widgets", get(list_widgets).post(create_widget))
        .route("/widgets/{id_widget}", patch(update_widget).delete(delete_widget))
}
