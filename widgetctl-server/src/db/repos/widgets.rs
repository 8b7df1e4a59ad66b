//! Widget repository
//!
//! Handles widget CRUD with proper patterns:
//! - create: plain INSERT, unique violation becomes a conflict
//! - update: single UPDATE with per-column CASE, so absent fields stay put
//! - delete: foreign key keeps widgets with installations alive

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use super::{violation, StoreError, Violation};
use crate::models::{NewWidget, WidgetChanges};

/// Widget record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Widget {
    pub id_widget: String,
    pub name_widget: String,
    pub paid: Option<bool>,
    pub price: Option<Decimal>,
}

impl From<NewWidget> for Widget {
    fn from(w: NewWidget) -> Self {
        Self {
            id_widget: w.id.into_string(),
            name_widget: w.name,
            paid: Some(w.paid),
            price: w.price.map(|p| p.as_decimal()),
        }
    }
}

impl Widget {
    /// Apply a partial update in place.
    pub fn apply(&mut self, changes: WidgetChanges) {
        if let Some(name) = changes.name {
            self.name_widget = name;
        }
        if let Some(paid) = changes.paid {
            self.paid = paid;
        }
        if let Some(price) = changes.price {
            self.price = price.map(|p| p.as_decimal());
        }
    }
}

/// Widget repository
pub struct WidgetRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> WidgetRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every widget ordered by id.
    pub async fn list(&self) -> Result<Vec<Widget>, StoreError> {
        let widgets = sqlx::query_as::<_, Widget>(
            r#"
            SELECT id_widget, name_widget, paid, price
            FROM widgets
            ORDER BY id_widget
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(widgets)
    }

    /// Fetch one widget by id.
    pub async fn get(&self, id: &str) -> Result<Widget, StoreError> {
        sqlx::query_as::<_, Widget>(
            r#"
            SELECT id_widget, name_widget, paid, price
            FROM widgets
            WHERE id_widget = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            resource: "widget",
            id: id.to_owned(),
        })
    }

    /// Insert a widget.
    ///
    /// Concurrent duplicates are resolved by the primary key: the loser
    /// gets `StoreError::Conflict`.
    pub async fn create(&self, widget: NewWidget) -> Result<Widget, StoreError> {
        let id = widget.id.as_str().to_owned();
        let result = sqlx::query_as::<_, Widget>(
            r#"
            INSERT INTO widgets (id_widget, name_widget, paid, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id_widget, name_widget, paid, price
            "#,
        )
        .bind(widget.id.as_str())
        .bind(&widget.name)
        .bind(widget.paid)
        .bind(widget.price.map(|p| p.as_decimal()))
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(widget) => Ok(widget),
            Err(e) if violation(&e) == Some(Violation::Unique) => Err(StoreError::Conflict(
                format!("a widget with id '{}' already exists", id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a partial update and return the full row.
    pub async fn update(&self, id: &str, changes: WidgetChanges) -> Result<Widget, StoreError> {
        let WidgetChanges { name, paid, price } = changes;

        sqlx::query_as::<_, Widget>(
            r#"
            UPDATE widgets SET
                name_widget = CASE WHEN $2 THEN $3 ELSE name_widget END,
                paid = CASE WHEN $4 THEN $5 ELSE paid END,
                price = CASE WHEN $6 THEN $7 ELSE price END
            WHERE id_widget = $1
            RETURNING id_widget, name_widget, paid, price
            "#,
        )
        .bind(id)
        .bind(name.is_some())
        .bind(name)
        .bind(paid.is_some())
        .bind(paid.flatten())
        .bind(price.is_some())
        .bind(price.flatten().map(|p| p.as_decimal()))
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            resource: "widget",
            id: id.to_owned(),
        })
    }

    /// Delete a widget that has no installations.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM widgets WHERE id_widget = $1")
            .bind(id)
            .execute(self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(StoreError::NotFound {
                resource: "widget",
                id: id.to_owned(),
            }),
            Ok(_) => Ok(()),
            Err(e) if violation(&e) == Some(Violation::ForeignKey) => Err(StoreError::Conflict(
                format!("widget '{}' still has installations", id),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
