//! Installation repository
//!
//! Listing joins the owning widget in the same query; an installation whose
//! widget row is gone simply drops out of the inner join.

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use super::{violation, StoreError, Violation};
use crate::models::{latest_date, InstallationKey, NewInstallation};

/// Installation record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Installation {
    pub client_domain: String,
    pub id_widget: String,
    pub date_install: NaiveDate,
    pub date_expire: NaiveDate,
    pub trial: Option<bool>,
    pub status: i16,
}

impl From<NewInstallation> for Installation {
    fn from(i: NewInstallation) -> Self {
        Self {
            client_domain: i.key.client_domain.as_str().to_owned(),
            id_widget: i.key.id_widget.into_string(),
            date_install: i.date_install,
            date_expire: i.date_expire,
            trial: i.trial,
            status: i.status,
        }
    }
}

/// Installation joined with its widget for list display
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct InstallationView {
    pub client_domain: String,
    pub widget_name: String,
    pub paid: Option<bool>,
    pub date_install: NaiveDate,
    pub date_expire: NaiveDate,
    pub trial: Option<bool>,
    pub status: i16,
}

/// Installation repository
pub struct InstallationRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> InstallationRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Installations of one widget, ordered by client domain.
    pub async fn list_by_widget(&self, id_widget: &str) -> Result<Vec<InstallationView>, StoreError> {
        let rows = sqlx::query_as::<_, InstallationView>(
            r#"
            SELECT
                i.client_domain,
                w.name_widget AS widget_name,
                w.paid,
                i.date_install,
                i.date_expire,
                i.trial,
                i.status
            FROM installations i
            JOIN widgets w ON w.id_widget = i.id_widget
            WHERE i.id_widget = $1
            ORDER BY i.client_domain
            "#,
        )
        .bind(id_widget)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Installations on one client domain, ordered by widget id.
    pub async fn list_by_client_domain(
        &self,
        client_domain: &str,
    ) -> Result<Vec<InstallationView>, StoreError> {
        let rows = sqlx::query_as::<_, InstallationView>(
            r#"
            SELECT
                i.client_domain,
                w.name_widget AS widget_name,
                w.paid,
                i.date_install,
                i.date_expire,
                i.trial,
                i.status
            FROM installations i
            JOIN widgets w ON w.id_widget = i.id_widget
            WHERE i.client_domain = $1
            ORDER BY i.id_widget
            "#,
        )
        .bind(client_domain)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert an installation for an existing widget.
    pub async fn create(&self, installation: NewInstallation) -> Result<Installation, StoreError> {
        let key = installation.key.clone();
        let result = sqlx::query_as::<_, Installation>(
            r#"
            INSERT INTO installations
                (client_domain, id_widget, date_install, date_expire, trial, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING client_domain, id_widget, date_install, date_expire, trial, status
            "#,
        )
        .bind(installation.key.client_domain.as_str())
        .bind(installation.key.id_widget.as_str())
        .bind(installation.date_install)
        .bind(installation.date_expire)
        .bind(installation.trial)
        .bind(installation.status)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(e) => match violation(&e) {
                Some(Violation::Unique) => Err(StoreError::Conflict(format!(
                    "widget '{}' is already installed on '{}'",
                    key.id_widget.as_str(),
                    key.client_domain.as_str()
                ))),
                Some(Violation::ForeignKey) => Err(StoreError::NotFound {
                    resource: "widget",
                    id: key.id_widget.into_string(),
                }),
                Some(Violation::Check) => Err(StoreError::InvalidValue(
                    "date_expire is later than the supported range".into(),
                )),
                _ => Err(e.into()),
            },
        }
    }

    /// Push the expiry date by `days` and return the new date.
    ///
    /// Done in one UPDATE so concurrent extensions add up. Results past
    /// [`latest_date`] are filtered out by the statement itself, so nothing
    /// out of range is ever committed.
    pub async fn extend(&self, key: &InstallationKey, days: i32) -> Result<NaiveDate, StoreError> {
        let result = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            UPDATE installations
            SET date_expire = date_expire + $3
            WHERE client_domain = $1 AND id_widget = $2
              AND date_expire + $3 <= $4
            RETURNING date_expire
            "#,
        )
        .bind(key.client_domain.as_str())
        .bind(key.id_widget.as_str())
        .bind(days)
        .bind(latest_date())
        .fetch_optional(self.pool)
        .await;

        match result {
            Ok(Some(date)) => Ok(date),
            Ok(None) => {
                if self.exists(key).await? {
                    Err(overflow(days))
                } else {
                    Err(not_found(key))
                }
            }
            Err(e) if violation(&e) == Some(Violation::DateOverflow) => Err(overflow(days)),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &InstallationKey) -> Result<bool, StoreError> {
        let found = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM installations
                WHERE client_domain = $1 AND id_widget = $2
            )
            "#,
        )
        .bind(key.client_domain.as_str())
        .bind(key.id_widget.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(found)
    }

    /// Delete one installation.
    pub async fn delete(&self, key: &InstallationKey) -> Result<(), StoreError> {
        let done = sqlx::query(
            r#"
            DELETE FROM installations
            WHERE client_domain = $1 AND id_widget = $2
            "#,
        )
        .bind(key.client_domain.as_str())
        .bind(key.id_widget.as_str())
        .execute(self.pool)
        .await?;

        if done.rows_affected() == 0 {
            return Err(not_found(key));
        }
        Ok(())
    }

    /// Distinct client domains across all installations.
    pub async fn client_domains(&self) -> Result<Vec<String>, StoreError> {
        let domains = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT client_domain FROM installations ORDER BY client_domain",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(domains)
    }
}

fn overflow(days: i32) -> StoreError {
    StoreError::InvalidValue(format!("extending by {} days overflows the date", days))
}

fn not_found(key: &InstallationKey) -> StoreError {
    StoreError::NotFound {
        resource: "installation",
        id: format!("{}/{}", key.client_domain.as_str(), key.id_widget.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;
    use crate::db::repos::WidgetRepo;
    use crate::db::schema::ensure_schema;
    use crate::models::{NewWidget, WidgetId};

    async fn seeded(domain: &str, widget: &str) -> (PgPool, InstallationKey) {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        ensure_schema(&pool).await.expect("schema bootstrap failed");

        let key = InstallationKey::from_parts(Some(domain), Some(widget)).unwrap();
        let _ = InstallationRepo::new(&pool).delete(&key).await;
        let _ = WidgetRepo::new(&pool).delete(widget).await;

        WidgetRepo::new(&pool)
            .create(NewWidget {
                id: WidgetId::new(widget).unwrap(),
                name: "Seeded".into(),
                paid: false,
                price: None,
            })
            .await
            .expect("widget insert");

        InstallationRepo::new(&pool)
            .create(NewInstallation {
                key: key.clone(),
                date_install: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                date_expire: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                trial: Some(true),
                status: 1,
            })
            .await
            .expect("installation insert");

        (pool, key)
    }

    async fn cleanup(pool: &PgPool, key: &InstallationKey) {
        let _ = InstallationRepo::new(pool).delete(key).await;
        let _ = WidgetRepo::new(pool).delete(key.id_widget.as_str()).await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn extend_adds_days_exactly() {
        let (pool, key) = seeded("repo-extend.example", "repo-extend").await;
        let repo = InstallationRepo::new(&pool);

        let same = repo.extend(&key, 0).await.expect("extend 0");
        assert_eq!(same, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        let later = repo.extend(&key, 10).await.expect("extend 10");
        assert_eq!(later, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());

        cleanup(&pool, &key).await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn extend_past_latest_date_changes_nothing() {
        let (pool, key) = seeded("repo-overflow.example", "repo-overflow").await;
        let repo = InstallationRepo::new(&pool);

        let err = repo.extend(&key, 100_000_000).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue(_)));

        let rows = repo.list_by_widget("repo-overflow").await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date_expire, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        let room = (latest_date() - rows[0].date_expire).num_days() as i32;
        assert_eq!(repo.extend(&key, room).await.expect("extend to edge"), latest_date());

        cleanup(&pool, &key).await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn extend_missing_is_not_found() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        ensure_schema(&pool).await.expect("schema bootstrap failed");

        let key = InstallationKey::from_parts(Some("nowhere.example"), Some("repo-none")).unwrap();
        let err = InstallationRepo::new(&pool).extend(&key, 100_000_000).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn widget_with_installations_cannot_be_deleted() {
        let (pool, key) = seeded("repo-fk.example", "repo-fk").await;

        let err = WidgetRepo::new(&pool).delete("repo-fk").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        cleanup(&pool, &key).await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn domain_with_slash_matches_exactly() {
        let (pool, key) = seeded("repo.example/shop", "repo-slash").await;
        let repo = InstallationRepo::new(&pool);

        let rows = repo.list_by_client_domain("repo.example/shop").await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client_domain, "repo.example/shop");

        let none = repo.list_by_client_domain("repo.example").await.expect("list");
        assert!(none.is_empty());

        cleanup(&pool, &key).await;
    }
}
