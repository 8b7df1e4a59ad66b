//! Table bootstrap
//!
//! Idempotent `CREATE ... IF NOT EXISTS` statements for a fresh database.
//! There is no version tracking: existing tables are left as they are.

use sqlx::PgPool;

const CREATE_WIDGETS: &str = r#"
    CREATE TABLE IF NOT EXISTS widgets (
        id_widget VARCHAR(30) PRIMARY KEY,
        name_widget TEXT NOT NULL,
        paid BOOLEAN,
        price NUMERIC(8, 2)
    )
"#;

const CREATE_INSTALLATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS installations (
        client_domain VARCHAR(255) NOT NULL,
        id_widget VARCHAR(30) NOT NULL
            REFERENCES widgets (id_widget) ON DELETE RESTRICT,
        date_install DATE NOT NULL,
        date_expire DATE NOT NULL
            CHECK (date_expire <= DATE '262142-12-31'),
        trial BOOLEAN,
        status SMALLINT NOT NULL,
        PRIMARY KEY (client_domain, id_widget)
    )
"#;

const CREATE_INSTALLATIONS_WIDGET_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS installations_id_widget_idx
        ON installations (id_widget)
"#;

/// Create the widget and installation tables if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring widget schema...");

    for statement in [
        CREATE_WIDGETS,
        CREATE_INSTALLATIONS,
        CREATE_INSTALLATIONS_WIDGET_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Widget schema ready");
    Ok(())
}
