//! SQLite-Implementierung des RoleRepository

use sqlx::Row as _;

use secureauth_core::RoleId;

use crate::models::RolleRecord;
use crate::repository::{DbResult, RoleRepository};
use crate::sqlite::pool::SqliteDb;

impl RoleRepository for SqliteDb {
    async fn get_role(&self, id: RoleId) -> DbResult<Option<RolleRecord>> {
        let row = sqlx::query("SELECT id, name, description FROM roles WHERE id = ?")
            .bind(id.inner())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_rolle(&r)).transpose()
    }

    async fn get_role_by_name(&self, name: &str) -> DbResult<Option<RolleRecord>> {
        let row = sqlx::query("SELECT id, name, description FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_rolle(&r)).transpose()
    }

    async fn list_roles(&self) -> DbResult<Vec<RolleRecord>> {
        let rows = sqlx::query("SELECT id, name, description FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_rolle).collect()
    }
}

fn row_to_rolle(row: &sqlx::sqlite::SqliteRow) -> DbResult<RolleRecord> {
    Ok(RolleRecord {
        id: RoleId(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}
