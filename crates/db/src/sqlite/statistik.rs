//! Zaehlerstaende fuer das Admin-Dashboard

use sqlx::Row;

use crate::models::Statistik;
use crate::repository::{DbResult, StatistikRepository};
use crate::sqlite::pool::SqliteDb;

impl StatistikRepository for SqliteDb {
    async fn statistik(&self) -> DbResult<Statistik> {
        let row = sqlx::query(
            "SELECT (SELECT COUNT(*) FROM users)     AS benutzer,
                    (SELECT COUNT(*) FROM roles)     AS rollen,
                    (SELECT COUNT(*) FROM sessions)  AS sessions,
                    (SELECT COUNT(*) FROM audit_log) AS audit_eintraege",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(Statistik {
            benutzer: row.try_get("benutzer")?,
            rollen: row.try_get("rollen")?,
            sessions: row.try_get("sessions")?,
            audit_eintraege: row.try_get("audit_eintraege")?,
        })
    }
}
