//! SQLite-Implementierung des AuditLogRepository

use chrono::Utc;
use sqlx::Row;

use secureauth_core::UserId;

use crate::models::{AuditLogFilter, AuditLogRecord};
use crate::repository::{AuditLogRepository, DbResult};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::zeit;

/// Obergrenze wenn der Filter kein Limit setzt
const STANDARD_LIMIT: i64 = 100;

impl AuditLogRepository for SqliteDb {
    async fn log_event(&self, user_id: Option<UserId>, action: &str) -> DbResult<AuditLogRecord> {
        let jetzt = Utc::now();
        let ergebnis = sqlx::query(
            "INSERT INTO audit_log (user_id, action, action_time) VALUES (?, ?, ?)",
        )
        .bind(user_id.map(|u| u.inner()))
        .bind(action)
        .bind(zeit::als_text(jetzt))
        .execute(&self.pool)
        .await?;

        Ok(AuditLogRecord {
            id: ergebnis.last_insert_rowid(),
            user_id,
            action: action.to_string(),
            action_time: jetzt,
            username: None,
        })
    }

    async fn list_events(&self, filter: AuditLogFilter) -> DbResult<Vec<AuditLogRecord>> {
        let where_clause = if filter.user_id.is_some() {
            "WHERE a.user_id = ?"
        } else {
            ""
        };

        let sql = format!(
            "SELECT a.id, a.user_id, a.action, a.action_time, u.username
             FROM audit_log a
             LEFT JOIN users u ON a.user_id = u.id
             {where_clause}
             ORDER BY a.action_time DESC, a.id DESC
             LIMIT ?"
        );

        let mut q = sqlx::query(&sql);
        if let Some(user_id) = filter.user_id {
            q = q.bind(user_id.inner());
        }
        q = q.bind(filter.limit.unwrap_or(STANDARD_LIMIT));

        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_audit).collect()
    }
}

fn row_to_audit(row: &sqlx::sqlite::SqliteRow) -> DbResult<AuditLogRecord> {
    let user_id: Option<i64> = row.try_get("user_id")?;

    Ok(AuditLogRecord {
        id: row.try_get("id")?,
        user_id: user_id.map(UserId),
        action: row.try_get("action")?,
        action_time: zeit::parsen(row, "action_time")?,
        username: row.try_get("username")?,
    })
}
