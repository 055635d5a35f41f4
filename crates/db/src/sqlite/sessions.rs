//! SQLite-Implementierung des Session-Ledgers

use chrono::Utc;
use sqlx::Row as _;

use secureauth_core::{SessionId, UserId};

use crate::error::DbError;
use crate::models::{SessionMitBenutzer, SessionRecord};
use crate::repository::{DbResult, SessionRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::zeit;

impl SessionRepository for SqliteDb {
    async fn open_session(
        &self,
        user_id: UserId,
        client_address: Option<&str>,
        client_agent: Option<&str>,
    ) -> DbResult<SessionId> {
        let jetzt = zeit::als_text(Utc::now());
        let ergebnis = sqlx::query(
            "INSERT INTO sessions (user_id, login_time, client_address, client_agent)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id.inner())
        .bind(&jetzt)
        .bind(client_address)
        .bind(client_agent)
        .execute(&self.pool)
        .await?;

        Ok(SessionId(ergebnis.last_insert_rowid()))
    }

    async fn close_session(&self, id: SessionId) -> DbResult<()> {
        let jetzt = zeit::als_text(Utc::now());
        let affected = sqlx::query("UPDATE sessions SET logout_time = ? WHERE id = ?")
            .bind(&jetzt)
            .bind(id.inner())
            .execute(&self.pool)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Session {id}")));
        }
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> DbResult<Option<SessionRecord>> {
        let row = sqlx::query(
            "SELECT id, user_id, login_time, logout_time, client_address, client_agent
             FROM sessions WHERE id = ?",
        )
        .bind(id.inner())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn list_for_user(&self, user_id: UserId, limit: i64) -> DbResult<Vec<SessionRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_id, login_time, logout_time, client_address, client_agent
             FROM sessions
             WHERE user_id = ?
             ORDER BY login_time DESC, id DESC
             LIMIT ?",
        )
        .bind(user_id.inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_session).collect()
    }

    async fn list_all(&self, limit: i64) -> DbResult<Vec<SessionMitBenutzer>> {
        let rows = sqlx::query(
            "SELECT s.id, s.user_id, s.login_time, s.logout_time, s.client_address,
                    s.client_agent, u.username
             FROM sessions s
             LEFT JOIN users u ON s.user_id = u.id
             ORDER BY s.login_time DESC, s.id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| {
                Ok(SessionMitBenutzer {
                    session: row_to_session(r)?,
                    username: r.try_get("username")?,
                })
            })
            .collect()
    }
}

fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> DbResult<SessionRecord> {
    Ok(SessionRecord {
        id: SessionId(row.try_get("id")?),
        user_id: UserId(row.try_get("user_id")?),
        login_time: zeit::parsen(row, "login_time")?,
        logout_time: zeit::opt_parsen(row, "logout_time")?,
        client_address: row.try_get("client_address")?,
        client_agent: row.try_get("client_agent")?,
    })
}
