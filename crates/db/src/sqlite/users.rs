//! SQLite-Implementierung des UserRepository (Credential Store)

use chrono::Utc;
use sqlx::Row as _;

use secureauth_core::{RoleId, UserId};

use crate::error::DbError;
use crate::models::{BenutzerRecord, NeuerBenutzer, ProfilUpdate};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::zeit;

const BENUTZER_SELECT: &str = "SELECT u.id, u.username, u.email, u.password_hash, u.full_name,
            u.profile_picture, u.role_id, r.name AS role_name, u.created_at, u.updated_at
     FROM users u
     LEFT JOIN roles r ON u.role_id = r.id";

impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<UserId> {
        if data.username.is_empty() || data.email.is_empty() {
            return Err(DbError::UngueltigeDaten(
                "Benutzername und E-Mail duerfen nicht leer sein".into(),
            ));
        }
        if data.password_hash.is_empty() {
            return Err(DbError::UngueltigeDaten("Passwort-Hash fehlt".into()));
        }

        // Vorabpruefung; die UNIQUE-Constraints fangen den verbleibenden Race ab
        if self.get_by_username(data.username).await?.is_some() {
            return Err(DbError::Eindeutigkeit("username".into()));
        }
        if self.get_by_email(data.email).await?.is_some() {
            return Err(DbError::Eindeutigkeit("email".into()));
        }

        let jetzt = zeit::als_text(Utc::now());
        let ergebnis = sqlx::query(
            "INSERT INTO users (username, email, password_hash, full_name, role_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.full_name)
        .bind(data.role_id.inner())
        .bind(&jetzt)
        .bind(&jetzt)
        .execute(&self.pool)
        .await
        .map_err(DbError::aus_sqlx)?;

        Ok(UserId(ergebnis.last_insert_rowid()))
    }

    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("{BENUTZER_SELECT} WHERE u.id = ?");
        let row = sqlx::query(&sql)
            .bind(id.inner())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("{BENUTZER_SELECT} WHERE u.username = ?");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let sql = format!("{BENUTZER_SELECT} WHERE u.email = ?");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn list(&self) -> DbResult<Vec<BenutzerRecord>> {
        let sql = format!("{BENUTZER_SELECT} ORDER BY u.created_at DESC, u.id DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(row_to_benutzer).collect()
    }

    async fn update_profile(&self, id: UserId, data: ProfilUpdate) -> DbResult<()> {
        let jetzt = zeit::als_text(Utc::now());

        // Bild nur ueberschreiben wenn ein neues gespeichert wurde
        let q = match data.profile_picture {
            Some(ref bild) => sqlx::query(
                "UPDATE users SET full_name = ?, profile_picture = ?, updated_at = ? WHERE id = ?",
            )
            .bind(data.full_name.as_deref())
            .bind(bild),
            None => sqlx::query("UPDATE users SET full_name = ?, updated_at = ? WHERE id = ?")
                .bind(data.full_name.as_deref()),
        };

        let affected = q
            .bind(&jetzt)
            .bind(id.inner())
            .execute(&self.pool)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {id}")));
        }
        Ok(())
    }

    async fn update_role(&self, id: UserId, role_id: RoleId) -> DbResult<()> {
        let jetzt = zeit::als_text(Utc::now());
        let affected = sqlx::query("UPDATE users SET role_id = ?, updated_at = ? WHERE id = ?")
            .bind(role_id.inner())
            .bind(&jetzt)
            .bind(id.inner())
            .execute(&self.pool)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {id}")));
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> DbResult<()> {
        // Hartes Loeschen; Sessions und Audit-Eintraege behalten die ID
        let affected = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.inner())
            .execute(&self.pool)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {id}")));
        }
        Ok(())
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    let role_id: Option<i64> = row.try_get("role_id")?;

    Ok(BenutzerRecord {
        id: UserId(row.try_get("id")?),
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        full_name: row.try_get("full_name")?,
        profile_picture: row.try_get("profile_picture")?,
        role_id: role_id.map(RoleId),
        role_name: row.try_get("role_name")?,
        created_at: zeit::parsen(row, "created_at")?,
        updated_at: zeit::parsen(row, "updated_at")?,
    })
}
