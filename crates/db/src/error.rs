//! Fehlertypen fuer das Datenbank-Crate

use thiserror::Error;

/// Datenbank-Fehlertypen
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Datensatz nicht gefunden: {0}")]
    NichtGefunden(String),

    /// Eindeutigkeitsverletzung; enthaelt den Spaltennamen (`username`, `email`, ...)
    #[error("Eindeutigkeitsverletzung: {0}")]
    Eindeutigkeit(String),

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    #[error("SQLx-Fehler: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration-Fehler: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Interner DB-Fehler: {0}")]
    Intern(String),
}

impl DbError {
    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::NichtGefunden(msg.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Uebersetzt einen SQLx-Fehler; UNIQUE-Verletzungen werden zu
    /// `Eindeutigkeit` mit dem betroffenen Spaltennamen.
    ///
    /// SQLite meldet z.B. `UNIQUE constraint failed: users.email`.
    pub fn aus_sqlx(e: sqlx::Error) -> Self {
        let spalte = match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                let msg = db.message();
                Some(
                    msg.rsplit(['.', ' '])
                        .next()
                        .filter(|s| !s.is_empty())
                        .unwrap_or("unbekannt")
                        .to_string(),
                )
            }
            _ => None,
        };
        match spalte {
            Some(spalte) => Self::Eindeutigkeit(spalte),
            None => Self::Sqlx(e),
        }
    }
}
