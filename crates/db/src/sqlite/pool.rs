//! SQLite Connection Pool mit WAL-Modus
//!
//! Jeder Repository-Aufruf leiht sich fuer genau ein Statement eine
//! Verbindung aus dem Pool; der Auth-Kern haelt selbst keine Verbindungen.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::error::DbError;
use crate::repository::DatabaseConfig;

/// Wrapper um den SQLite Connection Pool
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

impl SqliteDb {
    /// Erstellt einen neuen Pool, fuehrt Migrationen aus (Schema + Rollen)
    ///
    /// Eine `:memory:`-URL lebt nur so lange wie ihre Verbindung; der Pool
    /// haelt dann genau eine Verbindung dauerhaft offen.
    pub async fn oeffnen(config: &DatabaseConfig) -> Result<Self, DbError> {
        let im_speicher = config.url.contains(":memory:");
        let (min, max) = if im_speicher {
            (1, 1)
        } else {
            (0, config.max_verbindungen)
        };

        let opts = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(if config.sqlite_wal && !im_speicher {
                SqliteJournalMode::Wal
            } else {
                SqliteJournalMode::Delete
            })
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(min)
            .max_connections(max)
            .connect_with(opts)
            .await?;

        info!(url = %config.url, wal = config.sqlite_wal, "SQLite-Pool geoeffnet");

        let db = Self { pool };
        db.migrationen_ausfuehren().await?;

        Ok(db)
    }

    /// Fuehrt alle ausstehenden Migrationen aus
    pub async fn migrationen_ausfuehren(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Datenbank-Migrationen abgeschlossen");
        Ok(())
    }

    /// Gibt den internen Pool zurueck (fuer Tests)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Schliesst den Pool; weitere Aufrufe schlagen mit `PoolClosed` fehl
    pub async fn schliessen(&self) {
        self.pool.close().await;
    }

    /// Erstellt eine In-Memory-Datenbank fuer Tests
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::oeffnen(&DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_verbindungen: 1,
            sqlite_wal: false,
        })
        .await
    }
}
