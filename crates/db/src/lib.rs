//! secureauth-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern fuer Credential Store,
//! Rollen, Session-Ledger und Audit-Log bereit. Die SQLite-Implementierung
//! liegt in [`sqlite`].

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{
    AuditLogRepository, DatabaseConfig, DbResult, RoleRepository, SessionRepository,
    StatistikRepository, UserRepository,
};
pub use sqlite::SqliteDb;
