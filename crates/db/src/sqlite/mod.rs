//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod audit;
pub mod pool;
pub mod roles;
pub mod sessions;
pub mod statistik;
pub mod users;
mod zeit;

pub use pool::SqliteDb;
