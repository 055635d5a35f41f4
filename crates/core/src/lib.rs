//! secureauth-core – Gemeinsame Typen
//!
//! Dieses Crate stellt die Bausteine bereit, die von Datenbank, Auth-Kern
//! und der (externen) Web-Schicht gemeinsam genutzt werden.

pub mod principal;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use principal::AuthenticatedPrincipal;
pub use types::{RoleId, Rolle, SessionId, UserId};
