//! secureauth-auth – Authentifizierungs- und Session-Kern
//!
//! Dieses Crate implementiert:
//! - Passwort-Richtlinie und Hashing mit Argon2id
//! - Session-Ledger (Login/Logout-Intervalle, best effort)
//! - Audit-Protokoll (nur anhaengen, best effort)
//! - AuthService (Registrierung, Login, Logout, Profil, Rollen, Loeschen)
//! - Autorisierungs-Gate (Anmeldung vor Rolle pruefen)
//!
//! Client-Tokens stellt die Web-Schicht aus; dieses Crate liefert ihr nur
//! den [`AuthenticatedPrincipal`](secureauth_core::AuthenticatedPrincipal).

pub mod ansichten;
pub mod audit;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod password;
pub mod service;

// Bequeme Re-Exporte
pub use audit::AuditProtokoll;
pub use error::{AuthError, AuthResult, KonfliktFeld};
pub use gate::{anmeldung_erfordern, rolle_erfordern, zulassen, Zugang};
pub use ledger::SessionLedger;
pub use password::{
    passwort_hashen, passwort_staerke_pruefen, passwort_verifizieren, vergleichs_hash_vorbereiten,
    PasswortMangel,
};
pub use service::{Anmeldung, AuthService, ClientInfo, VerlaufLimits};
