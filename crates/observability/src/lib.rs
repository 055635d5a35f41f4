//! # secureauth-observability
//!
//! Structured Logging fuer SecureAuth via tracing-subscriber (Text oder JSON).
//! Fehlgeschlagene Ledger- und Audit-Schreibvorgaenge landen als `warn` in
//! diesem Kanal.

pub mod logging;

pub use logging::{logging_initialisieren, LogEinstellung, LogFormat, LoggingFehler};
