//! Fehlertypen fuer den Auth-Kern
//!
//! Die `Display`-Texte sind fuer Betriebslogs gedacht. Was der Endbenutzer
//! sieht, liefert [`AuthError::nutzer_nachricht`].

use thiserror::Error;

use secureauth_db::DbError;

use crate::password::PasswortMangel;

/// Feld, an dem eine Registrierung mit einem bestehenden Benutzer kollidiert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KonfliktFeld {
    Username,
    Email,
}

impl std::fmt::Display for KonfliktFeld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Username => f.write_str("Benutzername"),
            Self::Email => f.write_str("E-Mail"),
        }
    }
}

/// Alle moeglichen Fehler im Auth-Kern
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    #[error("Passwort erfuellt die Richtlinie nicht: {0}")]
    SchwachesPasswort(PasswortMangel),

    // --- Eingaben ---
    #[error("Pflichtangabe fehlt")]
    FehlendeEingabe(&'static str),

    // --- Authentifizierung ---
    /// Ohne Details: unbekannter Benutzer und falsches Passwort
    /// sind von aussen nicht unterscheidbar.
    #[error("Benutzername oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    // --- Berechtigungen ---
    #[error("Zugriff verweigert: Rolle '{0}' erforderlich")]
    ZugriffVerweigert(secureauth_core::Rolle),

    // --- Benutzerverwaltung ---
    #[error("{0} bereits vergeben")]
    Konflikt(KonfliktFeld),

    #[error("Nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Eigener Account kann nicht per Admin-Verwaltung geloescht werden")]
    SelbstLoeschung,

    // --- Datenbank ---
    #[error("Datenspeicher nicht verfuegbar: {0}")]
    SpeicherNichtVerfuegbar(#[source] DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    /// Kurze, kategoriegerechte Meldung fuer den Endbenutzer
    pub fn nutzer_nachricht(&self) -> &'static str {
        match self {
            Self::SchwachesPasswort(mangel) => mangel.nachricht(),
            Self::FehlendeEingabe(nachricht) => *nachricht,
            Self::UngueltigeAnmeldedaten => "Invalid username or password.",
            Self::ZugriffVerweigert(_) => "Access denied. Admin privileges required.",
            Self::Konflikt(KonfliktFeld::Username) => "Username already exists!",
            Self::Konflikt(KonfliktFeld::Email) => "Email already exists!",
            Self::NichtGefunden(_) => "The requested record does not exist.",
            Self::SelbstLoeschung => "You cannot delete your own account.",
            Self::SpeicherNichtVerfuegbar(_) => "Database connection error. Please try again.",
            Self::PasswortHashing(_) | Self::Intern(_) => {
                "An internal error occurred. Please try again."
            }
        }
    }
}

impl From<DbError> for AuthError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Eindeutigkeit(ref spalte) if spalte == "username" => {
                Self::Konflikt(KonfliktFeld::Username)
            }
            DbError::Eindeutigkeit(ref spalte) if spalte == "email" => {
                Self::Konflikt(KonfliktFeld::Email)
            }
            DbError::NichtGefunden(was) => Self::NichtGefunden(was),
            DbError::UngueltigeDaten(msg) | DbError::Intern(msg) => Self::Intern(msg),
            andere => Self::SpeicherNichtVerfuegbar(andere),
        }
    }
}

/// Result-Alias fuer den Auth-Kern
pub type AuthResult<T> = Result<T, AuthError>;
