//! Passwort-Richtlinie und Hashing mit Argon2id
//!
//! Die Hashes sind PHC-Strings und enthalten Algorithmus, Parameter und
//! einen pro Aufruf zufaelligen Salt. Der Vergleich im Verifier laeuft in
//! konstanter Zeit.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::AuthError;

/// Mindestlaenge in Zeichen (nicht Bytes)
pub const MINDESTLAENGE: usize = 8;

/// Erste verletzte Regel der Passwort-Richtlinie
///
/// Die Reihenfolge der Pruefung ist Laenge, Grossbuchstabe, Kleinbuchstabe,
/// Ziffer. Die Texte werden dem Benutzer unveraendert angezeigt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswortMangel {
    ZuKurz,
    KeinGrossbuchstabe,
    KeinKleinbuchstabe,
    KeineZiffer,
}

impl PasswortMangel {
    pub fn nachricht(&self) -> &'static str {
        match self {
            Self::ZuKurz => "Password must be at least 8 characters long",
            Self::KeinGrossbuchstabe => "Password must contain at least one uppercase letter",
            Self::KeinKleinbuchstabe => "Password must contain at least one lowercase letter",
            Self::KeineZiffer => "Password must contain at least one number",
        }
    }
}

impl std::fmt::Display for PasswortMangel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.nachricht())
    }
}

/// Prueft ein Passwort gegen die Richtlinie
pub fn passwort_staerke_pruefen(passwort: &str) -> Result<(), PasswortMangel> {
    if passwort.chars().count() < MINDESTLAENGE {
        return Err(PasswortMangel::ZuKurz);
    }
    if !passwort.chars().any(char::is_uppercase) {
        return Err(PasswortMangel::KeinGrossbuchstabe);
    }
    if !passwort.chars().any(char::is_lowercase) {
        return Err(PasswortMangel::KeinKleinbuchstabe);
    }
    if !passwort.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswortMangel::KeineZiffer);
    }
    Ok(())
}

/// Argon2id-Parameter fuer sicheres Passwort-Hashing
///
/// Werte gemaess OWASP-Empfehlungen (Stand 2024):
/// - Speicher: 64 MiB
/// - Iterationen: 3
/// - Parallelismus: 1
fn argon2_instanz() -> Result<Argon2<'static>, AuthError> {
    let params = Params::new(
        64 * 1024, // m_cost: 64 MiB
        3,         // t_cost: 3 Iterationen
        1,         // p_cost: 1 Thread
        None,      // output_len: Standard (32 Bytes)
    )
    .map_err(|e| AuthError::PasswortHashing(format!("Argon2-Parameter ungueltig: {e}")))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
///
/// Gibt den PHC-String zurueck (inkl. Algorithmus, Parameter und Salt).
pub fn passwort_hashen(passwort: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2_instanz()?
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswortHashing(e.to_string()))
}

/// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
///
/// Gibt `true` zurueck wenn das Passwort korrekt ist. Ein Hash der sich
/// nicht parsen laesst ist ein Fehler, kein `false`.
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

    match argon2_instanz()?.verify_password(passwort.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
    }
}

/// Klartext hinter dem Vergleichshash; passt zu keinem Benutzer
const VERGLEICHS_PASSWORT: &str = "Vergleich-0hne-Benutzer";

/// Hash mit denselben Parametern wie gespeicherte Hashes, einmal pro Prozess erzeugt
fn vergleichs_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| passwort_hashen(VERGLEICHS_PASSWORT).ok())
        .as_deref()
}

/// Erzeugt den Vergleichshash vorab, damit der erste Login nicht langsamer ist
pub fn vergleichs_hash_vorbereiten() -> bool {
    vergleichs_hash().is_some()
}

/// Verifikation fuer unbekannte Benutzer
///
/// Kostet so viel wie eine echte Verifikation und liefert immer `false`.
/// Ein fehlender Benutzer ist damit an der Antwortzeit nicht von einem
/// falschen Passwort zu unterscheiden.
pub fn blind_verifizieren(passwort: &str) -> bool {
    if let Some(hash) = vergleichs_hash() {
        let _ = passwort_verifizieren(passwort, hash);
    }
    false
}
