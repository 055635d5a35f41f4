//! Zeitstempel-Helfer: Speicherung als RFC-3339-Text in UTC
//!
//! Feste Mikrosekunden-Praezision, damit die lexikografische Sortierung
//! in `ORDER BY` der zeitlichen entspricht.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use crate::error::DbError;
use crate::repository::DbResult;

pub(crate) fn als_text(zeit: DateTime<Utc>) -> String {
    zeit.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parsen(row: &sqlx::sqlite::SqliteRow, spalte: &str) -> DbResult<DateTime<Utc>> {
    let text: String = row.try_get(spalte)?;
    text_parsen(spalte, &text)
}

pub(crate) fn opt_parsen(
    row: &sqlx::sqlite::SqliteRow,
    spalte: &str,
) -> DbResult<Option<DateTime<Utc>>> {
    let text: Option<String> = row.try_get(spalte)?;
    text.as_deref().map(|t| text_parsen(spalte, t)).transpose()
}

fn text_parsen(spalte: &str, text: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltige {spalte} '{text}': {e}")))
}
