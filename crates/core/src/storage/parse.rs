//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{DateTime, Utc};
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::models::{RoomType, WardenStatus, Washroom};

fn conversion_error<E>(column: usize, err: E) -> SqlError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SqlError::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(|e| conversion_error(0, e))
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(0, e))
}

pub fn parse_status(s: &str) -> Result<WardenStatus, SqlError> {
    s.parse::<WardenStatus>().map_err(|e| conversion_error(0, e))
}

pub fn parse_room_type(s: &str) -> Result<RoomType, SqlError> {
    RoomType::parse(s).ok_or_else(|| {
        conversion_error(
            0,
            crate::error::Error::validation("roomType", format!("Unknown room type: {}", s)),
        )
    })
}

/// Washroom is stored as its JSON form (`2` or `true`)
pub fn parse_washroom(s: &str) -> Result<Washroom, SqlError> {
    serde_json::from_str(s).map_err(|e| conversion_error(0, e))
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
