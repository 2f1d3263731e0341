//! Reading status and tracked book records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::Error;

/// Reading status of a tracked book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    ToRead,
    DidNotFinish,
    Completed,
}

impl ReadingStatus {
    /// Every status, in display order.
    pub const ALL: [ReadingStatus; 3] = [ReadingStatus::ToRead, ReadingStatus::DidNotFinish, ReadingStatus::Completed];

    /// The stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingStatus::ToRead => "to_read",
            ReadingStatus::DidNotFinish => "did_not_finish",
            ReadingStatus::Completed => "completed",
        }
    }

    /// Parse a URL-style slug (`to-read`) or a stored value (`to_read`).
    pub fn from_slug(slug: &str) -> Result<Self, Error> {
        slug.replace('-', "_").parse()
    }

    /// Decode a value read back from storage.
    pub(crate) fn from_stored(value: &str) -> Result<Self, Error> {
        value
            .parse()
            .map_err(|_| Error::StorageIntegrity(format!("unknown stored status {value:?}")))
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_read" => Ok(ReadingStatus::ToRead),
            "did_not_finish" => Ok(ReadingStatus::DidNotFinish),
            "completed" => Ok(ReadingStatus::Completed),
            other => Err(Error::Validation(format!(
                "invalid status {other:?}; expected one of to_read, did_not_finish, completed"
            ))),
        }
    }
}

/// Catalog metadata written alongside a status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BookMetadata {
    pub title: String,
    pub authors: Vec<String>,
    pub cover_url: Option<String>,
    pub first_publish_year: Option<i32>,
}

/// A book joined with its reading status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TrackedBook {
    pub external_key: String,
    pub title: String,
    pub authors: Vec<String>,
    pub cover_url: Option<String>,
    pub first_publish_year: Option<i32>,
    pub status: ReadingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns selected by every joined read, in `BookRow` field order.
pub(crate) const BOOK_ROW_COLUMNS: &str = "b.external_key, b.title, b.authors_json, b.cover_url, \
     b.first_publish_year, s.status, s.created_at, s.updated_at";

/// A joined row as SQLite hands it back, before any decoding.
#[derive(Debug)]
pub(crate) struct BookRow {
    pub external_key: String,
    pub title: String,
    pub authors_json: String,
    pub cover_url: Option<String>,
    pub first_publish_year: Option<i32>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl BookRow {
    pub(crate) fn from_row(row: &tokio_rusqlite::rusqlite::Row<'_>) -> tokio_rusqlite::rusqlite::Result<Self> {
        Ok(Self {
            external_key: row.get(0)?,
            title: row.get(1)?,
            authors_json: row.get(2)?,
            cover_url: row.get(3)?,
            first_publish_year: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl TryFrom<BookRow> for TrackedBook {
    type Error = Error;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let authors = decode_authors(&row.external_key, &row.authors_json)?;
        Ok(Self {
            status: ReadingStatus::from_stored(&row.status)?,
            created_at: timestamp::parse("created_at", &row.created_at)?,
            updated_at: timestamp::parse("updated_at", &row.updated_at)?,
            external_key: row.external_key,
            title: row.title,
            authors,
            cover_url: row.cover_url,
            first_publish_year: row.first_publish_year,
        })
    }
}

pub(crate) fn encode_authors(authors: &[String]) -> Result<String, Error> {
    serde_json::to_string(authors).map_err(|e| Error::StorageIntegrity(format!("cannot encode authors: {e}")))
}

fn decode_authors(external_key: &str, json: &str) -> Result<Vec<String>, Error> {
    serde_json::from_str(json)
        .map_err(|e| Error::StorageIntegrity(format!("corrupt author list for {external_key}: {e}")))
}

/// Number of tracked books per status.
///
/// Every status is always present, zero when nothing matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatusCounts {
    pub to_read: u64,
    pub did_not_finish: u64,
    pub completed: u64,
}

impl StatusCounts {
    pub fn get(&self, status: ReadingStatus) -> u64 {
        match status {
            ReadingStatus::ToRead => self.to_read,
            ReadingStatus::DidNotFinish => self.did_not_finish,
            ReadingStatus::Completed => self.completed,
        }
    }

    pub(crate) fn set(&mut self, status: ReadingStatus, count: u64) {
        match status {
            ReadingStatus::ToRead => self.to_read = count,
            ReadingStatus::DidNotFinish => self.did_not_finish = count,
            ReadingStatus::Completed => self.completed = count,
        }
    }

    pub fn total(&self) -> u64 {
        self.to_read + self.did_not_finish + self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> BookRow {
        BookRow {
            external_key: "/works/OL1W".into(),
            title: "Book One".into(),
            authors_json: r#"["Author A","Author B"]"#.into(),
            cover_url: None,
            first_publish_year: Some(1965),
            status: "to_read".into(),
            created_at: "2024-01-01T00:00:00.000000Z".into(),
            updated_at: "2024-01-02T00:00:00.000000Z".into(),
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in ReadingStatus::ALL {
            assert_eq!(status.as_str().parse::<ReadingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_invalid_status_is_validation_error() {
        assert!(matches!("invalid_status".parse::<ReadingStatus>(), Err(Error::Validation(_))));
        assert!(matches!("Completed".parse::<ReadingStatus>(), Err(Error::Validation(_))));
        assert!(matches!("".parse::<ReadingStatus>(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_from_slug() {
        assert_eq!(ReadingStatus::from_slug("to-read").unwrap(), ReadingStatus::ToRead);
        assert_eq!(ReadingStatus::from_slug("did-not-finish").unwrap(), ReadingStatus::DidNotFinish);
        assert_eq!(ReadingStatus::from_slug("completed").unwrap(), ReadingStatus::Completed);
        assert!(ReadingStatus::from_slug("reading").is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ReadingStatus::DidNotFinish).unwrap(), r#""did_not_finish""#);
        let status: ReadingStatus = serde_json::from_str(r#""to_read""#).unwrap();
        assert_eq!(status, ReadingStatus::ToRead);
    }

    #[test]
    fn test_decode_row() {
        let book = TrackedBook::try_from(row()).unwrap();
        assert_eq!(book.authors, vec!["Author A".to_string(), "Author B".to_string()]);
        assert_eq!(book.status, ReadingStatus::ToRead);
        assert!(book.created_at < book.updated_at);
    }

    #[test]
    fn test_corrupt_authors_is_integrity_error() {
        let bad = BookRow { authors_json: "Author A, Author B".into(), ..row() };
        assert!(matches!(TrackedBook::try_from(bad), Err(Error::StorageIntegrity(_))));
    }

    #[test]
    fn test_unknown_stored_status_is_integrity_error() {
        let bad = BookRow { status: "reading".into(), ..row() };
        assert!(matches!(TrackedBook::try_from(bad), Err(Error::StorageIntegrity(_))));
    }

    #[test]
    fn test_counts_accessors() {
        let mut counts = StatusCounts::default();
        counts.set(ReadingStatus::ToRead, 2);
        counts.set(ReadingStatus::Completed, 1);
        assert_eq!(counts.get(ReadingStatus::ToRead), 2);
        assert_eq!(counts.get(ReadingStatus::DidNotFinish), 0);
        assert_eq!(counts.total(), 3);
    }
}
