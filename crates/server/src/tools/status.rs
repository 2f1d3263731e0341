//! Reading status tools: status_get, status_set, status_delete, status_list.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shelf_core::{BookMetadata, Error, ReadingStatus, ShelfDb, TrackedBook};

use super::json_result;

/// Parameters naming one book.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatusKeyParams {
    /// Catalog work key, e.g. `/works/OL27448W`.
    pub key: String,
}

/// Parameters for the status_set tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatusSetParams {
    /// Catalog work key, e.g. `/works/OL27448W`.
    pub key: String,

    /// One of to_read, did_not_finish, completed (hyphens accepted).
    pub status: String,

    /// Book title.
    pub title: String,

    /// Author names, in catalog order.
    #[serde(default)]
    pub authors: Vec<String>,

    #[serde(default)]
    pub cover_url: Option<String>,

    #[serde(default)]
    pub first_publish_year: Option<i32>,
}

/// Parameters for the status_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StatusListParams {
    /// Only list books with this status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Output from the status_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatusDeleteOutput {
    pub deleted: bool,
}

/// Output from the status_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatusListOutput {
    pub books: Vec<TrackedBook>,
    pub count: usize,
}

fn require_key(key: &str) -> Result<&str, Error> {
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Validation("key cannot be empty".into()));
    }
    Ok(key)
}

/// Implementation of the status_get tool.
pub async fn get_impl(db: &ShelfDb, params: StatusKeyParams) -> Result<CallToolResult, McpError> {
    let key = require_key(&params.key)?;
    let book = db
        .get_status(key)
        .await?
        .ok_or_else(|| Error::NotFound(format!("no status for {key}")))?;

    json_result(&book)
}

/// Implementation of the status_set tool.
pub async fn set_impl(db: &ShelfDb, params: StatusSetParams) -> Result<CallToolResult, McpError> {
    let key = require_key(&params.key)?;
    let status = ReadingStatus::from_slug(&params.status)?;
    let metadata = BookMetadata {
        title: params.title,
        authors: params.authors,
        cover_url: params.cover_url,
        first_publish_year: params.first_publish_year,
    };

    let book = db.set_status(key, status, &metadata).await?;
    json_result(&book)
}

/// Implementation of the status_delete tool.
pub async fn delete_impl(db: &ShelfDb, params: StatusKeyParams) -> Result<CallToolResult, McpError> {
    let key = require_key(&params.key)?;
    if !db.delete_status(key).await? {
        return Err(Error::NotFound(format!("no status for {key}")).into());
    }

    json_result(&StatusDeleteOutput { deleted: true })
}

/// Implementation of the status_list tool.
pub async fn list_impl(db: &ShelfDb, params: StatusListParams) -> Result<CallToolResult, McpError> {
    let books = match params.status.as_deref() {
        Some(slug) => db.list_by_status(ReadingStatus::from_slug(slug)?).await?,
        None => db.list_all().await?,
    };

    json_result(&StatusListOutput { count: books.len(), books })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::output_of;

    fn set_params(key: &str, status: &str) -> StatusSetParams {
        StatusSetParams {
            key: key.into(),
            status: status.into(),
            title: "Dune".into(),
            authors: vec!["Frank Herbert".into()],
            cover_url: None,
            first_publish_year: Some(1965),
        }
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let db = ShelfDb::open_in_memory().await.unwrap();

        let result = set_impl(&db, set_params("/works/OL1W", "to-read")).await.unwrap();
        let set: TrackedBook = output_of(&result);
        assert_eq!(set.status, ReadingStatus::ToRead);
        assert_eq!(set.authors, vec!["Frank Herbert"]);

        let result = get_impl(&db, StatusKeyParams { key: "/works/OL1W".into() })
            .await
            .unwrap();
        let got: TrackedBook = output_of(&result);
        assert_eq!(got, set);
    }

    #[tokio::test]
    async fn test_set_invalid_status() {
        let db = ShelfDb::open_in_memory().await.unwrap();

        let err = set_impl(&db, set_params("/works/OL1W", "reading")).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert_eq!(db.book_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_key() {
        let db = ShelfDb::open_in_memory().await.unwrap();

        let err = set_impl(&db, set_params("  ", "completed")).await.unwrap_err();
        assert_eq!(err.code.0, -32602);

        let err = get_impl(&db, StatusKeyParams { key: String::new() })
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = ShelfDb::open_in_memory().await.unwrap();

        let err = get_impl(&db, StatusKeyParams { key: "/works/OL404W".into() })
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = ShelfDb::open_in_memory().await.unwrap();
        set_impl(&db, set_params("/works/OL1W", "completed")).await.unwrap();

        let result = delete_impl(&db, StatusKeyParams { key: "/works/OL1W".into() })
            .await
            .unwrap();
        let output: StatusDeleteOutput = output_of(&result);
        assert!(output.deleted);
        assert_eq!(db.book_count().await.unwrap(), 0);

        let err = delete_impl(&db, StatusKeyParams { key: "/works/OL1W".into() })
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_list() {
        let db = ShelfDb::open_in_memory().await.unwrap();
        set_impl(&db, set_params("/works/OL1W", "to_read")).await.unwrap();
        set_impl(&db, set_params("/works/OL2W", "completed")).await.unwrap();

        let result = list_impl(&db, StatusListParams::default()).await.unwrap();
        let all: StatusListOutput = output_of(&result);
        assert_eq!(all.count, 2);

        let result = list_impl(&db, StatusListParams { status: Some("completed".into()) })
            .await
            .unwrap();
        let completed: StatusListOutput = output_of(&result);
        assert_eq!(completed.count, 1);
        assert_eq!(completed.books[0].external_key, "/works/OL2W");

        let result = list_impl(&db, StatusListParams { status: Some("did-not-finish".into()) })
            .await
            .unwrap();
        let none: StatusListOutput = output_of(&result);
        assert!(none.books.is_empty());
    }

    #[tokio::test]
    async fn test_list_invalid_status() {
        let db = ShelfDb::open_in_memory().await.unwrap();

        let err = list_impl(&db, StatusListParams { status: Some("bogus".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
