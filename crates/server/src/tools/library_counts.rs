//! library_counts tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shelf_core::{ShelfDb, StatusCounts};

use super::json_result;

/// Output from the library_counts tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LibraryCountsOutput {
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub total: u64,
}

/// Implementation of the library_counts tool.
pub async fn counts_impl(db: &ShelfDb) -> Result<CallToolResult, McpError> {
    let counts = db.count_by_status().await?;
    json_result(&LibraryCountsOutput { total: counts.total(), counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::output_of;
    use shelf_core::{BookMetadata, ReadingStatus};

    #[tokio::test]
    async fn test_counts_empty() {
        let db = ShelfDb::open_in_memory().await.unwrap();

        let result = counts_impl(&db).await.unwrap();
        let output: LibraryCountsOutput = output_of(&result);
        assert_eq!(output.counts, StatusCounts::default());
        assert_eq!(output.total, 0);
    }

    #[tokio::test]
    async fn test_counts() {
        let db = ShelfDb::open_in_memory().await.unwrap();
        let metadata = BookMetadata { title: "Book".into(), ..Default::default() };
        for (key, status) in [
            ("/works/OL1W", ReadingStatus::ToRead),
            ("/works/OL2W", ReadingStatus::ToRead),
            ("/works/OL3W", ReadingStatus::Completed),
        ] {
            db.set_status(key, status, &metadata).await.unwrap();
        }

        let result = counts_impl(&db).await.unwrap();
        let output: LibraryCountsOutput = output_of(&result);
        assert_eq!(output.counts.to_read, 2);
        assert_eq!(output.counts.did_not_finish, 0);
        assert_eq!(output.counts.completed, 1);
        assert_eq!(output.total, 3);
    }

    #[tokio::test]
    async fn test_counts_keys_always_present() {
        let db = ShelfDb::open_in_memory().await.unwrap();

        let result = counts_impl(&db).await.unwrap();
        let value: serde_json::Value = output_of(&result);
        for key in ["to_read", "did_not_finish", "completed", "total"] {
            assert_eq!(value[key], 0, "missing {key}");
        }
    }
}
