//! `pmc_data` row type and queries, plus the tolerant `file_urls` read.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

/// One stored complaint. Required text columns are read as `Option` so
/// legacy rows inserted by laxer revisions (NULL fields) stay readable.
#[derive(sqlx::FromRow)]
pub struct ComplaintRow {
    pub id: i32,
    pub fullname: Option<String>,
    pub phone: Option<String>,
    pub complaint_type: Option<String>,
    pub description: Option<String>,
    pub urgency: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub file_urls: Option<Value>,
}

/// Values for a new complaint, already validated at the boundary.
pub struct NewComplaint<'a> {
    pub fullname: &'a str,
    pub phone: &'a str,
    pub complaint_type: &'a str,
    pub description: &'a str,
    pub urgency: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Relative `/uploads/<name>` paths, in upload order
    pub file_urls: Vec<String>,
}

/// Insert a complaint and return its generated id.
pub async fn insert(pool: &PgPool, complaint: &NewComplaint<'_>) -> Result<i32, sqlx::Error> {
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO pmc_data
         (fullname, phone, complaint_type, description, urgency, latitude, longitude, file_urls)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id",
    )
    .bind(complaint.fullname)
    .bind(complaint.phone)
    .bind(complaint.complaint_type)
    .bind(complaint.description)
    .bind(complaint.urgency)
    .bind(complaint.latitude)
    .bind(complaint.longitude)
    .bind(Json(&complaint.file_urls))
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Listing query. Newest first: ids are assigned monotonically, so
/// descending id is a stable insertion-order-correlated ordering.
const LIST_ALL_SQL: &str = "SELECT id, fullname, phone, complaint_type, description, urgency,
            latitude, longitude, \"timestamp\", file_urls
     FROM pmc_data
     ORDER BY id DESC";

/// List all complaints, newest first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<ComplaintRow>, sqlx::Error> {
    sqlx::query_as(LIST_ALL_SQL).fetch_all(pool).await
}

/// Tolerant read of the stored `file_urls` column.
///
/// Accepts a native JSON array of strings or a JSON string holding an
/// encoded array (how older revisions wrote the column); anything else,
/// including malformed payloads, normalizes to an empty sequence.
pub fn parse_file_urls(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(raw)) => serde_json::from_str(raw).unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_orders_newest_first() {
        assert!(LIST_ALL_SQL.contains("ORDER BY id DESC"));
    }

    #[test]
    fn native_array_passes_through() {
        let value = json!(["/uploads/a.jpg", "/uploads/b.jpg"]);
        assert_eq!(
            parse_file_urls(Some(&value)),
            vec!["/uploads/a.jpg", "/uploads/b.jpg"]
        );
    }

    #[test]
    fn json_encoded_string_is_decoded() {
        let value = json!("[\"/uploads/a.jpg\"]");
        assert_eq!(parse_file_urls(Some(&value)), vec!["/uploads/a.jpg"]);
    }

    #[test]
    fn malformed_string_normalizes_to_empty() {
        let value = json!("not json at all");
        assert!(parse_file_urls(Some(&value)).is_empty());
    }

    #[test]
    fn null_and_absent_normalize_to_empty() {
        assert!(parse_file_urls(Some(&Value::Null)).is_empty());
        assert!(parse_file_urls(None).is_empty());
    }

    #[test]
    fn non_string_array_entries_are_skipped() {
        let value = json!(["/uploads/a.jpg", 42, null]);
        assert_eq!(parse_file_urls(Some(&value)), vec!["/uploads/a.jpg"]);
    }
}
