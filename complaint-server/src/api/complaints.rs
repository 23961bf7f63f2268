//! Complaint submission and admin listing endpoints

use axum::extract::{Multipart, State};
use serde::Serialize;

use crate::db::complaints::{self, ComplaintRow, NewComplaint};
use crate::error::{ApiResult, AppError};
use crate::state::AppState;
use crate::storage::{self, MAX_UPLOAD_FILES, UploadedFile};

/// Text fields as they arrive off the wire, before validation
#[derive(Debug, Default)]
pub struct RawForm {
    pub fullname: Option<String>,
    pub phone: Option<String>,
    pub complaint_type: Option<String>,
    pub description: Option<String>,
    pub urgency: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// A submission that passed validation: required fields trimmed and
/// non-empty, coordinates parsed or absent
#[derive(Debug)]
pub struct SubmittedForm {
    pub fullname: String,
    pub phone: String,
    pub complaint_type: String,
    pub description: String,
    pub urgency: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn required(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

fn parse_coordinate(value: Option<String>, name: &str) -> Result<Option<f64>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            raw.parse::<f64>()
                .map(Some)
                .map_err(|_| AppError::validation(format!("Invalid {name}")))
        }
    }
}

impl RawForm {
    /// Enforce the strict revision's contract: every required field present
    /// and non-empty after trimming, coordinates numeric or absent.
    pub fn validate(self) -> Result<SubmittedForm, AppError> {
        let (Some(fullname), Some(phone), Some(complaint_type), Some(description), Some(urgency)) = (
            required(self.fullname),
            required(self.phone),
            required(self.complaint_type),
            required(self.description),
            required(self.urgency),
        ) else {
            return Err(AppError::validation("Missing required fields"));
        };

        Ok(SubmittedForm {
            fullname,
            phone,
            complaint_type,
            description,
            urgency,
            latitude: parse_coordinate(self.latitude, "latitude")?,
            longitude: parse_coordinate(self.longitude, "longitude")?,
        })
    }
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub id: i32,
}

/// POST /api/complaints — multipart submission with up to 5 attachments
pub async fn submit_complaint(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<SubmitResponse> {
    let mut raw = RawForm::default();
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                if files.len() == MAX_UPLOAD_FILES {
                    return Err(AppError::validation(format!(
                        "Too many files: at most {MAX_UPLOAD_FILES} attachments allowed"
                    )));
                }
                let original_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?.to_vec();
                files.push(UploadedFile {
                    original_name,
                    data,
                });
            }
            "fullname" => raw.fullname = Some(field.text().await?),
            "phone" => raw.phone = Some(field.text().await?),
            "complaint_type" => raw.complaint_type = Some(field.text().await?),
            "description" => raw.description = Some(field.text().await?),
            "urgency" => raw.urgency = Some(field.text().await?),
            "latitude" => raw.latitude = Some(field.text().await?),
            "longitude" => raw.longitude = Some(field.text().await?),
            // Unknown fields are ignored rather than rejected
            _ => {}
        }
    }

    // All validation happens before any write side effect.
    let form = raw.validate()?;

    // Attachments are written before the insert; a failed insert leaves
    // them behind as orphans. Nothing rolls them back.
    let mut file_urls = Vec::with_capacity(files.len());
    for file in &files {
        file_urls.push(storage::store_file(&state.upload_dir, file).await?);
    }

    let id = complaints::insert(
        &state.pool,
        &NewComplaint {
            fullname: &form.fullname,
            phone: &form.phone,
            complaint_type: &form.complaint_type,
            description: &form.description,
            urgency: &form.urgency,
            latitude: form.latitude,
            longitude: form.longitude,
            file_urls,
        },
    )
    .await?;

    tracing::info!(id, attachments = files.len(), "Complaint submitted");

    Ok(axum::Json(SubmitResponse {
        message: "Complaint submitted successfully",
        id,
    }))
}

/// One complaint as returned to the admin console
#[derive(Serialize)]
pub struct ComplaintRecord {
    pub id: i32,
    pub fullname: String,
    pub phone: String,
    pub complaint_type: String,
    pub description: String,
    pub urgency: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub file_urls: Vec<String>,
}

/// Prefix a stored relative path with the public base URL. Legacy rows
/// written by older revisions hold absolute URLs already; those pass
/// through untouched.
fn absolutize(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn project(row: ComplaintRow, base_url: &str) -> ComplaintRecord {
    let file_urls = complaints::parse_file_urls(row.file_urls.as_ref())
        .iter()
        .map(|path| absolutize(base_url, path))
        .collect();

    ComplaintRecord {
        id: row.id,
        fullname: row.fullname.unwrap_or_default(),
        phone: row.phone.unwrap_or_default(),
        complaint_type: row.complaint_type.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        urgency: row.urgency.unwrap_or_default(),
        latitude: row.latitude,
        longitude: row.longitude,
        timestamp: row.timestamp,
        file_urls,
    }
}

/// GET /api/admin/complaints — all complaints, newest first, attachment
/// paths rewritten to absolute URLs (read-time projection only)
pub async fn list_complaints(State(state): State<AppState>) -> ApiResult<Vec<ComplaintRecord>> {
    let rows = complaints::list_all(&state.pool).await?;
    let records = rows
        .into_iter()
        .map(|row| project(row, &state.public_base_url))
        .collect();
    Ok(axum::Json(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_form() -> RawForm {
        RawForm {
            fullname: Some("Asha".into()),
            phone: Some("9999999999".into()),
            complaint_type: Some("pothole".into()),
            description: Some("big hole".into()),
            urgency: Some("high".into()),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn complete_form_validates() {
        let form = full_form().validate().expect("must validate");
        assert_eq!(form.fullname, "Asha");
        assert_eq!(form.latitude, None);
    }

    #[test]
    fn missing_field_fails() {
        let mut raw = full_form();
        raw.urgency = None;
        let err = raw.validate().expect_err("must fail");
        assert_eq!(err.to_string(), "Missing required fields");
    }

    #[test]
    fn whitespace_only_field_fails() {
        let mut raw = full_form();
        raw.phone = Some("   ".into());
        assert!(raw.validate().is_err());
    }

    #[test]
    fn fields_are_trimmed() {
        let mut raw = full_form();
        raw.fullname = Some("  Asha  ".into());
        let form = raw.validate().expect("must validate");
        assert_eq!(form.fullname, "Asha");
    }

    #[test]
    fn coordinates_parse_or_stay_absent() {
        let mut raw = full_form();
        raw.latitude = Some("18.5204".into());
        raw.longitude = Some("".into());
        let form = raw.validate().expect("must validate");
        assert_eq!(form.latitude, Some(18.5204));
        assert_eq!(form.longitude, None);
    }

    #[test]
    fn garbage_coordinate_fails() {
        let mut raw = full_form();
        raw.latitude = Some("north-ish".into());
        assert!(raw.validate().is_err());
    }

    #[test]
    fn absolutize_prefixes_relative_paths() {
        assert_eq!(
            absolutize("http://localhost:8080", "/uploads/a.jpg"),
            "http://localhost:8080/uploads/a.jpg"
        );
        assert_eq!(
            absolutize("http://localhost:8080/", "/uploads/a.jpg"),
            "http://localhost:8080/uploads/a.jpg"
        );
    }

    #[test]
    fn absolutize_keeps_absolute_urls() {
        assert_eq!(
            absolutize("http://localhost:8080", "https://old.example.com/uploads/a.jpg"),
            "https://old.example.com/uploads/a.jpg"
        );
    }

    #[test]
    fn projection_rewrites_file_urls() {
        let row = ComplaintRow {
            id: 3,
            fullname: Some("Asha".into()),
            phone: Some("9999999999".into()),
            complaint_type: Some("pothole".into()),
            description: Some("big hole".into()),
            urgency: Some("high".into()),
            latitude: None,
            longitude: None,
            timestamp: chrono::Utc::now(),
            file_urls: Some(json!(["/uploads/a.jpg", "/uploads/b.jpg"])),
        };

        let record = project(row, "http://pmc.example.org");
        assert_eq!(
            record.file_urls,
            vec![
                "http://pmc.example.org/uploads/a.jpg",
                "http://pmc.example.org/uploads/b.jpg"
            ]
        );
    }

    #[test]
    fn projection_tolerates_legacy_rows() {
        let row = ComplaintRow {
            id: 1,
            fullname: None,
            phone: None,
            complaint_type: None,
            description: None,
            urgency: None,
            latitude: None,
            longitude: None,
            timestamp: chrono::Utc::now(),
            file_urls: Some(json!("still not json")),
        };

        let record = project(row, "http://pmc.example.org");
        assert_eq!(record.fullname, "");
        assert!(record.file_urls.is_empty());
    }
}
