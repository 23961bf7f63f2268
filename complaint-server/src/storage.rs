//! Attachment storage
//!
//! Writes uploaded files into the upload directory under generated unique
//! names and hands back the relative `/uploads/<name>` path that gets
//! persisted. Names combine the current time with a random disambiguator,
//! so concurrent submissions never need to coordinate.

use std::path::Path;

use rand::Rng;

use crate::error::AppError;

/// Maximum number of attachments per submission
pub const MAX_UPLOAD_FILES: usize = 5;

/// One file part pulled out of the multipart body
#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub data: Vec<u8>,
}

/// Generate a unique storage name: `<millis>-<random>-<sanitized original>`.
///
/// Whitespace runs in the original name collapse to a single underscore;
/// an empty original name falls back to a bare `file` stem.
pub fn generate_filename(original_name: &str) -> String {
    let sanitized = sanitize_name(original_name);
    let millis = chrono::Utc::now().timestamp_millis();
    let disambiguator: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    format!("{millis}-{disambiguator}-{sanitized}")
}

fn sanitize_name(original_name: &str) -> String {
    // Strip any client-supplied directory components first.
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let mut out = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Write one uploaded file into `upload_dir`, returning the relative path
/// (`/uploads/<name>`) to persist alongside the complaint.
pub async fn store_file(upload_dir: &Path, file: &UploadedFile) -> Result<String, AppError> {
    let filename = generate_filename(&file.original_name);
    let path = upload_dir.join(&filename);
    tokio::fs::write(&path, &file.data).await?;

    tracing::debug!(
        original_name = %file.original_name,
        stored_as = %filename,
        size = file.data.len(),
        "Attachment stored"
    );

    Ok(format!("/uploads/{filename}"))
}
