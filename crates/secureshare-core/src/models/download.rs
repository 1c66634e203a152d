use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata shown on the download page, from GET /download/{uuid}/info.
///
/// `is_expired` is the server's verdict at fetch time; the client-side
/// countdown only updates the display between server calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfo {
    pub filename: String,
    pub size: i64,
    pub upload_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub uploader_email: String,
    pub is_expired: bool,
}
