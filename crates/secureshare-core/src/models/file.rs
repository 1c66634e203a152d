use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a shared file as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Downloaded,
    Expired,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Pending => "pending",
            FileStatus::Downloaded => "downloaded",
            FileStatus::Expired => "expired",
        }
    }
}

/// One entry of GET /files/my-files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub filename: String,
    pub size: i64,
    pub upload_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub status: FileStatus,
    pub download_link: String,
    pub recipient_email: String,
    pub download_count: i64,
}

/// Server echo after POST /files/upload. The dashboard turns this into a
/// pending `FileRecord` and prepends it without refetching the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: String,
    pub filename: String,
    pub size: i64,
    pub upload_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub download_link: String,
    pub recipient_email: String,
}

impl From<UploadResponse> for FileRecord {
    fn from(upload: UploadResponse) -> Self {
        FileRecord {
            id: upload.id,
            filename: upload.filename,
            size: upload.size,
            upload_date: upload.upload_date,
            expiry_date: upload.expiry_date,
            status: FileStatus::Pending,
            download_link: upload.download_link,
            recipient_email: upload.recipient_email,
            download_count: 0,
        }
    }
}
