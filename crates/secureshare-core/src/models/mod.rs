//! Wire models for the SecureShare backend API.
//!
//! Field names follow the backend's camelCase JSON. Everything here is
//! server-issued display data; none of it is consulted for authorization.

pub mod audit;
pub mod download;
pub mod file;
pub mod user;

pub use audit::{AuditAction, AuditLog};
pub use download::DownloadInfo;
pub use file::{FileRecord, FileStatus, UploadResponse};
pub use user::{AuthResponse, User};
