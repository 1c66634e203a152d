//! Domain methods for the SecureShare API client.
//!
//! Thin parameter-binding wrappers over the generic verbs: each method is
//! one HTTP call translated 1:1 from its inputs. Response types come from
//! `secureshare_core::models`.

use bytes::Bytes;
use serde_json::json;
use uuid::Uuid;

use secureshare_core::models::{AuditLog, AuthResponse, DownloadInfo, FileRecord, UploadResponse};
use secureshare_core::StoredSession;

use crate::error::ApiResult;
use crate::ApiClient;

/// A file staged for upload together with its recipient contact fields.
/// At least one of email/phone must be non-empty; the upload form enforces
/// this before any network call, the backend enforces it again.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub recipient_email: String,
    pub recipient_phone: String,
}

impl ApiClient {
    /// POST /auth/login. On success the session (token + profile) is
    /// persisted and the handle transitions to authenticated; on any
    /// failure the session is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let auth: AuthResponse = self
            .post_json("/auth/login", &json!({ "email": email, "password": password }))
            .await?;
        self.session().establish(StoredSession {
            token: auth.token.clone(),
            user: auth.user.clone(),
        })?;
        Ok(auth)
    }

    /// POST /auth/register. Same contract as `login`; a successful
    /// registration authenticates immediately, with no confirmation step.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let auth: AuthResponse = self
            .post_json(
                "/auth/register",
                &json!({ "name": name, "email": email, "password": password }),
            )
            .await?;
        self.session().establish(StoredSession {
            token: auth.token.clone(),
            user: auth.user.clone(),
        })?;
        Ok(auth)
    }

    /// GET /auth/verify. Only the status matters; the success body (if
    /// any) is discarded. A 401 goes through the forced-logout path like
    /// any other call.
    pub async fn verify_token(&self) -> ApiResult<()> {
        self.get_unit("/auth/verify").await
    }

    /// POST /files/upload as multipart: the file part under its original
    /// filename plus the recipient text fields.
    pub async fn upload(&self, upload: FileUpload) -> ApiResult<UploadResponse> {
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.filename),
            )
            .text("recipientEmail", upload.recipient_email)
            .text("recipientPhone", upload.recipient_phone);

        self.post_multipart("/files/upload", form).await
    }

    /// GET /files/my-files.
    pub async fn list_my_files(&self) -> ApiResult<Vec<FileRecord>> {
        self.get("/files/my-files").await
    }

    /// DELETE /files/{id}.
    pub async fn delete_file(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/files/{}", id)).await
    }

    /// GET /download/{uuid}/info. Works unauthenticated; recipients are
    /// not users. 404 means unknown or expired, 410 already consumed.
    pub async fn get_download_info(&self, uuid: Uuid) -> ApiResult<DownloadInfo> {
        self.get(&format!("/download/{}/info", uuid)).await
    }

    /// POST /download/{uuid}/verify. 200 accepted, 400 wrong OTP, 410 gone.
    pub async fn verify_otp(&self, uuid: Uuid, otp: &str) -> ApiResult<()> {
        self.post_unit(&format!("/download/{}/verify", uuid), &json!({ "otp": otp }))
            .await
    }

    /// POST /download/{uuid}. Returns the raw file bytes; never decoded as
    /// text. Callers must have verified the OTP first.
    pub async fn download_file(&self, uuid: Uuid, otp: &str) -> ApiResult<Bytes> {
        self.post_bytes(&format!("/download/{}", uuid), &json!({ "otp": otp }))
            .await
    }

    /// GET /audit/logs.
    pub async fn get_audit_logs(&self) -> ApiResult<Vec<AuditLog>> {
        self.get("/audit/logs").await
    }
}
