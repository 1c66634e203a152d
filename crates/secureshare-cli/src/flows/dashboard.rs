//! Dashboard flow: the user's file list.
//!
//! A fresh upload is prepended from the server echo without refetching;
//! deletion removes server-side first, then locally.

use secureshare_api_client::{ApiClient, ApiResult};
use secureshare_core::models::{FileRecord, UploadResponse};

#[derive(Default)]
pub struct Dashboard {
    files: Vec<FileRecord>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub async fn refresh(&mut self, client: &ApiClient) -> ApiResult<()> {
        self.files = client.list_my_files().await?;
        Ok(())
    }

    /// Prepend the upload echo as a pending record, preserving the order of
    /// existing entries.
    pub fn apply_upload(&mut self, upload: UploadResponse) {
        self.files.insert(0, upload.into());
    }

    /// Delete on the server, then drop the local entry.
    pub async fn remove(&mut self, client: &ApiClient, id: &str) -> ApiResult<()> {
        client.delete_file(id).await?;
        self.files.retain(|file| file.id != id);
        Ok(())
    }
}
