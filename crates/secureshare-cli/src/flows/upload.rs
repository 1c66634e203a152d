//! Upload form flow.
//!
//! Preconditions enforced before any network call: exactly one selected
//! file (an oversize file never becomes the selection) and at least one
//! recipient contact field. On success every field resets; on failure the
//! form stays intact so the user can retry without re-selecting.

use secureshare_api_client::{ApiClient, ApiError, FileUpload};
use secureshare_core::models::UploadResponse;

#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("file is too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("please select a file to upload")]
    NoFileSelected,

    #[error("please provide a recipient email or phone number")]
    NoRecipient,

    #[error("an upload is already in progress")]
    SubmissionInFlight,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("failed to upload file: {0}")]
    Api(#[from] ApiError),
}

pub struct UploadForm {
    max_bytes: u64,
    file: Option<SelectedFile>,
    pub recipient_email: String,
    pub recipient_phone: String,
    in_flight: bool,
}

impl UploadForm {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            file: None,
            recipient_email: String::new(),
            recipient_phone: String::new(),
            in_flight: false,
        }
    }

    /// Single-file selection. An oversize file is rejected outright and the
    /// previous selection (if any) stays in place; an accepted file
    /// replaces it.
    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<(), FormError> {
        let size = bytes.len() as u64;
        if size > self.max_bytes {
            return Err(FormError::FileTooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        self.file = Some(SelectedFile {
            name: name.into(),
            bytes,
        });
        Ok(())
    }

    pub fn remove_file(&mut self) {
        self.file = None;
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Submission preconditions; violations mean no network call is made.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.file.is_none() {
            return Err(FormError::NoFileSelected);
        }
        if self.recipient_email.is_empty() && self.recipient_phone.is_empty() {
            return Err(FormError::NoRecipient);
        }
        Ok(())
    }

    /// One upload attempt. A submit while a request is in flight is not
    /// dispatched (no queuing). Success resets the form and hands back the
    /// server echo for the dashboard to prepend; failure leaves the form
    /// intact.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<UploadResponse, SubmitError> {
        if self.in_flight {
            return Err(FormError::SubmissionInFlight.into());
        }
        self.validate()?;

        // validate() guarantees the selection is present
        let file = match self.file.as_ref() {
            Some(file) => file.clone(),
            None => return Err(FormError::NoFileSelected.into()),
        };

        self.in_flight = true;
        let result = client
            .upload(FileUpload {
                filename: file.name,
                bytes: file.bytes,
                recipient_email: self.recipient_email.clone(),
                recipient_phone: self.recipient_phone.clone(),
            })
            .await;
        self.in_flight = false;

        match result {
            Ok(response) => {
                self.file = None;
                self.recipient_email.clear();
                self.recipient_phone.clear();
                Ok(response)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secureshare_core::{ClientConfig, MemorySessionStorage, SessionHandle};
    use std::sync::Arc;

    const LIMIT: u64 = 100 * 1024 * 1024;

    fn test_client(server_url: &str) -> ApiClient {
        let config = ClientConfig {
            base_url: server_url.to_string(),
            ..ClientConfig::default()
        };
        let session = SessionHandle::new(Arc::new(MemorySessionStorage::new()));
        session.initialize();
        ApiClient::new(&config, session).unwrap()
    }

    fn upload_echo() -> String {
        serde_json::json!({
            "id": "f1",
            "filename": "a.pdf",
            "size": 3,
            "uploadDate": "2026-08-01T10:00:00Z",
            "expiryDate": "2026-08-02T10:00:00Z",
            "downloadLink": "https://share.example/download/abc",
            "recipientEmail": "a@b.com"
        })
        .to_string()
    }

    #[test]
    fn oversize_file_never_becomes_selected() {
        let mut form = UploadForm::new(8);
        let err = form.select_file("big.bin", vec![0u8; 9]).unwrap_err();
        assert!(matches!(err, FormError::FileTooLarge { size: 9, limit: 8 }));
        assert!(form.selected_file().is_none());

        // an oversize selection does not clobber an existing valid one
        form.select_file("ok.bin", vec![0u8; 4]).unwrap();
        assert!(form.select_file("big.bin", vec![0u8; 9]).is_err());
        assert_eq!(form.selected_file().unwrap().name, "ok.bin");
    }

    #[test]
    fn validate_requires_file_and_one_recipient_field() {
        let mut form = UploadForm::new(LIMIT);
        assert_eq!(form.validate().unwrap_err(), FormError::NoFileSelected);

        form.select_file("a.pdf", b"pdf".to_vec()).unwrap();
        assert_eq!(form.validate().unwrap_err(), FormError::NoRecipient);

        form.recipient_phone = "+1234567890".to_string();
        assert!(form.validate().is_ok());

        form.recipient_email = "a@b.com".to_string();
        assert!(form.validate().is_ok(), "both fields filled is fine");
    }

    #[tokio::test]
    async fn invalid_form_makes_no_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/files/upload")
            .expect(0)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let mut form = UploadForm::new(LIMIT);
        assert!(form.submit(&client).await.is_err());

        form.select_file("a.pdf", b"pdf".to_vec()).unwrap();
        assert!(form.submit(&client).await.is_err());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn in_flight_submit_is_not_dispatched() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/files/upload")
            .expect(0)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let mut form = UploadForm::new(LIMIT);
        form.select_file("a.pdf", b"pdf".to_vec()).unwrap();
        form.recipient_email = "a@b.com".to_string();
        form.in_flight = true;

        let err = form.submit(&client).await.unwrap_err();
        assert!(matches!(err, SubmitError::Form(FormError::SubmissionInFlight)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn success_resets_every_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/files/upload")
            .with_status(200)
            .with_body(upload_echo())
            .create_async()
            .await;

        let client = test_client(&server.url());
        let mut form = UploadForm::new(LIMIT);
        form.select_file("a.pdf", b"pdf".to_vec()).unwrap();
        form.recipient_email = "a@b.com".to_string();

        let response = form.submit(&client).await.unwrap();
        assert_eq!(response.id, "f1");
        assert!(form.selected_file().is_none());
        assert!(form.recipient_email.is_empty());
        assert!(form.recipient_phone.is_empty());
        assert!(!form.is_in_flight());
    }

    #[tokio::test]
    async fn failure_keeps_form_intact_for_retry() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/files/upload")
            .with_status(500)
            .with_body("storage unavailable")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let mut form = UploadForm::new(LIMIT);
        form.select_file("a.pdf", b"pdf".to_vec()).unwrap();
        form.recipient_email = "a@b.com".to_string();

        assert!(form.submit(&client).await.is_err());
        assert_eq!(form.selected_file().unwrap().name, "a.pdf");
        assert_eq!(form.recipient_email, "a@b.com");
        assert!(!form.is_in_flight(), "form is re-enterable after failure");
    }
}
