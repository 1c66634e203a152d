//! Download page flow.
//!
//! State machine per link: `Loading -> { Unavailable | Ready }` on fetch;
//! `Ready -> Verifying -> { Consumed | back to Ready }` on an OTP attempt.
//! The OTP is verified before the binary download is requested, never the
//! other way around. The countdown is display-only; the server stays
//! authoritative for expiry.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use secureshare_api_client::{ApiClient, ApiError};
use secureshare_core::models::DownloadInfo;

pub const MSG_NOT_FOUND: &str = "File not found or link has expired";
pub const MSG_ALREADY_USED: &str = "This download link has already been used";
pub const MSG_GONE: &str = "This download link has expired or already been used";
pub const MSG_LOAD_FAILED: &str = "Unable to load file information";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading,
    /// Terminal: no OTP entry is offered.
    Unavailable { message: String },
    Ready,
    Verifying,
    /// The single-use link was consumed by a successful download.
    Consumed,
}

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error("please enter the OTP")]
    OtpRequired,

    #[error("invalid OTP, check your email and try again")]
    InvalidOtp,

    #[error("this download link has expired or already been used")]
    Gone,

    #[error("the page is not ready for an OTP attempt")]
    NotReady,

    #[error("download failed: {0}")]
    Api(#[from] ApiError),
}

/// File content handed back after a successful verify + download.
#[derive(Debug)]
pub struct DownloadedFile {
    pub filename: String,
    pub bytes: bytes::Bytes,
}

pub struct DownloadPage {
    uuid: Uuid,
    state: PageState,
    info: Option<DownloadInfo>,
    /// Kept across a rejected attempt; cleared only by the caller.
    pub otp_input: String,
}

impl DownloadPage {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            state: PageState::Loading,
            info: None,
            otp_input: String::new(),
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn info(&self) -> Option<&DownloadInfo> {
        self.info.as_ref()
    }

    /// Fetch link metadata. 404 and 410 map to distinct terminal messages;
    /// anything else unexpected is a generic load failure.
    pub async fn fetch(&mut self, client: &ApiClient) -> &PageState {
        match client.get_download_info(self.uuid).await {
            Ok(info) => {
                self.info = Some(info);
                self.state = PageState::Ready;
            }
            Err(err) if err.is_not_found() => {
                self.state = PageState::Unavailable {
                    message: MSG_NOT_FOUND.to_string(),
                };
            }
            Err(err) if err.is_gone() => {
                self.state = PageState::Unavailable {
                    message: MSG_ALREADY_USED.to_string(),
                };
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch download info");
                self.state = PageState::Unavailable {
                    message: MSG_LOAD_FAILED.to_string(),
                };
            }
        }
        &self.state
    }

    /// Whether the link reads as expired at `now`: the server's verdict at
    /// fetch time, or the countdown having reached zero since.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match &self.info {
            Some(info) => info.is_expired || now >= info.expiry_date,
            None => false,
        }
    }

    /// OTP entry is offered only on a ready, unexpired page.
    pub fn can_enter_otp(&self, now: DateTime<Utc>) -> bool {
        self.state == PageState::Ready && !self.is_expired_at(now)
    }

    /// Remaining time until expiry, clamped at zero.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.info
            .as_ref()
            .map(|info| (info.expiry_date - now).max(Duration::zero()))
    }

    /// One OTP attempt: verify first, download only on acceptance.
    ///
    /// 400 returns the page to `Ready` with the input preserved; 410 ends
    /// in `Unavailable`; success ends in `Consumed` and yields the bytes
    /// under the original filename.
    pub async fn submit_otp(&mut self, client: &ApiClient) -> Result<DownloadedFile, OtpError> {
        if self.state != PageState::Ready {
            return Err(OtpError::NotReady);
        }
        if self.otp_input.trim().is_empty() {
            return Err(OtpError::OtpRequired);
        }

        self.state = PageState::Verifying;
        if let Err(err) = client.verify_otp(self.uuid, &self.otp_input).await {
            return Err(self.fail_attempt(err));
        }

        let bytes = match client.download_file(self.uuid, &self.otp_input).await {
            Ok(bytes) => bytes,
            Err(err) => return Err(self.fail_attempt(err)),
        };

        self.state = PageState::Consumed;
        let filename = self
            .info
            .as_ref()
            .map(|info| info.filename.clone())
            .unwrap_or_else(|| "download".to_string());
        Ok(DownloadedFile { filename, bytes })
    }

    fn fail_attempt(&mut self, err: ApiError) -> OtpError {
        if err.is_bad_request() {
            self.state = PageState::Ready;
            OtpError::InvalidOtp
        } else if err.is_gone() {
            self.state = PageState::Unavailable {
                message: MSG_GONE.to_string(),
            };
            OtpError::Gone
        } else {
            self.state = PageState::Ready;
            OtpError::Api(err)
        }
    }
}

/// Countdown display: "{h}h {m}m {s}s" with hours wrapped within a day,
/// matching the product's timer; zero renders as "Expired".
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds();
    if total <= 0 {
        return "Expired".to_string();
    }
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}
