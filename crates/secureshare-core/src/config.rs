//! Configuration module
//!
//! Client configuration is environment-driven: backend URL, request timeout,
//! upload size ceiling, and the session file location.

use std::env;
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024; // 100 MiB
const SESSION_FILE_NAME: &str = "session.json";

/// Client configuration shared by the api-client and CLI.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Selection-time ceiling for uploads. Rejected client-side before any
    /// network call; the server enforces its own limit regardless.
    pub max_upload_bytes: u64,
    /// Durable location of the cached session (token + profile).
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Build configuration from the environment:
    /// SECURESHARE_API_URL, SECURESHARE_TIMEOUT_SECS,
    /// SECURESHARE_MAX_UPLOAD_BYTES, SECURESHARE_SESSION_FILE.
    /// Every variable has a default; this never fails on absent ones.
    pub fn from_env() -> Self {
        let base_url = env::var("SECURESHARE_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = env::var("SECURESHARE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_upload_bytes = env::var("SECURESHARE_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let session_file = env::var("SECURESHARE_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        Self {
            base_url,
            timeout_secs,
            max_upload_bytes,
            session_file,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_file: default_session_file(),
        }
    }
}

/// `~/.config/secureshare/session.json`, falling back to the current
/// directory when no config dir can be resolved.
fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("secureshare")
        .join(SESSION_FILE_NAME)
}
