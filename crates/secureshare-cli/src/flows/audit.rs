//! Audit log viewer flow.
//!
//! The log list is fetched once; filtering is a pure client-side substring
//! match over the already-fetched entries, re-applied per term.

use secureshare_api_client::{ApiClient, ApiResult};
use secureshare_core::models::AuditLog;

#[derive(Default)]
pub struct AuditView {
    logs: Vec<AuditLog>,
}

impl AuditView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self) -> &[AuditLog] {
        &self.logs
    }

    pub async fn refresh(&mut self, client: &ApiClient) -> ApiResult<()> {
        self.logs = client.get_audit_logs().await?;
        Ok(())
    }

    /// Case-insensitive match over filename, recipient email, and action;
    /// IP addresses match verbatim. An empty term matches everything.
    pub fn filtered(&self, term: &str) -> Vec<&AuditLog> {
        let needle = term.to_lowercase();
        self.logs
            .iter()
            .filter(|log| {
                log.filename.to_lowercase().contains(&needle)
                    || log.recipient_email.to_lowercase().contains(&needle)
                    || log.ip_address.contains(term)
                    || log.action.as_str().contains(&needle)
            })
            .collect()
    }
}
