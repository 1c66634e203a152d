//! HTTP client for the SecureShare backend.
//!
//! Provides a single configured client with two cross-cutting behaviors:
//! a cached bearer token is attached to every outgoing request, and any 401
//! response tears the session down and fires the forced-logout hook before
//! the error propagates. Domain methods (auth, files, download, audit) live
//! in `api`; each is exactly one HTTP call with no retries or caching.

pub mod api;
pub mod error;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use secureshare_core::{ClientConfig, SessionHandle};

pub use api::FileUpload;
pub use error::{ApiError, ApiResult};

/// Invoked after a 401 has torn down a live session. The CLI's counterpart
/// of the browser redirect to the login page.
pub type ForcedLogoutHook = Arc<dyn Fn() + Send + Sync>;

/// HTTP client for the SecureShare API.
///
/// This is the only component that mutates the session as a side effect of
/// a data call; the hook is composed at construction so the behavior is
/// part of the client's contract rather than ambient state.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionHandle,
    on_forced_logout: Option<ForcedLogoutHook>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionHandle) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            on_forced_logout: None,
        })
    }

    /// Attach the forced-logout hook. At most one; later calls replace it.
    pub fn with_forced_logout_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_forced_logout = Some(Arc::new(hook));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer <token>` when a token is cached;
    /// otherwise the request goes out unauthenticated.
    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Send one request and run the response middleware.
    ///
    /// Any 401, regardless of endpoint, clears the cached session; the
    /// forced-logout hook fires only for the call that actually removed a
    /// live session, so concurrent 401s trigger it exactly once. The error
    /// still propagates to the caller afterwards.
    async fn dispatch(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = self.apply_auth(request).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.force_logout();
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    fn force_logout(&self) {
        if self.session.clear() {
            tracing::info!("session rejected by server, forcing logout");
            if let Some(hook) = &self.on_forced_logout {
                hook();
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// GET and deserialize a JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.dispatch(self.client.get(self.build_url(path))).await?;
        Self::decode(response).await
    }

    /// GET where only the status matters; any success body is discarded.
    pub(crate) async fn get_unit(&self, path: &str) -> ApiResult<()> {
        self.dispatch(self.client.get(self.build_url(path))).await?;
        Ok(())
    }

    /// POST a JSON body and deserialize the response.
    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self
            .dispatch(self.client.post(self.build_url(path)).json(body))
            .await?;
        Self::decode(response).await
    }

    /// POST a JSON body, discarding whatever success body comes back.
    pub(crate) async fn post_unit<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<()> {
        self.dispatch(self.client.post(self.build_url(path)).json(body))
            .await?;
        Ok(())
    }

    /// POST a multipart form and deserialize the response.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<T> {
        let response = self
            .dispatch(self.client.post(self.build_url(path)).multipart(form))
            .await?;
        Self::decode(response).await
    }

    /// POST a JSON body and return the raw response bytes. Used for the
    /// binary download endpoint; the body is never text-decoded.
    pub(crate) async fn post_bytes<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<Bytes> {
        let response = self
            .dispatch(self.client.post(self.build_url(path)).json(body))
            .await?;
        Ok(response.bytes().await?)
    }

    /// DELETE, accepting any success status (200/204).
    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        self.dispatch(self.client.delete(self.build_url(path)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secureshare_core::{MemorySessionStorage, StoredSession};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_client(server_url: &str) -> ApiClient {
        let config = ClientConfig {
            base_url: server_url.to_string(),
            ..ClientConfig::default()
        };
        let session = SessionHandle::new(Arc::new(MemorySessionStorage::new()));
        session.initialize();
        ApiClient::new(&config, session).unwrap()
    }

    fn establish(client: &ApiClient, token: &str) {
        client
            .session()
            .establish(StoredSession {
                token: token.to_string(),
                user: secureshare_core::models::User {
                    id: "u1".to_string(),
                    email: "user@example.com".to_string(),
                    name: None,
                },
            })
            .unwrap();
    }

    #[tokio::test]
    async fn bearer_token_attached_when_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/verify")
            .match_header("authorization", "Bearer tok-1")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = test_client(&server.url());
        establish(&client, "tok-1");

        client.get::<serde_json::Value>("/auth/verify").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn no_auth_header_when_anonymous() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/verify")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = test_client(&server.url());
        client.get::<serde_json::Value>("/auth/verify").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_clears_session_and_fires_hook_once() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/files/my-files")
            .with_status(401)
            .with_body("token expired")
            .expect_at_least(2)
            .create_async()
            .await;

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let client = test_client(&server.url())
            .with_forced_logout_hook(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        establish(&client, "stale-token");

        // Two in-flight requests both see 401; only one tears down.
        let (a, b) = tokio::join!(
            client.get::<Vec<serde_json::Value>>("/files/my-files"),
            client.get::<Vec<serde_json::Value>>("/files/my-files"),
        );
        assert!(a.unwrap_err().is_unauthorized());
        assert!(b.unwrap_err().is_unauthorized());

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!client.session().is_authenticated());
        assert!(client.session().token().is_none());
    }

    #[tokio::test]
    async fn unauthorized_while_anonymous_does_not_fire_hook() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body("bad credentials")
            .create_async()
            .await;

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let client = test_client(&server.url())
            .with_forced_logout_hook(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let err = client
            .post_json::<serde_json::Value, _>(
                "/auth/login",
                &serde_json::json!({"email": "a@b.com", "password": "nope"}),
            )
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(fired.load(Ordering::SeqCst), 0, "no live session was torn down");
    }

    #[tokio::test]
    async fn non_success_carries_body_as_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/download/abc/info")
            .with_status(404)
            .with_body("no such link")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .get::<serde_json::Value>("/download/abc/info")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("no such link"));
    }
}
