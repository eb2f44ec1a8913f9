//! Request Pipeline - Outbound HTTP with cross-cutting interception
//!
//! Every backend call goes through [`ApiClient`]:
//! - before dispatch, the credential token is read from the session store
//!   and attached as a bearer header;
//! - after the response, failures are classified once into the
//!   [`ErrorKind`] taxonomy and logged; an expired-session status fires
//!   the redirect latch;
//! - the classified error is always delivered unchanged to the caller.
//!
//! Each call is attempted exactly once; there is no retry layer here.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use kernel::error::api_error::{ApiError, ApiResult};
use kernel::error::kind::ErrorKind;

use crate::latch::{DEFAULT_REDIRECT_WINDOW, RedirectCallback, RedirectLatch};
use crate::store::{AUTH_TOKEN_KEY, KeyValueStore};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,
    /// Debounce window for the expired-session redirect
    pub redirect_window: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            redirect_window: DEFAULT_REDIRECT_WINDOW,
        }
    }
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Error body shape returned by the backend
///
/// `errors` carries field-level validation messages on 4xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<BTreeMap<String, String>>,
}

/// Outbound HTTP client with the interceptor pipeline applied
///
/// Reads only [`AUTH_TOKEN_KEY`] from the store; it never writes
/// authentication keys. The redirect latch is owned here, constructed
/// with the callback injected.
pub struct ApiClient<S: KeyValueStore> {
    http: reqwest::Client,
    base_url: String,
    store: Arc<S>,
    latch: RedirectLatch,
}

impl<S: KeyValueStore> ApiClient<S> {
    /// Build a client over the given store and optional redirect callback
    pub fn new(config: HttpConfig, store: Arc<S>, redirect: Option<RedirectCallback>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::setup("Failed to build HTTP client").with_source(e))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            store,
            latch: RedirectLatch::new(redirect, config.redirect_window),
        })
    }

    /// The redirect latch (for diagnostics)
    pub fn latch(&self) -> &RedirectLatch {
        &self.latch
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.dispatch(self.request(Method::GET, path)).await?;
        self.decode(response).await
    }

    /// POST a JSON body, expecting a JSON response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .dispatch(self.request(Method::POST, path).json(body))
            .await?;
        self.decode(response).await
    }

    /// POST without a body, discarding the response payload
    pub async fn post_unit(&self, path: &str) -> ApiResult<()> {
        self.dispatch(self.request(Method::POST, path)).await?;
        Ok(())
    }

    /// Build a request with the credential header attached
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);

        if let Some(token) = self.store.get::<String>(AUTH_TOKEN_KEY) {
            req = req.bearer_auth(token);
        }

        req
    }

    /// Send a request and surface non-success responses as errors
    async fn dispatch(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => return Err(classify_send_failure(e)),
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        Err(self.fail(status.as_u16(), body))
    }

    /// Classify an error response, log it, and fire the latch if expired
    fn fail(&self, status: u16, body: ErrorBody) -> ApiError {
        let err = classify_error_response(status, body);

        if err.is_auth_expired() {
            tracing::warn!(status, "Expired-session response received");
            self.latch.trigger();
        } else {
            tracing::warn!(status, kind = %err.kind(), "Server responded with an error");
        }

        err
    }

    /// Decode a success response body
    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> ApiResult<T> {
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            tracing::warn!(status, error = %e, "Failed to decode response body");
            ApiError::server(status, "Invalid response body").with_source(e)
        })
    }
}

/// Classify a failure that produced no response
fn classify_send_failure(e: reqwest::Error) -> ApiError {
    if e.is_builder() {
        tracing::error!(error = %e, "Request could not be constructed");
        return ApiError::setup("Request could not be constructed").with_source(e);
    }

    tracing::warn!(error = %e, "No response received from server");
    ApiError::network("No response received from server").with_source(e)
}

/// Classify a non-success response into the error taxonomy
fn classify_error_response(status: u16, body: ErrorBody) -> ApiError {
    let has_field_errors = body.errors.as_ref().is_some_and(|m| !m.is_empty());
    let kind = ErrorKind::from_status(status, has_field_errors);

    let message = body
        .message
        .unwrap_or_else(|| kind.as_str().to_string());

    let mut err = ApiError::new(kind, message).with_status(status);
    if let Some(errors) = body.errors {
        err = err.with_details(errors);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client_with(
        store: Arc<MemoryStore>,
        redirect: Option<RedirectCallback>,
    ) -> ApiClient<MemoryStore> {
        ApiClient::new(HttpConfig::default(), store, redirect).unwrap()
    }

    fn body(message: Option<&str>, errors: &[(&str, &str)]) -> ErrorBody {
        ErrorBody {
            message: message.map(String::from),
            errors: if errors.is_empty() {
                None
            } else {
                Some(
                    errors
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                )
            },
        }
    }

    #[test]
    fn test_expired_statuses_classify_as_auth_expired() {
        let err = classify_error_response(401, body(None, &[]));
        assert_eq!(err.kind(), ErrorKind::AuthExpired);
        assert_eq!(err.status(), Some(401));

        let err = classify_error_response(403, body(Some("Forbidden"), &[]));
        assert_eq!(err.kind(), ErrorKind::AuthExpired);
        assert_eq!(err.message(), "Forbidden");
    }

    #[test]
    fn test_field_errors_classify_as_validation() {
        let err = classify_error_response(
            422,
            body(Some("Invalid account data"), &[("username", "Required")]),
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.details().unwrap().get("username").map(String::as_str),
            Some("Required")
        );
    }

    #[test]
    fn test_plain_failure_classifies_as_server() {
        let err = classify_error_response(500, body(None, &[]));
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(500));
        // Message falls back to the kind's phrase
        assert_eq!(err.message(), "Server Error");

        let err = classify_error_response(404, body(Some("Not found"), &[]));
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[test]
    fn test_empty_field_map_is_not_validation() {
        let mut b = body(Some("Bad request"), &[]);
        b.errors = Some(BTreeMap::new());
        let err = classify_error_response(400, b);
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[tokio::test]
    async fn test_request_attaches_bearer_token_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, "token-1");
        let client = client_with(store, None);

        let req = client
            .request(Method::GET, "/api/auth/session")
            .build()
            .unwrap();
        let header = req
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .expect("bearer header attached");
        assert_eq!(header.to_str().unwrap(), "Bearer token-1");
    }

    #[tokio::test]
    async fn test_request_without_token_has_no_auth_header() {
        let store = Arc::new(MemoryStore::new());
        let client = client_with(store, None);

        let req = client.request(Method::GET, "/api/posts").build().unwrap();
        assert!(req.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_expired_response_fires_latch_once_per_window() {
        let count = Arc::new(AtomicUsize::new(0));
        let cb_count = Arc::clone(&count);
        let client = client_with(
            Arc::new(MemoryStore::new()),
            Some(Arc::new(move || {
                cb_count.fetch_add(1, Ordering::SeqCst);
            })),
        );

        let err = client.fail(401, body(None, &[]));
        assert!(err.is_auth_expired());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // A burst of expired responses within the window redirects once
        client.fail(403, body(None, &[]));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_failures_never_fire_latch() {
        let count = Arc::new(AtomicUsize::new(0));
        let cb_count = Arc::clone(&count);
        let client = client_with(
            Arc::new(MemoryStore::new()),
            Some(Arc::new(move || {
                cb_count.fetch_add(1, Ordering::SeqCst);
            })),
        );

        client.fail(500, body(None, &[]));
        client.fail(422, body(None, &[("username", "Required")]));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!client.latch().is_armed());
    }
}
