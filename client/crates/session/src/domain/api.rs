//! Backend Collaborator Contract
//!
//! The endpoints the session manager talks to, expressed as a trait so
//! the state machine can be exercised against a scripted double. The
//! HTTP implementation lives in the infrastructure layer.

use serde::{Deserialize, Serialize};

use kernel::error::api_error::ApiResult;

use super::user::User;

/// Sign-in input. Input-only; never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Account-creation input
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Session-check response
///
/// `success` without a `data` payload is a bare confirmation; the manager
/// decides what to do with it (see the refresh state machine).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCheckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<User>,
}

/// Successful sign-in / sign-up payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// Credential token for subsequent calls
    pub token: String,
    pub user: User,
}

/// Backend collaborator trait
#[trait_variant::make(AuthApi: Send)]
pub trait LocalAuthApi {
    /// Verify the current session against the backend
    async fn check_session(&self) -> ApiResult<SessionCheckResponse>;

    /// Authenticate and obtain a fresh identity + token
    async fn sign_in(&self, credentials: &Credentials) -> ApiResult<AuthPayload>;

    /// Create an account and sign in
    async fn sign_up(&self, account: &NewAccount) -> ApiResult<AuthPayload>;

    /// Create a privileged account; authorization is enforced server-side
    async fn sign_up_admin(&self, account: &NewAccount) -> ApiResult<AuthPayload>;

    /// Invalidate the server-side session
    async fn sign_out(&self) -> ApiResult<()>;
}
