//! HTTP-backed Collaborator
//!
//! [`AuthApi`] over the platform request pipeline. Pure pass-through:
//! token attachment, failure classification, and the expired-session
//! redirect all happen in the pipeline.

use std::sync::Arc;

use kernel::error::api_error::ApiResult;
use platform::http::ApiClient;
use platform::store::KeyValueStore;

use crate::domain::api::{AuthApi, AuthPayload, Credentials, NewAccount, SessionCheckResponse};

/// Backend endpoints
const SESSION_PATH: &str = "/api/auth/session";
const SIGN_IN_PATH: &str = "/api/auth/signin";
const SIGN_UP_PATH: &str = "/api/auth/signup";
const SIGN_UP_ADMIN_PATH: &str = "/api/auth/signup/admin";
const SIGN_OUT_PATH: &str = "/api/auth/signout";

/// HTTP implementation of [`AuthApi`]
pub struct HttpAuthApi<S: KeyValueStore> {
    client: Arc<ApiClient<S>>,
}

impl<S: KeyValueStore> HttpAuthApi<S> {
    pub fn new(client: Arc<ApiClient<S>>) -> Self {
        Self { client }
    }
}

impl<S: KeyValueStore> AuthApi for HttpAuthApi<S> {
    async fn check_session(&self) -> ApiResult<SessionCheckResponse> {
        self.client.get(SESSION_PATH).await
    }

    async fn sign_in(&self, credentials: &Credentials) -> ApiResult<AuthPayload> {
        self.client.post(SIGN_IN_PATH, credentials).await
    }

    async fn sign_up(&self, account: &NewAccount) -> ApiResult<AuthPayload> {
        self.client.post(SIGN_UP_PATH, account).await
    }

    async fn sign_up_admin(&self, account: &NewAccount) -> ApiResult<AuthPayload> {
        self.client.post(SIGN_UP_ADMIN_PATH, account).await
    }

    async fn sign_out(&self) -> ApiResult<()> {
        self.client.post_unit(SIGN_OUT_PATH).await
    }
}
