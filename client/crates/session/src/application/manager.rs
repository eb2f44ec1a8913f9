//! Session Manager
//!
//! Owns the in-memory session state and orchestrates sign-in, sign-up,
//! sign-out, and background verification against the backend. Sole writer
//! of the authentication keys in the persisted store.
//!
//! Concurrency: the state lock is never held across an `.await`, so
//! session mutations apply strictly in the order their triggering call
//! resolves. Two concurrent `refresh()` calls may therefore resolve out
//! of order and the last one to resolve wins; this is intentional and
//! pinned by a test rather than hidden behind extra synchronization.

use std::sync::{Arc, RwLock};

use kernel::error::api_error::ApiError;
use kernel::error::info::ErrorInfo;
use platform::store::{AUTH_TOKEN_KEY, AUTH_USER_KEY, KeyValueStore};

use crate::application::guards;
use crate::domain::api::{AuthApi, AuthPayload, Credentials, NewAccount};
use crate::domain::resource::{Group, Message, Post, Thread};
use crate::domain::user::User;

/// The client's current belief about the authenticated identity
///
/// Invariant: `is_authenticated` implies `user` is held.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// True from construction until the initial verification settles
    pub loading: bool,
    /// Last recorded failure, for the UI layer to render
    pub error: Option<ErrorInfo>,
}

/// Session lifecycle state machine
///
/// Collaborators are injected; call sites receive a manager handle
/// instead of reaching into a global.
pub struct SessionManager<A, S>
where
    A: AuthApi,
    S: KeyValueStore,
{
    api: Arc<A>,
    store: Arc<S>,
    state: Arc<RwLock<SessionState>>,
}

impl<A, S> Clone for SessionManager<A, S>
where
    A: AuthApi,
    S: KeyValueStore,
{
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A, S> SessionManager<A, S>
where
    A: AuthApi,
    S: KeyValueStore,
{
    pub fn new(api: Arc<A>, store: Arc<S>) -> Self {
        Self {
            api,
            store,
            state: Arc::new(RwLock::new(SessionState {
                loading: true,
                ..SessionState::default()
            })),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Hydrate from the store, then revalidate against the backend
    ///
    /// A cached identity is trusted optimistically so the UI can render
    /// immediately; `refresh()` corrects the record once it settles.
    /// `loading` drops to false regardless of the verification outcome.
    pub async fn init(&self) {
        if let Some(user) = self.store.get::<User>(AUTH_USER_KEY) {
            tracing::debug!(user_id = user.id, "Hydrated session from store");
            let mut state = self.write();
            state.user = Some(user);
            state.is_authenticated = true;
        }

        self.refresh().await;
        self.write().loading = false;
    }

    /// Verify the session against the backend
    ///
    /// Never raises; every failure mode degrades to a boolean plus state
    /// cleanup:
    /// - a fresh user payload overwrites state and store;
    /// - a bare success with no payload keeps the current state when a
    ///   user is already held (trust the cache);
    /// - a negative response clears everything unless a user is held, in
    ///   which case the current answer stands;
    /// - an expired-session error clears state and store;
    /// - any other error trusts local state.
    pub async fn refresh(&self) -> bool {
        match self.api.check_session().await {
            Ok(response) => {
                if let Some(user) = response.data {
                    tracing::debug!(user_id = user.id, "Session verified with fresh payload");
                    self.store.set(AUTH_USER_KEY, &user);
                    let mut state = self.write();
                    state.user = Some(user);
                    state.is_authenticated = true;
                    return true;
                }

                let (held, current) = {
                    let state = self.read();
                    (state.user.is_some(), state.is_authenticated)
                };

                if !held {
                    self.clear_session();
                    return false;
                }

                if response.success {
                    // Trust-the-cache: a bare confirmation retains state
                    return true;
                }

                // Negative signal but a user is held: optimistic retain
                current
            }
            Err(e) if e.is_auth_expired() => {
                tracing::info!(status = e.status(), "Session rejected by backend, clearing");
                self.clear_session();
                false
            }
            Err(e) => {
                let held = self.read().user.is_some();
                tracing::warn!(error = %e, held, "Session check failed, trusting local state");
                held
            }
        }
    }

    /// Authenticate and establish a fresh session
    ///
    /// On failure the error is recorded in session state and re-raised;
    /// presentation is the caller's concern.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<User, ApiError> {
        match self.api.sign_in(credentials).await {
            Ok(payload) => Ok(self.establish(payload, "User signed in")),
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Create an account and establish a session; same contract as sign-in
    pub async fn sign_up(&self, account: &NewAccount) -> Result<User, ApiError> {
        match self.api.sign_up(account).await {
            Ok(payload) => Ok(self.establish(payload, "Account created")),
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Create a privileged account
    ///
    /// Requires an already-valid session; the backend enforces this, the
    /// client only forwards the call and surfaces failures.
    pub async fn sign_up_admin(&self, account: &NewAccount) -> Result<User, ApiError> {
        match self.api.sign_up_admin(account).await {
            Ok(payload) => Ok(self.establish(payload, "Privileged account created")),
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// End the session
    ///
    /// The backend call is best effort: a failure is logged, never
    /// propagated. Local state and store are cleared unconditionally, so
    /// the client always ends its session even when the server call
    /// cannot complete.
    pub async fn sign_out(&self) {
        if let Err(e) = self.api.sign_out().await {
            tracing::warn!(error = %e, "Backend sign-out failed, clearing local session anyway");
        }

        self.clear_session();
        self.write().error = None;
        tracing::info!("User signed out");
    }

    // ========================================================================
    // Reads - always from the current snapshot, never cached
    // ========================================================================

    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<ErrorInfo> {
        self.read().error.clone()
    }

    pub fn has_role(&self, role: &str) -> bool {
        guards::has_role(self.read().user.as_ref(), role)
    }

    pub fn is_admin(&self) -> bool {
        guards::is_admin(self.read().user.as_ref())
    }

    pub fn is_moderator(&self) -> bool {
        guards::is_moderator(self.read().user.as_ref())
    }

    // ========================================================================
    // Resource guards over the current snapshot
    // ========================================================================

    pub fn can_edit_post(&self, post: &Post) -> bool {
        guards::can_edit_post(self.read().user.as_ref(), post)
    }

    pub fn can_delete_post(&self, post: &Post) -> bool {
        guards::can_delete_post(self.read().user.as_ref(), post)
    }

    pub fn can_delete_message(&self, message: &Message) -> bool {
        guards::can_delete_message(self.read().user.as_ref(), message)
    }

    pub fn can_create_group(&self) -> bool {
        guards::can_create_group(self.read().user.as_ref())
    }

    pub fn can_edit_group(&self, group: &Group) -> bool {
        guards::can_edit_group(self.read().user.as_ref(), group)
    }

    pub fn can_delete_group(&self, group: &Group) -> bool {
        guards::can_delete_group(self.read().user.as_ref(), group)
    }

    pub fn can_create_thread(&self) -> bool {
        guards::can_create_thread(self.read().user.as_ref())
    }

    pub fn can_edit_thread(&self, thread: &Thread) -> bool {
        guards::can_edit_thread(self.read().user.as_ref(), thread)
    }

    pub fn can_delete_thread(&self, thread: &Thread) -> bool {
        guards::can_delete_thread(self.read().user.as_ref(), thread)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Overwrite session and store from a fresh payload
    fn establish(&self, payload: AuthPayload, event: &'static str) -> User {
        let AuthPayload { token, user } = payload;

        self.store.set(AUTH_TOKEN_KEY, &token);
        self.store.set(AUTH_USER_KEY, &user);

        {
            let mut state = self.write();
            state.user = Some(user.clone());
            state.is_authenticated = true;
            state.error = None;
        }

        tracing::info!(user_id = user.id, "{}", event);
        user
    }

    /// Clear local state and wipe the store
    fn clear_session(&self) {
        self.store.clear();
        let mut state = self.write();
        state.user = None;
        state.is_authenticated = false;
    }

    fn record_error(&self, e: &ApiError) {
        tracing::debug!(kind = %e.kind(), "Recording session error");
        self.write().error = Some(e.to_info());
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().expect("session state lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().expect("session state lock poisoned")
    }
}
