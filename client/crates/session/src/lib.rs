//! Session - Client Session & Authorization Module
//!
//! Structure:
//! - `domain/` - User entity, resource ownership views, backend collaborator trait
//! - `application/` - Session manager state machine and authorization guards
//! - `infra/` - HTTP-backed collaborator implementation
//!
//! ## Features
//! - Optimistic session hydration from the persisted store, revalidated
//!   against the backend in the background
//! - Sign-in / sign-up / admin sign-up with error surfacing to the caller
//! - Best-effort sign-out (local session always ends)
//! - Role checks over both the scalar role field and the authorities
//!   collection
//! - Pure per-resource authorization guards (posts, messages, groups,
//!   threads)
//!
//! ## State Model
//! - `is_authenticated == true` implies a user is held
//! - The store holds at most one identity snapshot; it is overwritten,
//!   never merged
//! - Role checks treat an absent user as "no role", never panicking

pub mod application;
pub mod domain;
pub mod infra;


// Re-exports for convenience
pub use application::guards;
pub use application::manager::{SessionManager, SessionState};
pub use domain::api::{AuthApi, AuthPayload, Credentials, NewAccount, SessionCheckResponse};
pub use domain::resource::{Group, Message, Post, Thread};
pub use domain::user::{ROLE_ADMIN, ROLE_MODERATOR, User};
pub use infra::http::HttpAuthApi;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    api_error::{ApiError, ApiResult},
    info::ErrorInfo,
    kind::ErrorKind,
};
