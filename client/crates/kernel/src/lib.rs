//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by every
//! client crate:
//! - The unified request-failure taxonomy ([`error::kind::ErrorKind`])
//! - The unified error type and result alias ([`error::api_error::ApiError`])
//! - The cloneable error projection kept in session state
//!   ([`error::info::ErrorInfo`])
//!
//! **Design Principle**: failures are classified exactly once, at the HTTP
//! boundary, and consumed by typed matches everywhere else.

pub mod error {
    pub mod api_error;
    pub mod info;
    pub mod kind;
}
