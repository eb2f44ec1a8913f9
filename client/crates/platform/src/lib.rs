//! Platform - Client Infrastructure
//!
//! Cross-cutting infrastructure shared by the client crates:
//! - `store` - persisted key-value cache (the session store)
//! - `latch` - one-shot debounced redirect gate
//! - `http` - outbound request pipeline (token attachment, failure
//!   classification, expired-session redirect)
//!
//! Nothing in this crate knows about users, roles, or sessions; it only
//! moves bytes and classifies failures.

pub mod http;
pub mod latch;
pub mod store;
