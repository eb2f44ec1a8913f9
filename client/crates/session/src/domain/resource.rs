//! Resource Ownership Views
//!
//! The minimal shape of each guarded resource: an identifier plus the
//! owning user's id. Call sites that hold richer resource types project
//! into these before asking a guard.

use serde::{Deserialize, Serialize};

/// A post in the knowledge feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    /// Author of the post
    pub user_id: i64,
}

/// A chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    /// Author of the message
    pub user_id: i64,
}

/// A collaboration group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i64,
    /// Owner of the group (note: not `user_id` on the wire)
    pub owner_id: i64,
}

/// A discussion thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: i64,
    /// Author of the thread
    pub user_id: i64,
}
