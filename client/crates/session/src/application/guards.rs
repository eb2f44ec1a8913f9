//! Authorization Guards
//!
//! Pure predicates deciding whether a user may act on a resource. Every
//! guard combines an admin override, an optional moderator override, and
//! an ownership comparison. No guard mutates state; all are recomputed
//! from the snapshot passed in, safe to call repeatedly and concurrently.
//!
//! An absent user has no role and owns nothing.
//!
//! Rule table:
//!
//! | resource / action       | rule                         |
//! |-------------------------|------------------------------|
//! | post edit / delete      | admin or owner               |
//! | message delete          | admin or moderator or owner  |
//! | group create / edit     | admin or moderator           |
//! | group delete            | admin only                   |
//! | thread create           | admin or moderator           |
//! | thread edit             | owner only                   |
//! | thread delete           | admin or owner               |

use crate::domain::resource::{Group, Message, Post, Thread};
use crate::domain::user::User;

/// Generic role membership over an optional user
pub fn has_role(user: Option<&User>, role: &str) -> bool {
    user.is_some_and(|u| u.has_role(role))
}

pub fn is_admin(user: Option<&User>) -> bool {
    user.is_some_and(User::is_admin)
}

pub fn is_moderator(user: Option<&User>) -> bool {
    user.is_some_and(User::is_moderator)
}

fn owns(user: Option<&User>, owner_id: i64) -> bool {
    user.is_some_and(|u| u.id == owner_id)
}

// ============================================================================
// Posts
// ============================================================================

pub fn can_edit_post(user: Option<&User>, post: &Post) -> bool {
    is_admin(user) || owns(user, post.user_id)
}

pub fn can_delete_post(user: Option<&User>, post: &Post) -> bool {
    is_admin(user) || owns(user, post.user_id)
}

// ============================================================================
// Messages
// ============================================================================

pub fn can_delete_message(user: Option<&User>, message: &Message) -> bool {
    is_admin(user) || is_moderator(user) || owns(user, message.user_id)
}

// ============================================================================
// Groups
// ============================================================================

pub fn can_create_group(user: Option<&User>) -> bool {
    is_admin(user) || is_moderator(user)
}

pub fn can_edit_group(user: Option<&User>, _group: &Group) -> bool {
    is_admin(user) || is_moderator(user)
}

/// Ownership does not grant deletion; only admins delete groups.
pub fn can_delete_group(user: Option<&User>, _group: &Group) -> bool {
    is_admin(user)
}

// ============================================================================
// Threads
// ============================================================================

pub fn can_create_thread(user: Option<&User>) -> bool {
    is_admin(user) || is_moderator(user)
}

/// Edit is owner-only; admins are deliberately not included here even
/// though they may delete. Kept as-is pending product confirmation.
pub fn can_edit_thread(user: Option<&User>, thread: &Thread) -> bool {
    owns(user, thread.user_id)
}

pub fn can_delete_thread(user: Option<&User>, thread: &Thread) -> bool {
    is_admin(user) || owns(user, thread.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{ROLE_ADMIN, ROLE_MODERATOR};

    fn admin() -> User {
        make_user(10, Some(ROLE_ADMIN), &[])
    }

    fn moderator() -> User {
        make_user(1, None, &[ROLE_MODERATOR])
    }

    fn member(id: i64) -> User {
        make_user(id, None, &[])
    }

    fn make_user(id: i64, role: Option<&str>, authorities: &[&str]) -> User {
        User {
            id,
            username: format!("user-{id}"),
            email: None,
            display_name: None,
            role: role.map(String::from),
            authorities: authorities.iter().map(|s| s.to_string()).collect(),
            created_at: None,
        }
    }

    #[test]
    fn test_absent_user_has_no_permissions() {
        let post = Post { id: 1, user_id: 1 };
        let message = Message { id: 1, user_id: 1 };
        let group = Group { id: 1, owner_id: 1 };
        let thread = Thread { id: 1, user_id: 1 };

        assert!(!has_role(None, ROLE_ADMIN));
        assert!(!can_edit_post(None, &post));
        assert!(!can_delete_post(None, &post));
        assert!(!can_delete_message(None, &message));
        assert!(!can_create_group(None));
        assert!(!can_edit_group(None, &group));
        assert!(!can_delete_group(None, &group));
        assert!(!can_create_thread(None));
        assert!(!can_edit_thread(None, &thread));
        assert!(!can_delete_thread(None, &thread));
    }

    #[test]
    fn test_post_edit_delete_admin_or_owner() {
        let post = Post { id: 1, user_id: 5 };

        assert!(can_edit_post(Some(&admin()), &post));
        assert!(can_edit_post(Some(&member(5)), &post));
        assert!(!can_edit_post(Some(&member(6)), &post));
        // Moderator gets no special treatment on posts
        assert!(!can_edit_post(Some(&moderator()), &post));

        assert!(can_delete_post(Some(&admin()), &post));
        assert!(can_delete_post(Some(&member(5)), &post));
        assert!(!can_delete_post(Some(&moderator()), &post));
    }

    #[test]
    fn test_message_delete_admin_moderator_or_owner() {
        let message = Message { id: 1, user_id: 5 };

        assert!(can_delete_message(Some(&admin()), &message));
        assert!(can_delete_message(Some(&moderator()), &message));
        assert!(can_delete_message(Some(&member(5)), &message));
        assert!(!can_delete_message(Some(&member(6)), &message));
    }

    #[test]
    fn test_group_create_edit_admin_or_moderator() {
        let group = Group { id: 1, owner_id: 5 };

        assert!(can_create_group(Some(&admin())));
        assert!(can_create_group(Some(&moderator())));
        assert!(!can_create_group(Some(&member(5))));

        assert!(can_edit_group(Some(&admin()), &group));
        assert!(can_edit_group(Some(&moderator()), &group));
        // Ownership alone does not grant group edit
        assert!(!can_edit_group(Some(&member(5)), &group));
    }

    #[test]
    fn test_group_delete_admin_only() {
        let group = Group { id: 1, owner_id: 5 };

        // Regardless of owner_id
        assert!(can_delete_group(Some(&admin()), &group));
        assert!(can_delete_group(Some(&admin()), &Group { id: 2, owner_id: 10 }));

        assert!(!can_delete_group(Some(&moderator()), &group));
        assert!(!can_delete_group(Some(&member(5)), &group));
    }

    #[test]
    fn test_moderator_scenario_from_rule_table() {
        // {id:1, authorities:["MODERADOR"]} may create groups but not
        // delete someone else's group
        let user = moderator();
        assert!(can_create_group(Some(&user)));
        assert!(!can_delete_group(Some(&user), &Group { id: 1, owner_id: 2 }));
    }

    #[test]
    fn test_thread_create_admin_or_moderator() {
        assert!(can_create_thread(Some(&admin())));
        assert!(can_create_thread(Some(&moderator())));
        assert!(!can_create_thread(Some(&member(5))));
    }

    #[test]
    fn test_thread_edit_owner_only_even_for_admin() {
        let thread = Thread { id: 1, user_id: 5 };

        assert!(can_edit_thread(Some(&member(5)), &thread));
        assert!(!can_edit_thread(Some(&member(6)), &thread));
        assert!(!can_edit_thread(Some(&admin()), &thread));
        assert!(!can_edit_thread(Some(&moderator()), &thread));
    }

    #[test]
    fn test_thread_delete_admin_or_owner() {
        let thread = Thread { id: 1, user_id: 5 };

        assert!(can_delete_thread(Some(&admin()), &thread));
        assert!(can_delete_thread(Some(&member(5)), &thread));
        assert!(!can_delete_thread(Some(&member(6)), &thread));
        assert!(!can_delete_thread(Some(&moderator()), &thread));
    }

    #[test]
    fn test_guards_accept_scalar_admin_role() {
        // Admin expressed through the authorities collection works too
        let collection_admin = make_user(3, None, &[ROLE_ADMIN]);
        let group = Group { id: 1, owner_id: 99 };
        assert!(can_delete_group(Some(&collection_admin), &group));
    }
}
