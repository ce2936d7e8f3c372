use serde::Serialize;
use serde_json::Value;

use super::permission::PermissionSet;
use super::rules;
use super::user::User;

/// The rule that let a request through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum Grant {
    /// The resource's owner matched the user id.
    Owner,
    /// The `any` token.
    Any,
    /// The user's role equals one of the tokens.
    Role(String),
    /// The `user` token and a non-empty user record.
    AuthenticatedUser,
}

impl std::fmt::Display for Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grant::Owner => f.write_str("owner"),
            Grant::Any => f.write_str("any"),
            Grant::Role(role) => write!(f, "role:{role}"),
            Grant::AuthenticatedUser => f.write_str("user"),
        }
    }
}

/// Decide whether `user` may access a resource guarded by `perms`.
///
/// Evaluation order:
/// 1. owner rule matches the user id -> allow
/// 2. role tokens, ascending: `any` -> allow, role match -> allow,
///    `user` with a non-empty user record -> allow
/// 3. deny
pub fn evaluate(user: &User, perms: &PermissionSet) -> Option<Grant> {
    if let Some(owner) = &perms.owner {
        if user.id.as_ref() == Some(owner) {
            tracing::debug!(user_id = %owner, "owner match");
            return Some(Grant::Owner);
        }
    }

    // Ascending order is kept for a stable `Grant`; the allow/deny outcome
    // does not depend on it.
    for token in perms.sorted_tokens() {
        if token == rules::ANY {
            tracing::debug!(user_id = ?user.id, "any rule");
            return Some(Grant::Any);
        }

        if user.has_role(token) {
            tracing::debug!(user_id = ?user.id, role = %token, "role match");
            return Some(Grant::Role(token.to_string()));
        }

        if token == rules::USER && !user.is_empty() {
            tracing::debug!(user_id = ?user.id, "authenticated user rule");
            return Some(Grant::AuthenticatedUser);
        }
    }

    tracing::debug!(
        user_id = ?user.id,
        role = ?user.role,
        tokens = ?perms.tokens,
        "access denied"
    );
    None
}

pub fn is_allowed(user: &User, perms: &PermissionSet) -> bool {
    evaluate(user, perms).is_some()
}

/// Same as [`is_allowed`], for callers holding raw records.
pub fn is_allowed_value(user: &Value, perms: &Value) -> bool {
    is_allowed(&User::from_value(user), &PermissionSet::from_value(perms))
}
