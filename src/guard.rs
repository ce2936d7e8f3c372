//! Route guard
//!
//! Applies a route's permission set to the current user and acts on the
//! result according to the configured [`EnforcementMode`]:
//!
//! ```ignore
//! Router::new()
//!     .route("/admin", get(admin))
//!     .route_layer(middleware::from_fn_with_state(acl.require(["admin"]), guard::enforce))
//!     .with_state(acl);
//! ```

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::acl::{evaluate, Grant, PermissionSet, User};
use crate::config::{AclConfig, EnforcementMode};
use crate::errors::{AclError, AclResult};
use crate::session::Session;

/// Shared, read-only access-control settings.
#[derive(Debug, Clone, Default)]
pub struct AclState {
    pub config: Arc<AclConfig>,
}

impl AclState {
    pub fn new(config: AclConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Guard state for a route declaring `perms`.
    pub fn require(&self, perms: impl Into<PermissionSet>) -> AclGuard {
        AclGuard {
            state: self.clone(),
            perms: Arc::new(perms.into()),
        }
    }

    pub fn authorize(&self, user: &User, perms: &PermissionSet) -> AclResult<Option<Grant>> {
        authorize(&self.config, user, perms)
    }
}

/// Middleware state: the settings plus the permission set of one route.
#[derive(Debug, Clone)]
pub struct AclGuard {
    pub state: AclState,
    pub perms: Arc<PermissionSet>,
}

/// Decide a request under the configured enforcement mode.
///
/// Returns the granting rule when the check ran and passed, `None` when the
/// check was skipped or only advisory, and an error for a strict denial:
/// `Unauthorized` for an anonymous user, `Forbidden` otherwise.
pub fn authorize(config: &AclConfig, user: &User, perms: &PermissionSet) -> AclResult<Option<Grant>> {
    if config.mode == EnforcementMode::Off {
        return Ok(None);
    }

    if let Some(grant) = evaluate(user, perms) {
        return Ok(Some(grant));
    }

    match config.mode {
        EnforcementMode::Advisory => {
            tracing::warn!(
                realm = %config.realm,
                user_id = ?user.id,
                role = ?user.role,
                tokens = ?perms.tokens,
                "access would be denied (advisory mode)"
            );
            Ok(None)
        }
        _ if user.is_empty() => Err(AclError::unauthorized("authentication required")),
        _ => Err(AclError::forbidden("insufficient permissions")),
    }
}

/// Middleware checking the guarded route's permission set.
///
/// The granting rule, if any, is inserted into the request extensions.
pub async fn enforce(
    State(guard): State<AclGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AclError> {
    let realm = &guard.state.config.realm;
    let user = request
        .extensions()
        .get::<Session>()
        .map(|session| session.user(realm))
        .unwrap_or_default();

    if let Some(grant) = guard.state.authorize(&user, &guard.perms)? {
        tracing::debug!(
            path = %request.uri().path(),
            grant = %grant,
            "request authorized"
        );
        request.extensions_mut().insert(grant);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(mode: EnforcementMode) -> AclConfig {
        AclConfig::new("default", mode)
    }

    #[test]
    fn test_strict_denials() {
        let perms = PermissionSet::roles(["admin"]);
        let anonymous = authorize(&config(EnforcementMode::Strict), &User::anonymous(), &perms);
        assert!(matches!(anonymous, Err(AclError::Unauthorized(_))));

        let editor = User::from_value(&json!({"id": 1, "role": "editor"}));
        let denied = authorize(&config(EnforcementMode::Strict), &editor, &perms);
        assert!(matches!(denied, Err(AclError::Forbidden(_))));
    }

    #[test]
    fn test_strict_grant() -> anyhow::Result<()> {
        let admin = User::new(1i64).with_role("admin");
        let grant = authorize(&config(EnforcementMode::Strict), &admin, &PermissionSet::from("admin"))?;
        assert_eq!(grant, Some(Grant::Role("admin".to_string())));
        Ok(())
    }

    #[test]
    fn test_advisory_and_off_never_fail() -> anyhow::Result<()> {
        let perms = PermissionSet::roles(["admin"]);
        assert_eq!(authorize(&config(EnforcementMode::Advisory), &User::anonymous(), &perms)?, None);
        assert_eq!(authorize(&config(EnforcementMode::Off), &User::anonymous(), &perms)?, None);
        Ok(())
    }

    #[test]
    fn test_off_skips_evaluation() -> anyhow::Result<()> {
        let grant = authorize(&config(EnforcementMode::Off), &User::anonymous(), &PermissionSet::from("any"))?;
        assert_eq!(grant, None);
        Ok(())
    }
}
