//! Boundary to the host's authentication layer.
//!
//! Authentication happens elsewhere. Whatever authenticated the request
//! files the resulting user record under a realm in a [`Session`] and puts
//! the session into the request extensions; everything in this crate only
//! reads it back.

use std::collections::HashMap;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use serde_json::Value;

use crate::acl::User;
use crate::errors::AclError;
use crate::guard::AclState;

/// Looks up the authenticated user of a realm.
pub trait Authenticator {
    /// The user record, or `None` for an unauthenticated caller.
    fn check(&self, realm: &str) -> Option<Value>;
}

/// Authenticator backed by a closure, see [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FnAuthenticator<F>(F);

/// Wraps `f` so it can stand in for the host's authentication lookup.
pub fn from_fn<F>(f: F) -> FnAuthenticator<F>
where
    F: Fn(&str) -> Option<Value>,
{
    FnAuthenticator(f)
}

impl<F> Authenticator for FnAuthenticator<F>
where
    F: Fn(&str) -> Option<Value>,
{
    fn check(&self, realm: &str) -> Option<Value> {
        (self.0)(realm)
    }
}

impl<A: Authenticator + ?Sized> Authenticator for &A {
    fn check(&self, realm: &str) -> Option<Value> {
        (**self).check(realm)
    }
}

impl<A: Authenticator + ?Sized> Authenticator for Arc<A> {
    fn check(&self, realm: &str) -> Option<Value> {
        (**self).check(realm)
    }
}

/// Authenticated users of one request, keyed by realm.
#[derive(Debug, Clone, Default)]
pub struct Session {
    users: HashMap<String, Value>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, realm: impl Into<String>, user: Value) -> Self {
        self.login(realm, user);
        self
    }

    pub fn login(&mut self, realm: impl Into<String>, user: Value) {
        self.users.insert(realm.into(), user);
    }

    pub fn logout(&mut self, realm: &str) -> Option<Value> {
        self.users.remove(realm)
    }

    pub fn get(&self, realm: &str) -> Option<&Value> {
        self.users.get(realm)
    }

    /// Normalized user of `realm`; anonymous when nobody is logged in.
    pub fn user(&self, realm: &str) -> User {
        self.get(realm).map(User::from_value).unwrap_or_default()
    }
}

impl Authenticator for Session {
    fn check(&self, realm: &str) -> Option<Value> {
        self.get(realm).cloned()
    }
}

/// The user of the configured realm, as an axum extractor.
///
/// Never rejects: a request without a session yields the anonymous user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AclState: FromRef<S>,
{
    type Rejection = AclError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let acl = AclState::from_ref(state);
        let user = parts
            .extensions
            .get::<Session>()
            .map(|session| session.user(&acl.config.realm))
            .unwrap_or_default();

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_and_logout() {
        let mut session = Session::new();
        session.login("default", json!({"id": 1}));
        assert_eq!(session.check("default"), Some(json!({"id": 1})));
        assert_eq!(session.check("admin"), None);

        assert_eq!(session.logout("default"), Some(json!({"id": 1})));
        assert!(session.user("default").is_empty());
    }

    #[test]
    fn test_closure_authenticator() {
        let auth = from_fn(|realm: &str| (realm == "default").then(|| json!({"id": 2})));
        assert_eq!(auth.check("default"), Some(json!({"id": 2})));
        assert_eq!(auth.check("other"), None);
    }

    #[test]
    fn test_shared_authenticator() {
        let session = Arc::new(Session::new().with_user("default", json!({"id": 3})));
        assert_eq!(session.check("default"), Some(json!({"id": 3})));
    }
}
