//! Current-user helper for presentation code.
//!
//! ```ignore
//! let helper = UserHelper::new(&session);
//! let greeting = format!("Hello, {}", helper.full_name());
//! ```

use serde_json::Value;

use crate::acl::User;
use crate::config::DEFAULT_REALM;
use crate::session::Authenticator;

#[derive(Debug, Clone)]
pub struct UserHelper<A> {
    auth: A,
    realm: String,
}

impl<A: Authenticator> UserHelper<A> {
    pub fn new(auth: A) -> Self {
        Self::with_realm(auth, DEFAULT_REALM)
    }

    pub fn with_realm(auth: A, realm: impl Into<String>) -> Self {
        Self {
            auth,
            realm: realm.into(),
        }
    }

    /// Whatever the authentication layer returns for the realm, untouched.
    pub fn info(&self) -> Option<Value> {
        self.auth.check(&self.realm)
    }

    pub fn current_user(&self) -> Option<Value> {
        self.info()
    }

    /// The current user, normalized for [`crate::acl::is_allowed`].
    pub fn user(&self) -> User {
        self.info()
            .map(|value| User::from_value(&value))
            .unwrap_or_default()
    }

    /// `first_name` and `last_name` joined by a space.
    ///
    /// Missing or non-string name fields count as empty and are skipped, so
    /// an anonymous caller gets `""` and a user with only a first name gets
    /// just that.
    pub fn full_name(&self) -> String {
        match self.info() {
            Some(user) => full_name_of(&user),
            None => String::new(),
        }
    }
}

pub fn full_name_of(user: &Value) -> String {
    ["first_name", "last_name"]
        .iter()
        .filter_map(|field| user.get(field).and_then(Value::as_str))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use serde_json::json;

    #[test]
    fn test_full_name() {
        let session = Session::new().with_user("default", json!({"first_name": "Ada", "last_name": "Lovelace"}));
        assert_eq!(UserHelper::new(&session).full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_full_name_degrades() {
        let anonymous = UserHelper::new(Session::new());
        assert_eq!(anonymous.full_name(), "");

        let partial = Session::new().with_user("default", json!({"first_name": "Ada"}));
        assert_eq!(UserHelper::new(partial).full_name(), "Ada");

        let odd = Session::new().with_user("default", json!({"first_name": 1, "last_name": "Byron"}));
        assert_eq!(UserHelper::new(odd).full_name(), "Byron");
    }

    #[test]
    fn test_info_is_verbatim() {
        let record = json!({"id": 4, "role": "", "extra": [1, 2]});
        let session = Session::new().with_user("members", record.clone());
        let helper = UserHelper::with_realm(&session, "members");
        assert_eq!(helper.info(), Some(record.clone()));
        assert_eq!(helper.current_user(), Some(record));
        assert_eq!(helper.user().role, None);
    }

    #[test]
    fn test_other_realm_is_anonymous() {
        let session = Session::new().with_user("admin", json!({"id": 1}));
        let helper = UserHelper::new(&session);
        assert_eq!(helper.info(), None);
        assert!(helper.user().is_empty());
    }
}
