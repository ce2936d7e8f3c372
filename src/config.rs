use std::str::FromStr;

use crate::errors::AclError;

/// Realm the host's authentication layer files users under by default.
pub const DEFAULT_REALM: &str = "default";

/// What the route guard does with a denied request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnforcementMode {
    /// No permission checks (development mode)
    Off,
    /// Log denials but allow requests (testing mode)
    Advisory,
    /// Reject denied requests with 401/403 (production mode)
    #[default]
    Strict,
}

impl FromStr for EnforcementMode {
    type Err = AclError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "off" => Ok(EnforcementMode::Off),
            "advisory" => Ok(EnforcementMode::Advisory),
            "strict" => Ok(EnforcementMode::Strict),
            other => Err(AclError::configuration(format!(
                "ACL_MODE must be one of off, advisory, strict (got {other:?})"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclConfig {
    pub realm: String,
    pub mode: EnforcementMode,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            realm: DEFAULT_REALM.to_string(),
            mode: EnforcementMode::default(),
        }
    }
}

impl AclConfig {
    pub fn new(realm: impl Into<String>, mode: EnforcementMode) -> Self {
        Self {
            realm: realm.into(),
            mode,
        }
    }

    /// Reads `ACL_REALM` and `ACL_MODE`.
    pub fn from_env() -> Result<Self, AclError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AclError> {
        let realm = lookup("ACL_REALM")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REALM.to_string());

        let mode = match lookup("ACL_MODE") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => EnforcementMode::default(),
        };

        Ok(Self { realm, mode })
    }
}
