//! Command-line entry points, kept out of `main.rs` so they can be tested.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::acl::{evaluate, Grant, PermissionSet, User};
use crate::helper::full_name_of;

/// Exit code for a denied check.
pub const DENY_EXIT_CODE: u8 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub grant: Option<Grant>,
    /// Line printed to stdout: `allow (<grant>)` or `deny`.
    pub message: String,
}

impl CheckOutcome {
    pub fn exit_code(&self) -> u8 {
        if self.grant.is_some() {
            0
        } else {
            DENY_EXIT_CODE
        }
    }
}

/// `check --user <JSON> --perms <JSON>`
pub fn run_check(user: &str, perms: &str) -> anyhow::Result<CheckOutcome> {
    let user = User::from_value(&parse_json::<Value>("--user", user)?);
    let perms: PermissionSet = parse_json("--perms", perms)?;

    let grant = evaluate(&user, &perms);
    let message = match &grant {
        Some(grant) => format!("allow ({grant})"),
        None => "deny".to_string(),
    };

    Ok(CheckOutcome { grant, message })
}

/// `full-name --user <JSON>`
pub fn run_full_name(user: &str) -> anyhow::Result<String> {
    let user: Value = parse_json("--user", user)?;
    Ok(full_name_of(&user))
}

// Reports the path of the offending field, e.g. `editors[1]: expected ident`.
pub fn parse_json<T: DeserializeOwned>(flag: &str, raw: &str) -> anyhow::Result<T> {
    let de = &mut serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(de)
        .map_err(|err| anyhow::anyhow!("{}: {}", err.path(), err.inner()))
        .with_context(|| format!("failed to parse {flag}"))
}
