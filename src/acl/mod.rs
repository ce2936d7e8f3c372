//! Access-control core
//!
//! A single static check: does this user satisfy a resource's permission
//! rules? Rules are declared where the resource lives (route table, model
//! field metadata, row-level data) and are matched against the user's role.
//!
//! Three tokens are special:
//! - `owner`: a keyed entry whose value must equal the user's id
//! - `user`: any non-empty user record
//! - `any`: everyone, including anonymous callers
//!
//! Everything here is pure; the caller resolves the user beforehand.

mod evaluator;
mod permission;
mod user;

pub use evaluator::{evaluate, is_allowed, is_allowed_value, Grant};
pub use permission::PermissionSet;
pub use user::{Identifier, User};

/// Well-known rule tokens
pub mod rules {
    pub const ANY: &str = "any";
    pub const USER: &str = "user";
    pub const OWNER: &str = "owner";
}
