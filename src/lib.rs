pub mod acl;
pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod guard;
pub mod helper;
pub mod session;

// Re-export commonly used items for tests
pub use acl::{evaluate, is_allowed, is_allowed_value, Grant, Identifier, PermissionSet, User};
pub use app::create_app;
pub use config::{AclConfig, EnforcementMode};
pub use errors::{AclError, AclResult};
pub use helper::UserHelper;
pub use session::{Authenticator, CurrentUser, Session};
