use axum::extract::{FromRef, Path, Request, State};
use axum::http::HeaderMap;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::acl::{Grant, PermissionSet};
use crate::config::AclConfig;
use crate::errors::{AclError, AclResult};
use crate::guard::{self, AclState};
use crate::helper::UserHelper;
use crate::session::{CurrentUser, Session};

/// Header the development session layer reads the user record from.
pub const SESSION_USER_HEADER: &str = "x-session-user";

#[derive(Debug, Clone)]
pub struct AppState {
    pub acl: AclState,
}

impl AppState {
    pub fn new(config: AclConfig) -> Self {
        Self {
            acl: AclState::new(config),
        }
    }
}

impl FromRef<AppState> for AclState {
    fn from_ref(state: &AppState) -> Self {
        state.acl.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub realm: String,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub resource: String,
    pub grant: Option<Grant>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub full_name: String,
    pub user: Option<Value>,
}

/// Demo router: a handful of routes guarded by permission sets.
pub fn create_app(config: AclConfig) -> Router {
    let state = AppState::new(config);
    let acl = state.acl.clone();

    let public_routes = Router::new()
        .route("/public", get(public))
        .route_layer(middleware::from_fn_with_state(acl.require("any"), guard::enforce));

    let member_routes = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(acl.require("user"), guard::enforce));

    let admin_routes = Router::new()
        .route("/admin", get(admin))
        .route_layer(middleware::from_fn_with_state(
            acl.require(vec!["admin"]),
            guard::enforce,
        ));

    Router::new()
        .route("/api/health", get(health))
        .route("/documents/:owner_id", get(document))
        .merge(public_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, dev_session))
        .layer(TraceLayer::new_for_http())
}

/// Development-only session layer: trusts a JSON user record in
/// [`SESSION_USER_HEADER`] and files it under the configured realm.
pub async fn dev_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AclError> {
    let session = session_from_headers(request.headers(), &state.acl.config.realm)?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

fn session_from_headers(headers: &HeaderMap, realm: &str) -> AclResult<Session> {
    let Some(raw) = headers.get(SESSION_USER_HEADER) else {
        return Ok(Session::new());
    };

    let raw = raw
        .to_str()
        .map_err(|_| AclError::bad_request(format!("{SESSION_USER_HEADER} must be valid UTF-8")))?;
    let user: Value = serde_json::from_str(raw)
        .map_err(|err| AclError::bad_request(format!("{SESSION_USER_HEADER} is not JSON: {err}")))?;

    Ok(Session::new().with_user(realm, user))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        realm: state.acl.config.realm.clone(),
    })
}

async fn public(grant: Option<Extension<Grant>>) -> Json<AccessResponse> {
    Json(AccessResponse {
        resource: "public".to_string(),
        grant: grant.map(|Extension(grant)| grant),
    })
}

async fn admin(grant: Option<Extension<Grant>>) -> Json<AccessResponse> {
    Json(AccessResponse {
        resource: "admin".to_string(),
        grant: grant.map(|Extension(grant)| grant),
    })
}

async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<MeResponse> {
    let helper = UserHelper::with_realm(&session, state.acl.config.realm.as_str());
    Json(MeResponse {
        full_name: helper.full_name(),
        user: helper.info(),
    })
}

// Owner ids come from the path and are compared as strings.
async fn document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(owner_id): Path<String>,
) -> AclResult<Json<AccessResponse>> {
    let perms = PermissionSet::roles(["editor"]).with_owner(owner_id.as_str());
    let grant = state.acl.authorize(&user, &perms)?;

    Ok(Json(AccessResponse {
        resource: format!("documents/{owner_id}"),
        grant,
    }))
}
