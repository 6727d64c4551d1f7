use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::CredentialsRequest, password::verify_password},
    error::{ApiError, ApiResult},
    state::AppState,
    users::repo::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/checkCredentials", post(check_credentials))
}

/// POST /auth/checkCredentials
///
/// Unknown email fails with 404 before any verification is attempted;
/// a present user with a mismatched password fails with 401.
#[instrument(skip(state, payload))]
pub async fn check_credentials(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "credential check for unknown email");
            ApiError::NotFound("user")
        })?;

    // Verification is CPU and memory bound; keep it off the async workers.
    let password = payload.password;
    let digest = user.hashed_password.clone();
    let matched = tokio::task::spawn_blocking(move || verify_password(&password, &digest))
        .await
        .map_err(anyhow::Error::from)??;

    if !matched {
        warn!(email = %payload.email, user_id = user.id, "credential check failed");
        return Err(ApiError::IncorrectPassword);
    }

    info!(email = %payload.email, user_id = user.id, "credential check passed");
    Ok((StatusCode::OK, Json(json!({ "message": "credentials valid" }))))
}
