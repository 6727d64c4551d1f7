use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::password::hash_password,
    error::{ensure_deleted, ApiError, ApiResult},
    state::AppState,
    users::{
        dto::{CreateUser, PublicUser, UpdateUser, UserListQuery},
        repo::User,
        schema::{self, is_valid_email},
    },
    validate::{from_record, validate, FieldRule, Violation},
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", put(update_user))
        .route("/users/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<PublicUser>>> {
    let users = User::list(&state.db, query.language.as_deref()).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(PublicUser::from(user)))
}

/// POST /users
///
/// The uniqueness check runs before schema validation, so a taken email is
/// a 409 even when other fields are also bad. Emails are stored and compared
/// verbatim. The response is the public shape only; the digest never leaves
/// the server.
#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    let email_taken = match body.get("email").and_then(Value::as_str) {
        Some(email) => {
            let taken = User::find_by_email(&state.db, email).await?.is_some();
            if taken {
                warn!(email = %email, "email already registered");
            }
            taken
        }
        None => false,
    };
    create_gate(email_taken, collect_violations(schema::CREATE, &body))?;

    let input: CreateUser = from_record(body).map_err(ApiError::Validation)?;

    // Hashing is CPU and memory bound; keep it off the async workers.
    let password = input.password.clone();
    let digest = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(anyhow::Error::from)??;

    let user = User::insert(&state.db, &input, &digest).await?;
    info!(user_id = user.id, email = %user.email, "user created");
    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PublicUser>> {
    let violations = collect_violations(schema::UPDATE, &body);
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }
    let input: UpdateUser = from_record(body).map_err(ApiError::Validation)?;

    let existing = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let merged = existing.merged(input);
    merged.update(&state.db).await?;
    info!(user_id = id, "user updated");
    Ok(Json(PublicUser::from(merged)))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let affected = User::delete(&state.db, id).await?;
    ensure_deleted(affected, "user")?;
    info!(user_id = id, "user deleted");
    Ok(Json(json!({ "message": "user deleted" })))
}

/// A taken email wins over validation failures, matching the check order
/// on the wire.
fn create_gate(email_taken: bool, violations: Vec<Violation>) -> ApiResult<()> {
    if email_taken {
        return Err(ApiError::DuplicateEmail);
    }
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }
    Ok(())
}

/// Schema violations plus the email shape check the field rules cannot
/// express, in one list ordered by rule position.
fn collect_violations(rules: &[FieldRule], body: &Value) -> Vec<Violation> {
    let mut violations = validate(rules, body).err().unwrap_or_default();
    if let Some(email) = body.get("email").and_then(Value::as_str) {
        if !is_valid_email(email) {
            let rule_index = |field: &str| {
                rules
                    .iter()
                    .position(|r| r.name == field)
                    .unwrap_or(usize::MAX)
            };
            let email_index = rule_index("email");
            let insert_at = violations
                .iter()
                .position(|v| rule_index(&v.field) > email_index)
                .unwrap_or(violations.len());
            violations.insert(
                insert_at,
                Violation::new("email", "must be a valid email address"),
            );
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_violations_include_every_missing_field() {
        let body = json!({ "firstname": "A" });
        let violations = collect_violations(schema::CREATE, &body);
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["lastname", "email", "password"]);
    }

    #[test]
    fn bad_email_shape_is_reported_in_rule_order() {
        let body = json!({
            "firstname": "A", "lastname": "B",
            "email": "not-an-email", "password": 42,
        });
        let violations = collect_violations(schema::CREATE, &body);
        assert_eq!(
            violations,
            vec![
                Violation::new("email", "must be a valid email address"),
                Violation::new("password", "must be a string"),
            ]
        );
    }

    #[test]
    fn email_shape_violation_sits_between_earlier_and_later_fields() {
        let body = json!({
            "firstname": 1, "lastname": "B",
            "email": "nope", "password": 42,
        });
        let violations = collect_violations(schema::CREATE, &body);
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["firstname", "email", "password"]);
    }

    #[test]
    fn update_allows_a_partial_body() {
        let body = json!({ "city": "Paris" });
        assert!(collect_violations(schema::UPDATE, &body).is_empty());
    }

    #[test]
    fn create_payload_email_is_preserved_verbatim() {
        let body = json!({
            "firstname": "A", "lastname": "B",
            "email": "C@D.com", "password": "pw",
        });
        assert!(collect_violations(schema::CREATE, &body).is_empty());
        let input: CreateUser = from_record(body).unwrap();
        assert_eq!(input.email, "C@D.com");
    }

    #[test]
    fn duplicate_email_wins_over_validation_failures() {
        let violations = vec![Violation::new("firstname", "is required")];
        assert!(matches!(
            create_gate(true, violations),
            Err(ApiError::DuplicateEmail)
        ));
        assert!(matches!(
            create_gate(false, vec![Violation::new("firstname", "is required")]),
            Err(ApiError::Validation(_))
        ));
        assert!(create_gate(false, Vec::new()).is_ok());
    }
}
