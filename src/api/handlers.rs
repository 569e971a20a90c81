//! Request handlers: user creation and the health probe.
//!
//! Validation failures never reach the store; they come back as 400 with a
//! field-level error list. Store failures map to a generic 500 — the error
//! detail goes to the log, not the client.

use crate::{DocStore, Error};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collection that user records live in.
pub const USERS_COLLECTION: &str = "users";

const MIN_PASSWORD_LEN: usize = 8;

/// A stored user record. The credential is kept as a hash under
/// `passwordHash` and never serialized into responses (see [`UserResponse`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-generated v4 UUID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// BLAKE3 hex digest of the plaintext password.
    pub password_hash: String,
}

/// Creation payload. Fields are optional at the serde level so that missing
/// ones produce field errors instead of a blanket deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Display name; required, non-blank.
    pub name: Option<String>,
    /// Contact address; required, must look like an email.
    pub email: Option<String>,
    /// Plaintext password; required, at least 8 characters.
    pub password: Option<String>,
}

/// What the client gets back: the stored user minus the credential field.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Server-generated id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Error body shape shared by 400 and 500 responses:
/// `{ "errors": [ { "message", "field"? } ] }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// One entry per problem found.
    pub errors: Vec<FieldError>,
}

/// A single problem, optionally tied to a request field.
#[derive(Debug, Serialize)]
pub struct FieldError {
    /// Human-readable description.
    pub message: String,
    /// Offending field, when the problem is field-specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl FieldError {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    fn for_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

type ErrorReply = (StatusCode, Json<ErrorBody>);

/// `POST /api/users` — validate, hash the credential, persist, reply 201 with
/// the stored user (credential omitted).
pub async fn create_user(
    State(store): State<DocStore>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ErrorReply> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!("rejected user payload: {rejection}");
        bad_request(vec![FieldError::message("request body must be valid JSON")])
    })?;

    let new_user = validate(request).map_err(bad_request)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: new_user.name,
        email: new_user.email,
        password_hash: hash_password(&new_user.password),
    };

    let users = store.collection::<User>(USERS_COLLECTION);
    let stored = users.create(&user).map_err(internal_error)?;
    tracing::info!(id = %stored.id, "created user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(stored))))
}

/// `GET /health` — liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ---- validation ----

#[derive(Debug)]
struct NewUser {
    name: String,
    email: String,
    password: String,
}

fn validate(request: CreateUserRequest) -> Result<NewUser, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = request.name.filter(|n| !n.trim().is_empty());
    if name.is_none() {
        errors.push(FieldError::for_field("name is required", "name"));
    }

    let email = match request.email {
        Some(email) if is_plausible_email(&email) => Some(email),
        Some(_) => {
            errors.push(FieldError::for_field("email must be a valid address", "email"));
            None
        }
        None => {
            errors.push(FieldError::for_field("email is required", "email"));
            None
        }
    };

    let password = match request.password {
        Some(password) if password.chars().count() >= MIN_PASSWORD_LEN => Some(password),
        Some(_) => {
            errors.push(FieldError::for_field(
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
                "password",
            ));
            None
        }
        None => {
            errors.push(FieldError::for_field("password is required", "password"));
            None
        }
    };

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Ok(NewUser {
            name,
            email,
            password,
        }),
        _ => Err(errors),
    }
}

// Deliberately loose: one `@` with a dotted domain. Real address validation
// belongs to a confirmation email, not a regex.
fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    matches!(
        (parts.next(), parts.next()),
        (Some(local), Some(domain))
            if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    )
}

fn hash_password(password: &str) -> String {
    blake3::hash(password.as_bytes()).to_hex().to_string()
}

// ---- error mapping ----

fn bad_request(errors: Vec<FieldError>) -> ErrorReply {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { errors }))
}

fn internal_error(err: Error) -> ErrorReply {
    tracing::error!("store operation failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            errors: vec![FieldError::message("internal server error")],
        }),
    )
}
