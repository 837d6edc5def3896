use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use shared::{ApiMessage, CreateUserRequest, UpdateUserRequest, UserEnvelope, UserRecord};

use crate::application::{CreateOutcome, CreateUser, UpdateUser};
use crate::domain::{DisplayName, Email, RfidTag, User, UserId};
use crate::error::DirectoryError;
use crate::infrastructure::AppState;

type ApiError = (StatusCode, Json<ApiMessage>);

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:id",
            get(find_user).patch(update_user).delete(remove_user),
        )
}

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let rfid = RfidTag::new(payload.rfid).map_err(bad_request)?;
    let input = if state.directory.reads_submitted_identity() {
        CreateUser {
            rfid,
            name: payload.name.map(DisplayName::new).transpose().map_err(bad_request)?,
            email: payload.email.map(Email::new).transpose().map_err(bad_request)?,
        }
    } else {
        CreateUser {
            rfid,
            name: None,
            email: None,
        }
    };

    match state.directory.create(input).await.map_err(directory_error)? {
        CreateOutcome::Created(user) => Ok((
            StatusCode::CREATED,
            Json(UserEnvelope {
                user: to_record(&user),
            }),
        )
            .into_response()),
        CreateOutcome::AlreadyExists => Ok((
            StatusCode::OK,
            Json(ApiMessage::with_code(
                CreateOutcome::ALREADY_EXISTS_MESSAGE,
                "USER_ALREADY_EXISTS",
            )),
        )
            .into_response()),
    }
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserRecord>>, ApiError> {
    let users = state.directory.find_all().await.map_err(directory_error)?;
    Ok(Json(users.iter().map(to_record).collect()))
}

async fn find_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.directory.find_one(&id).await.map_err(directory_error)?;
    Ok(Json(UserEnvelope {
        user: to_record(&user),
    }))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserRecord>, ApiError> {
    let id = parse_id(&id)?;
    let input = UpdateUser {
        name: DisplayName::new(payload.name).map_err(bad_request)?,
        email: Email::new(payload.email).map_err(bad_request)?,
        rfid: RfidTag::new(payload.rfid).map_err(bad_request)?,
    };
    let user = state.directory.update(&id, input).await.map_err(directory_error)?;
    Ok(Json(to_record(&user)))
}

async fn remove_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.directory.remove(&id).await.map_err(directory_error)?;
    Ok(Json(to_record(&user)))
}

// Non-UUID ids cannot name a row.
fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::parse(raw).ok_or_else(|| directory_error(DirectoryError::NotFound))
}

fn to_record(user: &User) -> UserRecord {
    UserRecord {
        id: *user.id().as_uuid(),
        name: user.name().to_string(),
        email: user.email().to_string(),
        rfid: user.rfid().to_string(),
        available: user.is_available(),
        entered_department: user.entered_department(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiMessage::new(message)))
}

fn directory_error(err: DirectoryError) -> ApiError {
    match err {
        DirectoryError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ApiMessage::new(DirectoryError::NotFound.to_string())),
        ),
        DirectoryError::InvalidInput(message) => bad_request(message),
        // Already logged by the directory.
        DirectoryError::Store(_) | DirectoryError::Identity(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiMessage::new("Internal server error")),
        ),
    }
}
