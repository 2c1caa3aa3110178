//! User API endpoints

use api_types::{
    Envelope,
    user::{UserLogin, UserRegister, UserView},
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{EngineError, NewUser, User};

use crate::{ServerError, payload::Payload, server::ServerState};

fn map_role(role: api_types::Role) -> engine::Role {
    match role {
        api_types::Role::Buyer => engine::Role::Buyer,
        api_types::Role::Seller => engine::Role::Seller,
    }
}

fn role_view(role: engine::Role) -> api_types::Role {
    match role {
        engine::Role::Buyer => api_types::Role::Buyer,
        engine::Role::Seller => api_types::Role::Seller,
    }
}

/// Handle requests for registering a new user
pub async fn register(
    State(state): State<ServerState>,
    Payload(payload): Payload<UserRegister>,
) -> Result<(StatusCode, Json<Envelope<String>>), ServerError> {
    state
        .engine
        .register(NewUser {
            username: payload.username,
            password: payload.password,
            role: payload.role.map(map_role),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("User created successfully".to_string())),
    ))
}

/// Handle explicit login requests.
///
/// Any malformed body is reported as bad credentials.
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<UserLogin>, JsonRejection>,
) -> Result<Json<Envelope<String>>, ServerError> {
    let Ok(Json(payload)) = payload else {
        return Err(EngineError::InvalidCredentials.into());
    };
    state
        .engine
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(Envelope::success("User logged in".to_string())))
}

/// Return the authenticated user with a fresh balance.
pub async fn current(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<UserView>>, ServerError> {
    let user = state.engine.user(user.id).await?;

    Ok(Json(Envelope::success(UserView {
        username: user.username,
        deposit: user.deposit,
        role: role_view(user.role),
    })))
}

/// Delete the authenticated user's account.
pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<String>>, ServerError> {
    state.engine.remove_user(user.id).await?;

    Ok(Json(Envelope::success("User removed".to_string())))
}
