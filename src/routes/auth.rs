use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    middleware::rate_limit::check_rate_limit,
    models::{
        auth::AuthenticatedUser,
        user::{ChangePasswordRequest, LoginRequest, RegisterRequest},
    },
    services::auth::AuthService,
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // Backstop : 10 inscriptions / 15 min par email+tenant
    let rate_key = format!("rate:register:{}:{}", body.tenant_id, body.email.to_lowercase());
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &rate_key, 10, 900).await?;

    let response = AuthService::register(&state.db, &state.codec, &body).await?;
    Ok((StatusCode::CREATED, Json(serde_json::to_value(response).unwrap())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    // Backstop : 5 tentatives / 15 min par email
    let rate_key = format!("rate:login:{}", body.email.to_lowercase());
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &rate_key, 5, 900).await?;

    let response = AuthService::login(&state.db, &state.codec, &body).await?;
    Ok(Json(serde_json::to_value(response).unwrap()))
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let profile = AuthService::me(&state.db, user.id).await?;
    Ok(Json(serde_json::to_value(profile).unwrap()))
}

pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    AuthService::change_password(&state.db, user.id, &body.current_password, &body.new_password)
        .await?;
    Ok(Json(json!({ "message": "Mot de passe modifié avec succès" })))
}
