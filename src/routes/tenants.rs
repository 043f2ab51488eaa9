use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::super_admin::SuperAdminAuth,
    models::tenant::ProvisionTenantRequest,
    services::tenants::TenantService,
    AppState,
};

// ─── Routes super-admin ───────────────────────────────────────────────────────

pub async fn list_tenants(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
) -> Result<Json<Value>, ApiError> {
    let tenants = TenantService::list(&state.db).await?;
    Ok(Json(serde_json::to_value(tenants).unwrap()))
}

pub async fn provision_tenant(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    Json(body): Json<ProvisionTenantRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let bundle = TenantService::provision(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(serde_json::to_value(bundle).unwrap())))
}

pub async fn disable_tenant(
    State(state): State<AppState>,
    _auth: SuperAdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let disabled = TenantService::disable(&state.db, id).await?;
    Ok(Json(json!({
        "message": format!("{disabled} utilisateur(s) désactivé(s)"),
        "disabled_users": disabled,
    })))
}
