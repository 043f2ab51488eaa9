use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::ApiError, models::auth::AuthenticatedUser, AppState};

/// Garde super-admin. S'exécute après le garde d'authentification et relit
/// le flag is_super_admin en base plutôt que de se fier au jeton : un
/// opérateur rétrogradé en cours de session est bloqué dès la requête
/// suivante.
pub struct SuperAdminAuth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for SuperAdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        let is_super_admin: bool =
            sqlx::query_scalar("SELECT is_super_admin FROM users WHERE id = $1")
                .bind(user.id)
                .fetch_optional(&state.db)
                .await?
                .unwrap_or(false);

        if !is_super_admin {
            return Err(ApiError::Forbidden("Super admin access required".to_string()));
        }

        Ok(SuperAdminAuth(user))
    }
}
