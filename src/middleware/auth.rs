use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{auth::AuthenticatedUser, user::User},
    services::token::{TokenCodec, TokenError},
    AppState,
};

/// Garde d'authentification : en-tête Bearer → jeton vérifié → lecture
/// fraîche de l'utilisateur → contrôle is_active. Le jeton ne fait foi que
/// de l'identité ; l'état du compte est relu en base à chaque requête, donc
/// un compte désactivé est bloqué dès la requête suivante même si son jeton
/// est encore valide.
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthenticated("Missing Authorization header".to_string())
            })?;

        let token = bearer_token(auth_header).ok_or_else(|| {
            ApiError::Unauthenticated("Invalid Authorization header format".to_string())
        })?;

        // Secret absent = faute de configuration serveur, pas un échec
        // d'authentification : 500, pas 401
        let codec = parts
            .extensions
            .get::<Arc<TokenCodec>>()
            .ok_or_else(|| ApiError::Configuration("JWT secret not configured".to_string()))?;

        let claims = codec.verify(token).map_err(|e| match e {
            TokenError::Expired => ApiError::Unauthenticated("Token expired".to_string()),
            TokenError::InvalidSignature | TokenError::Malformed => {
                ApiError::Unauthenticated("Invalid token".to_string())
            }
        })?;

        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| ApiError::Unauthenticated("Invalid token".to_string()))?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| ApiError::Unauthenticated("Unknown user".to_string()))?;

        if !user.is_active {
            return Err(ApiError::Unauthenticated("Account disabled".to_string()));
        }

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            tenant_id: user.tenant_id,
            role_id: user.role_id,
        })
    }
}

/// Extraction du jeton brut d'un en-tête `Authorization`, utilisée aussi
/// par les tests.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token(""), None);
    }
}
