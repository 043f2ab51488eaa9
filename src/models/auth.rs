use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embarqués dans le jeton de session. Identité seulement — aucun
/// privilège : le flag super-admin est relu en base à chaque requête.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user UUID
    pub email: String,
    pub tenant_id: Option<Uuid>,
    pub iat: usize,
    pub exp: usize,
}

/// Contexte d'identité d'une requête — reconstruit à chaque requête à partir
/// d'un jeton vérifié et d'une lecture fraîche de la table users.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub tenant_id: Option<Uuid>,
    pub role_id: Option<Uuid>,
}
