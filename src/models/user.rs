use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ligne de la table users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_super_admin: bool,
    /// NULL uniquement pour les super admins.
    pub role_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub bio: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection publique d'un utilisateur. Le hash du mot de passe n'a pas de
/// champ ici : l'exclusion est garantie par le type, pas par une liste
/// d'exclusion à l'exécution.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_super_admin: bool,
    pub role_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub bio: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            is_active: u.is_active,
            is_super_admin: u.is_super_admin,
            role_id: u.role_id,
            tenant_id: u.tenant_id,
            avatar_url: u.avatar_url,
            phone: u.phone,
            job_title: u.job_title,
            bio: u.bio,
            last_login_at: u.last_login_at,
            created_at: u.created_at,
        }
    }
}

// Request/Response DTOs

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub tenant_id: Uuid,
    pub role_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Domaine du tenant — optionnel ; sans lui, le compte le plus ancien
    /// portant cet email est retenu (cas des super admins).
    pub tenant_domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            password_hash: "$2b$12$secret".into(),
            first_name: "Alice".into(),
            last_name: "Martin".into(),
            is_active: true,
            is_super_admin: false,
            role_id: Some(Uuid::new_v4()),
            tenant_id: Some(Uuid::new_v4()),
            avatar_url: None,
            phone: None,
            job_title: None,
            bio: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = sample_user();
        let row_json = serde_json::to_value(&user).unwrap();
        assert!(row_json.get("password_hash").is_none());

        let profile_json = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert!(profile_json.get("password_hash").is_none());
        assert_eq!(profile_json["email"], serde_json::json!("a@x.com"));
    }
}
