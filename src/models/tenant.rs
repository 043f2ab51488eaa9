use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{role::Role, user::UserProfile};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    /// Clé de résolution globale — unique sur l'ensemble des tenants.
    pub domain: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ligne de la liste super-admin : tenant + compteurs agrégés.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TenantSummary {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub user_count: i64,
    pub role_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ProvisionTenantRequest {
    pub name: String,
    pub domain: String,
    pub admin_email: String,
    pub admin_password: String,
}

/// Résultat du provisionnement : le tenant, ses deux rôles par défaut et
/// son premier administrateur.
#[derive(Debug, Serialize)]
pub struct ProvisionedTenant {
    pub tenant: Tenant,
    pub admin_role: Role,
    pub user_role: Role,
    pub admin_user: UserProfile,
}
