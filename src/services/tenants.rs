use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        role::{PermissionMatrix, Role},
        tenant::{ProvisionTenantRequest, ProvisionedTenant, Tenant, TenantSummary},
        user::{User, UserProfile},
    },
    services::password,
};

pub struct TenantService;

impl TenantService {
    /// Liste tous les tenants avec leurs compteurs agrégés (super-admin).
    pub async fn list(pool: &PgPool) -> Result<Vec<TenantSummary>, ApiError> {
        let tenants = sqlx::query_as::<_, TenantSummary>(
            "SELECT t.id, t.name, t.domain,
                    (SELECT COUNT(*) FROM users u WHERE u.tenant_id = t.id) AS user_count,
                    (SELECT COUNT(*) FROM roles r WHERE r.tenant_id = t.id) AS role_count,
                    t.created_at, t.updated_at
             FROM tenants t
             ORDER BY t.name",
        )
        .fetch_all(pool)
        .await?;
        Ok(tenants)
    }

    /// Provisionne un tenant complet : le tenant, ses deux rôles par défaut
    /// et son premier administrateur, dans une seule transaction. Tout
    /// échec en cours de route annule l'ensemble — jamais de tenant orphelin
    /// sans admin.
    pub async fn provision(
        pool: &PgPool,
        req: &ProvisionTenantRequest,
    ) -> Result<ProvisionedTenant, ApiError> {
        let name = req.name.trim();
        let domain = req.domain.trim().to_lowercase();
        let admin_email = req.admin_email.trim().to_lowercase();

        if name.is_empty() || domain.is_empty() || admin_email.is_empty() || req.admin_password.is_empty() {
            return Err(ApiError::Validation(
                "Le nom, le domaine, l'email et le mot de passe admin sont requis.".to_string(),
            ));
        }
        if !admin_email.contains('@') {
            return Err(ApiError::Validation("Adresse email invalide.".to_string()));
        }
        if req.admin_password.len() < 8 {
            return Err(ApiError::Validation(
                "Le mot de passe doit contenir au moins 8 caractères.".to_string(),
            ));
        }

        // Le hachage est l'étape lente : hors transaction pour ne pas
        // retenir une connexion pendant le calcul
        let password_hash = password::hash(&req.admin_password)?;

        let mut tx = pool.begin().await?;

        // Pré-vérification avant toute écriture ; la contrainte UNIQUE sur
        // tenants.domain ferme la course entre deux provisionnements
        // concurrents du même domaine
        let domain_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tenants WHERE domain = $1)")
                .bind(&domain)
                .fetch_one(&mut *tx)
                .await?;
        if domain_taken {
            return Err(ApiError::Conflict("Ce domaine est déjà utilisé.".to_string()));
        }

        let tenant = sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (name, domain) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(&domain)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                ApiError::Conflict("Ce domaine est déjà utilisé.".to_string())
            } else {
                e.into()
            }
        })?;

        let admin_role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, tenant_id, permissions) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind("Admin")
        .bind(tenant.id)
        .bind(sqlx::types::Json(PermissionMatrix::admin_defaults()))
        .fetch_one(&mut *tx)
        .await?;

        let user_role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, tenant_id, permissions) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind("User")
        .bind(tenant.id)
        .bind(sqlx::types::Json(PermissionMatrix::user_defaults()))
        .fetch_one(&mut *tx)
        .await?;

        let admin_user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, first_name, last_name, role_id, tenant_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&admin_email)
        .bind(&password_hash)
        .bind("Admin")
        .bind(name)
        .bind(admin_role.id)
        .bind(tenant.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("tenant provisionné : {} ({})", tenant.name, tenant.domain);

        Ok(ProvisionedTenant {
            tenant,
            admin_role,
            user_role,
            admin_user: UserProfile::from(admin_user),
        })
    }

    /// Désactive en bloc tous les utilisateurs non-super-admin d'un tenant.
    /// Les super admins restent actifs pour pouvoir auditer ou annuler
    /// l'opération. Renvoie le nombre de comptes touchés.
    pub async fn disable(pool: &PgPool, tenant_id: Uuid) -> Result<u64, ApiError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tenants WHERE id = $1)")
                .bind(tenant_id)
                .fetch_one(pool)
                .await?;
        if !exists {
            return Err(ApiError::NotFound("Tenant introuvable.".to_string()));
        }

        let result = sqlx::query(
            "UPDATE users SET is_active = FALSE, updated_at = NOW()
             WHERE tenant_id = $1 AND is_super_admin = FALSE",
        )
        .bind(tenant_id)
        .execute(pool)
        .await?;

        tracing::info!(
            "tenant {} désactivé : {} utilisateur(s) touché(s)",
            tenant_id,
            result.rows_affected()
        );

        Ok(result.rows_affected())
    }
}
