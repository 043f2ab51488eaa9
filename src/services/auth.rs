use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::user::{AuthResponse, LoginRequest, RegisterRequest, User, UserProfile},
    services::{password, token::TokenCodec},
};

pub struct AuthService;

impl AuthService {
    /// Crée un compte dans un tenant existant et émet un jeton de session.
    pub async fn register(
        pool: &PgPool,
        codec: &TokenCodec,
        req: &RegisterRequest,
    ) -> Result<AuthResponse, ApiError> {
        let email = req.email.trim().to_lowercase();

        if email.is_empty() || req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
            return Err(ApiError::Validation(
                "L'email, le prénom et le nom sont requis.".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(ApiError::Validation("Adresse email invalide.".to_string()));
        }
        if req.password.len() < 8 {
            return Err(ApiError::Validation(
                "Le mot de passe doit contenir au moins 8 caractères.".to_string(),
            ));
        }

        // Un rôle ne se partage jamais entre tenants : celui demandé doit
        // appartenir au tenant demandé.
        let role_tenant: Option<Uuid> =
            sqlx::query_scalar("SELECT tenant_id FROM roles WHERE id = $1")
                .bind(req.role_id)
                .fetch_optional(pool)
                .await?;
        match role_tenant {
            None => return Err(ApiError::Validation("Rôle introuvable.".to_string())),
            Some(t) if t != req.tenant_id => {
                return Err(ApiError::Validation(
                    "Le rôle n'appartient pas à ce tenant.".to_string(),
                ))
            }
            Some(_) => {}
        }

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND tenant_id = $2)",
        )
        .bind(&email)
        .bind(req.tenant_id)
        .fetch_one(pool)
        .await?;
        if exists {
            return Err(ApiError::Conflict(
                "Cet email est déjà utilisé dans ce tenant.".to_string(),
            ));
        }

        let password_hash = password::hash(&req.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, first_name, last_name, role_id, tenant_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(req.first_name.trim())
        .bind(req.last_name.trim())
        .bind(req.role_id)
        .bind(req.tenant_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            // La contrainte UNIQUE (email, tenant_id) ferme la course entre
            // la pré-vérification et l'insertion
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                ApiError::Conflict("Cet email est déjà utilisé dans ce tenant.".to_string())
            } else {
                e.into()
            }
        })?;

        let token = codec
            .issue(&user)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(AuthResponse { token, user: user.into() })
    }

    /// Vérifie des identifiants et émet un jeton de session.
    ///
    /// Avec `tenant_domain`, la recherche est strictement limitée au tenant
    /// correspondant : le même email dans un autre tenant ne s'authentifie
    /// jamais ici. Sans domaine, le compte le plus ancien portant l'email
    /// est retenu.
    pub async fn login(
        pool: &PgPool,
        codec: &TokenCodec,
        req: &LoginRequest,
    ) -> Result<AuthResponse, ApiError> {
        let email = req.email.trim().to_lowercase();

        let user: Option<User> = match req.tenant_domain.as_deref().filter(|d| !d.is_empty()) {
            Some(domain) => {
                let tenant_id: Option<Uuid> =
                    sqlx::query_scalar("SELECT id FROM tenants WHERE domain = $1")
                        .bind(domain.trim().to_lowercase())
                        .fetch_optional(pool)
                        .await?;
                let tenant_id = tenant_id.ok_or_else(|| {
                    ApiError::NotFound("Domaine introuvable.".to_string())
                })?;

                sqlx::query_as::<_, User>(
                    "SELECT * FROM users WHERE email = $1 AND tenant_id = $2",
                )
                .bind(&email)
                .bind(tenant_id)
                .fetch_optional(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(
                    "SELECT * FROM users WHERE email = $1 ORDER BY created_at LIMIT 1",
                )
                .bind(&email)
                .fetch_optional(pool)
                .await?
            }
        };

        let user = user.ok_or_else(|| ApiError::NotFound("Utilisateur introuvable.".to_string()))?;

        // Un compte désactivé est rejeté quelle que soit la validité des
        // identifiants
        if !user.is_active {
            return Err(ApiError::Unauthenticated("Compte désactivé.".to_string()));
        }

        if !password::verify(&req.password, &user.password_hash) {
            return Err(ApiError::Unauthenticated("Mot de passe incorrect".to_string()));
        }

        sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(user.id)
            .execute(pool)
            .await?;

        let token = codec
            .issue(&user)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        tracing::info!("login réussi pour user_id={}", user.id);

        Ok(AuthResponse { token, user: user.into() })
    }

    /// Profil de l'utilisateur courant, relu en base.
    pub async fn me(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| ApiError::NotFound("Utilisateur introuvable.".to_string()))
    }

    /// Change le mot de passe après vérification de l'actuel.
    pub async fn change_password(
        pool: &PgPool,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        if new_password.len() < 8 {
            return Err(ApiError::Validation(
                "Le mot de passe doit contenir au moins 8 caractères.".to_string(),
            ));
        }

        let stored_hash: Option<String> = sqlx::query_scalar(
            "SELECT password_hash FROM users WHERE id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        let stored_hash =
            stored_hash.ok_or_else(|| ApiError::NotFound("Utilisateur introuvable.".to_string()))?;

        if !password::verify(current_password, &stored_hash) {
            return Err(ApiError::Unauthenticated(
                "Mot de passe actuel incorrect".to_string(),
            ));
        }

        let new_hash = password::hash(new_password)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
