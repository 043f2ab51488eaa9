use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::{auth::Claims, user::User};

/// Échecs de vérification d'un jeton, distingués pour que le garde
/// d'authentification renvoie un message différent par cas.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Jeton expiré")]
    Expired,
    #[error("Signature du jeton invalide")]
    InvalidSignature,
    #[error("Jeton illisible")]
    Malformed,
}

/// Codec des jetons de session. Le secret est injecté à la construction —
/// jamais relu de l'environnement dans un handler — ce qui rend le codec
/// testable avec un secret fixe.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Pas de marge de grâce : exp fait foi à la seconde près
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Émet un jeton signé pour un utilisateur. Fenêtre de validité fixe à
    /// partir de l'émission (24 h par défaut, via la configuration).
    pub fn issue(&self, user: &User) -> anyhow::Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            tenant_id: user.tenant_id,
            iat: now as usize,
            exp: (now + self.ttl_seconds) as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            password_hash: "irrelevant".into(),
            first_name: "Alice".into(),
            last_name: "Martin".into(),
            is_active: true,
            is_super_admin: false,
            role_id: None,
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
    fn test_issue_then_verify_round_trip() {
        let codec = TokenCodec::new("secret-de-test", 3600);
        let user = sample_user();
        let token = codec.issue(&user).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.tenant_id, user.tenant_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        // TTL négatif : le jeton naît expiré
        let codec = TokenCodec::new("secret-de-test", -3600);
        let token = codec.issue(&sample_user()).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let codec_a = TokenCodec::new("secret-a", 3600);
        let codec_b = TokenCodec::new("secret-b", 3600);
        let token = codec_a.issue(&sample_user()).unwrap();
        assert_eq!(codec_b.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_rejected_as_malformed() {
        let codec = TokenCodec::new("secret-de-test", 3600);
        assert_eq!(codec.verify("pas-un-jwt"), Err(TokenError::Malformed));
        assert_eq!(codec.verify(""), Err(TokenError::Malformed));
    }
}
