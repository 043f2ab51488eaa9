use crate::error::ApiError;

/// Compteur de tentatives dans Redis, stratégie INCR + EXPIRE :
/// - incrémente un compteur pour `key`
/// - au premier incrément, pose un TTL de `window_secs`
/// - renvoie 429 au-delà de `max_attempts`
///
/// Backstop anti-force-brute sur login et register ; aucun état d'identité
/// n'est stocké ici.
pub async fn check_rate_limit(
    redis: &mut redis::aio::MultiplexedConnection,
    key: &str,
    max_attempts: u64,
    window_secs: u64,
) -> Result<(), ApiError> {
    let count: u64 = redis::cmd("INCR")
        .arg(key)
        .query_async(redis)
        .await
        .unwrap_or(0);

    if count == 1 {
        // TTL posé seulement au premier incrément pour ne pas glisser la
        // fenêtre à chaque tentative
        let _: Result<(), _> = redis::cmd("EXPIRE")
            .arg(key)
            .arg(window_secs)
            .query_async(redis)
            .await;
    }

    if count > max_attempts {
        return Err(ApiError::RateLimited(
            "Trop de tentatives. Réessayez dans quelques minutes.".to_string(),
        ));
    }

    Ok(())
}
