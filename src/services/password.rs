/// Coût bcrypt — volontairement lent, c'est la seule étape coûteuse du cœur.
const COST: u32 = 12;

/// Hache un mot de passe. Le sel aléatoire est embarqué dans la sortie :
/// deux appels sur le même mot de passe produisent deux hashes distincts.
pub fn hash(plaintext: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plaintext, COST)
}

/// Vérifie un mot de passe contre un hash stocké. La comparaison est en
/// temps constant. Un mot de passe faux renvoie `false`, pas une erreur ;
/// un hash illisible renvoie aussi `false`.
pub fn verify(plaintext: &str, stored_hash: &str) -> bool {
    bcrypt::verify(plaintext, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let h = hash("secret1").unwrap();
        assert!(verify("secret1", &h));
        assert!(!verify("secret2", &h));
    }

    #[test]
    fn test_same_password_different_hashes() {
        // Le sel par appel rend les hashes distincts
        let h1 = hash("secret1").unwrap();
        let h2 = hash("secret1").unwrap();
        assert_ne!(h1, h2);
        assert!(verify("secret1", &h1));
        assert!(verify("secret1", &h2));
    }

    #[test]
    fn test_garbage_hash_is_rejected_not_an_error() {
        assert!(!verify("secret1", "pas-un-hash-bcrypt"));
    }
}
