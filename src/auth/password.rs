use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

// Cost parameters are compile-time constants; requests can never influence
// how expensive hashing is.
const MEMORY_KIB: u32 = 65536;
const ITERATIONS: u32 = 5;
const PARALLELISM: u32 = 1;

fn hasher() -> anyhow::Result<Argon2<'static>> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, None)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password with Argon2id and a fresh random salt.
///
/// The returned PHC string self-describes algorithm, version, cost
/// parameters, salt and output, so stored digests stay verifiable even if
/// the defaults above change.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext against a stored digest, using the parameters and
/// salt embedded in the digest. Comparison is constant time.
///
/// A wrong password is `Ok(false)`; only a structurally invalid digest is
/// an error.
pub fn verify_password(plain: &str, digest: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(digest).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(hasher()?
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_digest() {
        let err = verify_password("anything", "not-a-digest").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn same_plaintext_hashes_differently_but_both_verify() {
        let password = "myPlainPassword";
        let first = hash_password(password).expect("hashing should succeed");
        let second = hash_password(password).expect("hashing should succeed");
        assert_ne!(first, second);
        assert!(verify_password(password, &first).unwrap());
        assert!(verify_password(password, &second).unwrap());
    }

    #[test]
    fn digest_embeds_algorithm_and_cost_parameters() {
        let hash = hash_password("whatever").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=65536,t=5,p=1"));
    }
}
