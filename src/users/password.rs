use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Well-formed hash with the default argon2 cost that matches no password.
/// Logins for unknown emails verify against it so both failure paths pay for
/// one full argon2 run.
pub(crate) const UNKNOWN_ACCOUNT_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$ZW5xdWlyeS1kZXNrLXNhbHQ$AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";

/// Hashes a staff password into a PHC string for the `users.password_hash` column.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .context("hash staff password")
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .context("parse stored password hash")?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Burns the same verification cost as a real login without an account.
pub(crate) fn verify_unknown_account(plain: &str) -> anyhow::Result<bool> {
    verify_password(plain, UNKNOWN_ACCOUNT_HASH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("p").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("p", &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("open-day-2026").expect("hashing should succeed");
        assert!(!verify_password("open-day-2025", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("repeat").unwrap();
        let b = hash_password("repeat").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(err.to_string().contains("parse stored password hash"));
    }

    #[test]
    fn unknown_account_hash_parses_and_never_matches() {
        let parsed = PasswordHash::new(UNKNOWN_ACCOUNT_HASH).expect("valid PHC string");
        let fresh = hash_password("x").unwrap();
        let fresh = PasswordHash::new(&fresh).unwrap();
        assert_eq!(parsed.algorithm, fresh.algorithm);
        assert_eq!(parsed.params.to_string(), fresh.params.to_string());

        for guess in ["", "p", "password", "enquiry-desk-salt"] {
            assert!(!verify_unknown_account(guess).expect("verify runs"));
        }
    }
}
