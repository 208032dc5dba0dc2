use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Argon2id PHC string. Passwords reach the store only in this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hashes `plain` with a fresh random salt.
    pub fn hash(plain: &str) -> anyhow::Result<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
        Ok(Self(phc.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Constant-time check of `plain` against a stored PHC string. A stored
/// value that does not parse is an error, not a mismatch.
pub fn matches(stored: &str, plain: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("stored password hash: {e}"))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verify password: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies_only_the_original() {
        let hashed = HashedPassword::hash("Secur3P@ssw0rd!").unwrap();
        assert!(hashed.as_str().starts_with("$argon2id$"));
        assert!(matches(hashed.as_str(), "Secur3P@ssw0rd!").unwrap());
        assert!(!matches(hashed.as_str(), "secur3p@ssw0rd!").unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = HashedPassword::hash("hunter2").unwrap();
        let b = HashedPassword::hash("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unreadable_stored_hash_is_an_error() {
        assert!(matches("plaintext-from-an-old-import", "plaintext-from-an-old-import").is_err());
    }
}
