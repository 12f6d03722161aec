/// Password hashing
use crate::error::Result;

/// bcrypt hashing with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Check `password` against a stored hash.
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or_else(|e| {
            tracing::warn!("Stored password hash is unreadable: {}", e);
            false
        })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("my_secure_password").unwrap();

        assert!(hasher.verify("my_secure_password", &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        let hasher = PasswordHasher::new(4);
        assert!(!hasher.verify("anything", "not-a-bcrypt-hash"));
    }
}
