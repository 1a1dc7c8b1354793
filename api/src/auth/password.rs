use std::sync::OnceLock;

/// bcrypt work factor for stored passwords.
pub const HASH_COST: u32 = 10;

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// A cost-10 hash no real password is checked against. Lookups that miss
/// still pay for one bcrypt verification against it.
pub fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| {
        hash("login timing placeholder").unwrap_or_else(|e| {
            tracing::error!(error = %e, "could not build placeholder password hash");
            String::new()
        })
    })
}

pub fn hash(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, HASH_COST)
}

/// Checks `password` against a stored hash. A malformed hash counts as a
/// mismatch.
pub fn verify(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash could not be parsed");
            false
        }
    }
}

/// Checks a login attempt. A missing account is verified against
/// [`dummy_hash`] so it costs as much as a wrong password, and never matches.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(stored) => verify(password, stored),
        None => {
            verify(password, dummy_hash());
            false
        }
    }
}
