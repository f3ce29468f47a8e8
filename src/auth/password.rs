use crate::errors::AppResult;

pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Malformed stored hashes count as a mismatch rather than a server error.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match bcrypt::verify(password, password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            log::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}
