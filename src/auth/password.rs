use tokio::task;

use crate::error::AppError;
use crate::Result;

/// Hashes a plaintext password with a randomized salt.
///
/// bcrypt is CPU-bound, so the work runs on the blocking pool rather than
/// the request task. The plaintext is moved in and dropped with the closure.
pub async fn hash_password(plaintext: &str, cost: u32) -> Result<String> {
    let plaintext = plaintext.to_owned();
    let hash = task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(hash)
}

/// Verifies a plaintext password against a stored hash.
pub async fn verify_password(plaintext: &str, hash: &str) -> Result<bool> {
    let plaintext = plaintext.to_owned();
    let hash = hash.to_owned();
    let matches = task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(matches)
}
