use super::errors::UserError;

/// Hash a password with bcrypt on the blocking pool.
pub(crate) async fn hash_password(password: &str, cost: u32) -> Result<String, UserError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| UserError::Password(e.to_string()))?
        .map_err(UserError::from)
}

/// Check a password against a stored digest. A malformed digest never matches.
pub(crate) async fn verify_password(password: &str, digest: &str) -> bool {
    let password = password.to_string();
    let digest = digest.to_string();
    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &digest)).await {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Stored password digest could not be verified");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "Password verification task failed");
            false
        }
    }
}
