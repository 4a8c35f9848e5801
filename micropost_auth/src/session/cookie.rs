//! Session cookie values are `{session_id}.{signature}` where the signature is
//! base64url HMAC-SHA256 of the session id.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::session::errors::SessionError;
use crate::utils::{base64url_decode, base64url_encode};

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &[u8]) -> Result<HmacSha256, SessionError> {
    HmacSha256::new_from_slice(secret).map_err(|e| SessionError::Crypto(e.to_string()))
}

pub(super) fn sign_session_id(session_id: &str, secret: &[u8]) -> Result<String, SessionError> {
    let mut mac = mac(secret)?;
    mac.update(session_id.as_bytes());
    let signature = base64url_encode(&mac.finalize().into_bytes());
    Ok(format!("{session_id}.{signature}"))
}

/// Returns the session id when the signature checks out.
pub(super) fn verify_session_cookie(value: &str, secret: &[u8]) -> Option<String> {
    let (session_id, signature) = value.rsplit_once('.')?;
    if session_id.is_empty() {
        return None;
    }
    let signature = base64url_decode(signature).ok()?;
    let mut mac = mac(secret).ok()?;
    mac.update(session_id.as_bytes());
    // verify_slice compares in constant time
    mac.verify_slice(&signature).ok()?;
    Some(session_id.to_string())
}
