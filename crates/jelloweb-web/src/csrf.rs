//! Stateless CSRF tokens: `"{issued_unix}.{hex(hmac_sha256(secret, issued_unix))}"`.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Tokens issued this far in the future are rejected as forged.
const CLOCK_SKEW_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsrfError {
    #[error("The CSRF token is missing.")]
    Missing,
    #[error("The CSRF token is invalid.")]
    Invalid,
    #[error("The CSRF token has expired.")]
    Expired,
    #[error("The signing key was rejected.")]
    Key,
}

fn mac(secret: &SecretString, issued: i64) -> Result<HmacSha256, CsrfError> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| CsrfError::Key)?;
    mac.update(issued.to_string().as_bytes());
    Ok(mac)
}

pub fn issue(secret: &SecretString, now: DateTime<Utc>) -> Result<String, CsrfError> {
    let issued = now.timestamp();
    let sig = mac(secret, issued)?.finalize().into_bytes();
    Ok(format!("{}.{}", issued, hex::encode(sig)))
}

pub fn verify(
    secret: &SecretString,
    token: &str,
    now: DateTime<Utc>,
    time_limit: Duration,
) -> Result<(), CsrfError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CsrfError::Missing);
    }

    let (issued, sig) = token.split_once('.').ok_or(CsrfError::Invalid)?;
    let issued: i64 = issued.parse().map_err(|_| CsrfError::Invalid)?;
    let sig = hex::decode(sig).map_err(|_| CsrfError::Invalid)?;

    // Constant-time comparison
    mac(secret, issued)?
        .verify_slice(&sig)
        .map_err(|_| CsrfError::Invalid)?;

    let age = now.timestamp() - issued;
    if age < -CLOCK_SKEW_SECS {
        return Err(CsrfError::Invalid);
    }
    if age > time_limit.num_seconds() {
        return Err(CsrfError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_issued_token_verifies() {
        let now = Utc::now();
        let token = issue(&key("deadbeef"), now).unwrap();
        assert!(verify(&key("deadbeef"), &token, now, Duration::seconds(3600)).is_ok());
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let now = Utc::now();
        let token = issue(&key("deadbeef"), now).unwrap();
        assert_eq!(
            verify(&key("other"), &token, now, Duration::seconds(3600)),
            Err(CsrfError::Invalid)
        );
    }

    #[test]
    fn test_tampered_timestamp_is_invalid() {
        let now = Utc::now();
        let token = issue(&key("k"), now).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", now.timestamp() + 10, sig);
        assert_eq!(
            verify(&key("k"), &forged, now, Duration::seconds(3600)),
            Err(CsrfError::Invalid)
        );
    }

    #[test]
    fn test_expired_token() {
        let then = Utc::now() - Duration::seconds(7200);
        let token = issue(&key("k"), then).unwrap();
        assert_eq!(
            verify(&key("k"), &token, Utc::now(), Duration::seconds(3600)),
            Err(CsrfError::Expired)
        );
    }

    #[test]
    fn test_missing_and_garbage() {
        let now = Utc::now();
        let limit = Duration::seconds(3600);
        assert_eq!(verify(&key("k"), "  ", now, limit), Err(CsrfError::Missing));
        assert_eq!(verify(&key("k"), "abc", now, limit), Err(CsrfError::Invalid));
        assert_eq!(verify(&key("k"), "1.zz", now, limit), Err(CsrfError::Invalid));
    }
}
