//! JWT access token minting and verification.

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::AccessTokenClaims;

/// Issuer label stamped into every access token.
pub const ISSUER: &str = "chirpy";

/// Access token lifetime: 1 hour.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// The only accepted signing algorithm.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Mint a signed HS256 access token for `user_id`, valid for `ttl`.
pub fn make_access_token(user_id: Uuid, secret: &[u8], ttl: Duration) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = AccessTokenClaims {
        iss: ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Signing(format!("jwt encode: {e}")))
}

/// Verify an access token and return the subject's user ID.
///
/// Tokens whose header names any algorithm other than HS256 are rejected as
/// [`AuthError::InvalidSignature`], even if the MAC itself would verify.
pub fn verify_access_token(token: &str, secret: &[u8]) -> Result<Uuid, AuthError> {
    let claims = decode_claims(token, secret)?;
    Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject(claims.sub))
}

fn decode_claims(token: &str, secret: &[u8]) -> Result<AccessTokenClaims, AuthError> {
    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<AccessTokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                AuthError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Malformed(e.to_string()),
        })
}

/// Resolve the JWT secret: env var `JWT_SECRET` → `AUTH_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    load_or_create_secret(&jwt_secret_path())
}

/// Read the secret stored at `path`, or generate one and try to store it there.
///
/// A secret that cannot be persisted is still returned, but it will not
/// survive a restart and tokens signed with it stop verifying afterwards.
fn load_or_create_secret(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!(path = %parent.display(), error = %e, "cannot create JWT secret directory");
    }
    match std::fs::write(path, &secret) {
        Ok(()) => info!(path = %path.display(), "generated new JWT secret"),
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "generated JWT secret could not be persisted; sessions will not survive a restart"
        ),
    }
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chirpy")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-that-is-long-enough-for-hmac";

    fn hour() -> Duration {
        Duration::seconds(ACCESS_TOKEN_TTL_SECS)
    }

    #[test]
    fn round_trip_returns_subject() {
        let user = Uuid::new_v4();
        let token = make_access_token(user, SECRET, hour()).expect("mint");
        assert_eq!(verify_access_token(&token, SECRET).expect("verify"), user);
    }

    #[test]
    fn claims_carry_issuer_and_window() {
        let user = Uuid::new_v4();
        let token = make_access_token(user, SECRET, hour()).expect("mint");
        let claims = decode_claims(&token, SECRET).expect("decode");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.sub, user.to_string());
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL_SECS);
    }

    #[test]
    fn tokens_for_same_subject_differ() {
        let user = Uuid::new_v4();
        let a = make_access_token(user, SECRET, hour()).expect("mint");
        let b = make_access_token(user, SECRET, hour()).expect("mint");
        assert_ne!(a, b);
    }

    #[test]
    fn elapsed_ttl_is_expired() {
        let token =
            make_access_token(Uuid::new_v4(), SECRET, Duration::seconds(-5)).expect("mint");
        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let token = make_access_token(Uuid::new_v4(), SECRET, hour()).expect("mint");
        assert!(matches!(
            verify_access_token(&token, b"another-secret"),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_secret_on_expired_token_is_still_invalid_signature() {
        let token =
            make_access_token(Uuid::new_v4(), SECRET, Duration::seconds(-5)).expect("mint");
        assert!(matches!(
            verify_access_token(&token, b"another-secret"),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn other_hmac_algorithm_is_rejected() {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            iss: ISSUER.into(),
            sub: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + hour()).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encode");
        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            verify_access_token("not-a-jwt", SECRET),
            Err(AuthError::Malformed(_))
        ));
        assert!(matches!(
            verify_access_token("abc.def.ghi", SECRET),
            Err(AuthError::Malformed(_))
        ));
    }

    #[test]
    fn foreign_issuer_is_malformed() {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            iss: "someone-else".into(),
            sub: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + hour()).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &EncodingKey::from_secret(SECRET))
            .expect("encode");
        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(AuthError::Malformed(_))
        ));
    }

    #[test]
    fn non_uuid_subject_is_invalid_subject() {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            iss: ISSUER.into(),
            sub: "user-42".into(),
            iat: now.timestamp(),
            exp: (now + hour()).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &EncodingKey::from_secret(SECRET))
            .expect("encode");
        match verify_access_token(&token, SECRET) {
            Err(AuthError::InvalidSubject(sub)) => assert_eq!(sub, "user-42"),
            other => panic!("expected InvalidSubject, got {other:?}"),
        }
    }

    #[test]
    fn generated_secret_is_persisted_and_reused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chirpy").join("jwt-secret");

        let first = load_or_create_secret(&path);
        assert_eq!(first.len(), 64);
        assert_eq!(std::fs::read_to_string(&path).expect("persisted"), first);
        assert_eq!(load_or_create_secret(&path), first);
    }

    #[test]
    fn unwritable_secret_path_still_yields_a_secret() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").expect("write blocker");
        let path = blocker.join("jwt-secret");

        let secret = load_or_create_secret(&path);
        assert_eq!(secret.len(), 64);
        assert!(!path.exists());
    }
}
