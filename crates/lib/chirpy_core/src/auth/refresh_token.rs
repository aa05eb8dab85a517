//! Opaque refresh token generation.

use rand::TryRngCore;
use rand::rngs::OsRng;

use super::AuthError;

/// Refresh token lifetime: 60 days.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Number of random bytes behind each token.
const TOKEN_BYTES: usize = 32;

/// Generate a refresh token: 32 bytes from the OS CSPRNG as 64 lowercase hex chars.
pub fn generate_refresh_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Entropy(e.to_string()))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}
