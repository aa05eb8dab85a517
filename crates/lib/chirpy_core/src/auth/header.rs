//! `Authorization` header parsing.
//!
//! Purely syntactic: the scheme prefix must match exactly (case and the
//! trailing space included). The extracted value is not inspected.

use http::HeaderMap;
use http::header::AUTHORIZATION;

use super::AuthError;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract(headers, BEARER_PREFIX)
}

/// Extract the key from `Authorization: ApiKey <key>`.
pub fn api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract(headers, API_KEY_PREFIX)
}

fn extract<'a>(headers: &'a HeaderMap, prefix: &str) -> Result<&'a str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(prefix))
        .ok_or(AuthError::MissingCredential)
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).expect("header"));
        map
    }

    #[test]
    fn bearer_is_extracted() {
        let h = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&h).expect("bearer"), "abc.def.ghi");
    }

    #[test]
    fn api_key_is_extracted() {
        let h = headers("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(
            api_key(&h).expect("key"),
            "f271c81ff7084ee5b99a5091b42d486e"
        );
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            api_key(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn near_miss_prefixes_are_rejected() {
        for value in ["Token xyz", "bearer xyz", "BEARER xyz", "Bearerxyz", "Bearer"] {
            assert!(
                matches!(bearer_token(&headers(value)), Err(AuthError::MissingCredential)),
                "{value:?} should be rejected"
            );
        }
        for value in ["apikey xyz", "ApiKeyxyz", "Bearer xyz"] {
            assert!(
                matches!(api_key(&headers(value)), Err(AuthError::MissingCredential)),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn value_content_is_not_validated() {
        assert_eq!(bearer_token(&headers("Bearer  two spaces")).expect("bearer"), " two spaces");
    }
}
