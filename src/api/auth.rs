//! Session token storage using the system keyring

use keyring::Entry;

use super::error::ApiError;
use super::models::Tokens;

/// Service name for keyring storage
const SERVICE_NAME: &str = "aitutor";
/// Entry name for the access token
const ACCESS_ENTRY: &str = "access-token";
/// Entry name for the refresh token
const REFRESH_ENTRY: &str = "refresh-token";

/// Persists the signed-in user's JWT pair between runs
pub struct TokenStore;

impl TokenStore {
    fn entry(name: &str) -> Result<Entry, ApiError> {
        Entry::new(SERVICE_NAME, name).map_err(|e| ApiError::KeyringError(e.to_string()))
    }

    fn read(name: &str) -> Result<String, ApiError> {
        Self::entry(name)?.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => ApiError::NotAuthenticated,
            _ => ApiError::KeyringError(e.to_string()),
        })
    }

    /// Load the stored token pair
    pub fn load() -> Result<Tokens, ApiError> {
        Ok(Tokens { access: Self::read(ACCESS_ENTRY)?, refresh: Self::read(REFRESH_ENTRY)? })
    }

    /// Store a token pair, replacing any previous one
    pub fn save(tokens: &Tokens) -> Result<(), ApiError> {
        if !Self::looks_like_jwt(&tokens.access) {
            tracing::warn!("Access token is not a JWT; storing anyway");
        }
        Self::entry(ACCESS_ENTRY)?
            .set_password(&tokens.access)
            .map_err(|e| ApiError::KeyringError(e.to_string()))?;
        Self::entry(REFRESH_ENTRY)?
            .set_password(&tokens.refresh)
            .map_err(|e| ApiError::KeyringError(e.to_string()))
    }

    /// Delete the stored tokens; missing entries are not an error
    pub fn clear() -> Result<(), ApiError> {
        for name in [ACCESS_ENTRY, REFRESH_ENTRY] {
            match Self::entry(name)?.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => return Err(ApiError::KeyringError(e.to_string())),
            }
        }
        Ok(())
    }

    /// JWTs are three non-empty dot-separated segments
    fn looks_like_jwt(token: &str) -> bool {
        let parts: Vec<&str> = token.split('.').collect();
        parts.len() == 3 && parts.iter().all(|p| !p.is_empty())
    }

    /// Mask a token for display (show first 8 and last 4 chars)
    pub fn mask_token(token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() <= 12 {
            return "*".repeat(chars.len());
        }
        let prefix: String = chars[..8].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_shape() {
        assert!(TokenStore::looks_like_jwt("eyJhbGciOi.eyJzdWIiOi.c2lnbmF0dXJl"));
        assert!(!TokenStore::looks_like_jwt("opaque-token"));
        assert!(!TokenStore::looks_like_jwt("a..c"));
    }

    #[test]
    fn mask_token() {
        let masked = TokenStore::mask_token("eyJhbGciOiJIUzI1NiJ9.payload.signature");
        assert!(masked.starts_with("eyJhbGci"));
        assert!(masked.ends_with("ture"));
        assert!(masked.contains("..."));
        assert_eq!(TokenStore::mask_token("short"), "*****");
    }

    #[test]
    fn mask_token_counts_characters_not_bytes() {
        assert_eq!(TokenStore::mask_token("αβγδεζηθικλμνξ"), "αβγδεζηθ...λμνξ");
        assert_eq!(TokenStore::mask_token("ééé"), "***");
    }
}
