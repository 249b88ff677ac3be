//! Bearer-token extraction from the `Authorization` header.

/// Extract the token from an `Authorization` header value.
///
/// The value must start with the literal `"Bearer "` prefix (case-sensitive,
/// single space); everything after the prefix is the token. Only the prefix is
/// checked: `"Bearer "` yields an empty token, not absent. Token validity is
/// the identity service's call, not ours.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::bearer_token;

    #[test]
    fn extracts_token_after_prefix() {
        assert_eq!(bearer_token(Some("Bearer abc123")), Some("abc123"));
    }

    #[test]
    fn empty_token_is_not_absent() {
        // Prefix check only: an empty remainder is still a token.
        assert_eq!(bearer_token(Some("Bearer ")), Some(""));
    }

    #[test]
    fn missing_header_is_absent() {
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn non_bearer_values_are_absent() {
        assert_eq!(bearer_token(Some("")), None);
        assert_eq!(bearer_token(Some("bearer abc123")), None);
        assert_eq!(bearer_token(Some("Token abc123")), None);
        assert_eq!(bearer_token(Some("Bearer")), None);
    }
}
