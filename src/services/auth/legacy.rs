//! Pre-resolver auth surface, retained for call sites that have not migrated.
//!
//! Nothing in this crate calls these; external callers still do.

#![allow(dead_code)]

/// Wrapper returned by [`verify_token`]. Carries the raw token and nothing
/// else; holding one of these proves nothing about the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyToken {
    pub token: String,
}

/// Bearer-token extraction under its old name.
#[deprecated(note = "use services::auth::bearer::bearer_token")]
pub fn extract_token(auth_header: Option<&str>) -> Option<&str> {
    auth_header?.strip_prefix("Bearer ")
}

/// Compatibility stub: wraps the token WITHOUT verifying it.
///
/// Verification moved to the identity service (see `UserResolver`); this
/// passthrough stays behaviorally inert because old call sites depend on it
/// being one. Do not make it verify.
#[deprecated(note = "passthrough only; resolve users via UserResolver")]
pub fn verify_token(token: &str) -> LegacyToken {
    LegacyToken {
        token: token.to_string(),
    }
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;

    #[test]
    fn extract_token_matches_the_current_helper() {
        assert_eq!(extract_token(Some("Bearer abc123")), Some("abc123"));
        assert_eq!(extract_token(Some("bearer abc123")), None);
        assert_eq!(extract_token(None), None);
    }

    #[test]
    fn verify_token_wraps_the_exact_input() {
        let wrapped = verify_token("anything at all");
        assert_eq!(
            wrapped,
            LegacyToken {
                token: "anything at all".to_string()
            }
        );
    }
}
