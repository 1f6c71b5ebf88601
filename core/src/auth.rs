//! Authorization schemes and the header each one produces.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// How a request authenticates.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub enum AuthType {
    #[default]
    None,
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Basic <base64(username:password)>`
    Basic { username: String, password: String },
}

impl AuthType {
    pub fn bearer(token: impl Into<String>) -> Self {
        AuthType::Bearer(token.into())
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthType::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value for the `Authorization` header, or `None` when unauthenticated.
    pub fn header_value(&self) -> Option<String> {
        match self {
            AuthType::None => None,
            AuthType::Bearer(token) => Some(format!("Bearer {token}")),
            AuthType::Basic { username, password } => {
                let credentials = STANDARD.encode(format!("{username}:{password}"));
                Some(format!("Basic {credentials}"))
            }
        }
    }

    /// A bearer scheme was requested but no token is available.
    pub fn is_missing_token(&self) -> bool {
        matches!(self, AuthType::Bearer(token) if token.trim().is_empty())
    }
}

// Credentials never reach logs.
impl fmt::Debug for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::None => f.write_str("None"),
            AuthType::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            AuthType::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_produces_no_header() {
        assert_eq!(AuthType::None.header_value(), None);
    }

    #[test]
    fn bearer_header() {
        assert_eq!(
            AuthType::bearer("abc123").header_value().as_deref(),
            Some("Bearer abc123")
        );
    }

    #[test]
    fn basic_header_is_base64_of_user_colon_password() {
        // "Aladdin:open sesame" is the RFC 7617 example.
        assert_eq!(
            AuthType::basic("Aladdin", "open sesame").header_value().as_deref(),
            Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
        );
    }

    #[test]
    fn missing_token_detection() {
        assert!(AuthType::bearer("").is_missing_token());
        assert!(AuthType::bearer("  ").is_missing_token());
        assert!(!AuthType::bearer("t").is_missing_token());
        assert!(!AuthType::None.is_missing_token());
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", AuthType::basic("alice", "hunter2"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
        assert!(!format!("{:?}", AuthType::bearer("s3cret")).contains("s3cret"));
    }
}
