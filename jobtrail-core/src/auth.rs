//! Mock OAuth redirect flow.
//!
//! There is no real identity provider: signing in means handing the app
//! the query string a provider's redirect would carry (`token=...` on
//! success, `error=...` on failure). The token is opaque and stored as
//! the session; the profile behind it is the local demo profile.

use crate::error::{Error, Result};

/// Outcome of an OAuth-style callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    /// The opaque token from the provider redirect
    pub token: String,
    /// Provider hint, when the redirect included one
    pub provider: Option<String>,
}

/// Parse a callback query string (`token=...&provider=google` or
/// `error=access_denied`).
///
/// An `error` parameter wins over anything else; a callback without a
/// token is rejected rather than treated as signed in.
pub fn parse_callback(query: &str) -> Result<Callback> {
    let query = query.trim().trim_start_matches('?');

    let mut token = None;
    let mut provider = None;
    let mut error = None;

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(value)
            .map_err(|e| Error::Auth(format!("malformed callback parameter {}: {}", key, e)))?
            .into_owned();
        match key {
            "token" => token = Some(value),
            "provider" => provider = Some(value),
            "error" => error = Some(value),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(Error::Auth(format!("provider returned an error: {}", error)));
    }

    match token {
        Some(token) if !token.is_empty() => Ok(Callback { token, provider }),
        _ => Err(Error::Auth("no authentication token received".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_callback() {
        let cb = parse_callback("token=abc123&provider=google").unwrap();
        assert_eq!(cb.token, "abc123");
        assert_eq!(cb.provider.as_deref(), Some("google"));
    }

    #[test]
    fn test_leading_question_mark_and_encoding() {
        let cb = parse_callback("?token=a%2Bb").unwrap();
        assert_eq!(cb.token, "a+b");
        assert_eq!(cb.provider, None);
    }

    #[test]
    fn test_error_parameter_wins() {
        let err = parse_callback("token=abc&error=access_denied").unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn test_missing_token_rejected() {
        assert!(parse_callback("").is_err());
        assert!(parse_callback("provider=google").is_err());
        assert!(parse_callback("token=").is_err());
    }
}
