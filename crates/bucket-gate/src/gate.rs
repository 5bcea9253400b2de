use std::fmt;

use subtle::ConstantTimeEq;

use crate::error::AuthError;

/// The only accepted authorization scheme.
pub const BEARER_SCHEME: &str = "Bearer";

/// The shared secret clients must present.
///
/// Loaded once at startup and never printed: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// A secret that can actually be presented in a `Bearer` header:
    /// non-empty and free of whitespace.
    pub fn is_presentable(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }

    /// Constant-time, byte-for-byte comparison.
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Outcome of gating one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Admit,
    Reject(AuthError),
}

impl AccessDecision {
    pub fn is_admit(&self) -> bool {
        matches!(self, Self::Admit)
    }

    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Self::Admit => Ok(()),
            Self::Reject(err) => Err(err),
        }
    }
}

/// Bearer-token gate in front of every blob operation.
///
/// Pure: deciding has no side effects and nothing is retried. Short-circuiting
/// the request on [`AccessDecision::Reject`] is the caller's job.
#[derive(Clone, Debug)]
pub struct AccessGate {
    expected: Credential,
}

impl AccessGate {
    pub fn new(expected: Credential) -> Self {
        Self { expected }
    }

    /// Decide on a raw `Authorization` header value (`None` if absent).
    pub fn authorize(&self, header: Option<&str>) -> AccessDecision {
        match self.check(header) {
            Ok(()) => AccessDecision::Admit,
            Err(err) => {
                tracing::debug!(reason = err.as_str(), "access rejected");
                AccessDecision::Reject(err)
            }
        }
    }

    fn check(&self, header: Option<&str>) -> Result<(), AuthError> {
        let header = header.filter(|h| !h.is_empty()).ok_or(AuthError::Missing)?;

        let mut parts = header.split(' ');
        let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) => (scheme, token),
            _ => return Err(AuthError::Malformed),
        };
        if scheme != BEARER_SCHEME {
            return Err(AuthError::Malformed);
        }
        if !self.expected.matches(token) {
            return Err(AuthError::Mismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gate() -> AccessGate {
        AccessGate::new(Credential::new("s3cr3t"))
    }

    #[test]
    fn exact_bearer_header_is_admitted() {
        assert_eq!(gate().authorize(Some("Bearer s3cr3t")), AccessDecision::Admit);
    }

    #[test]
    fn absent_or_empty_header_is_missing() {
        assert_eq!(gate().authorize(None), AccessDecision::Reject(AuthError::Missing));
        assert_eq!(gate().authorize(Some("")), AccessDecision::Reject(AuthError::Missing));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        for header in [
            "s3cr3t",
            "Bearer",
            "Bearer  s3cr3t",
            "Bearer s3cr3t extra",
            "Bearer\ts3cr3t",
            " Bearer s3cr3t",
            "bearer s3cr3t",
            "Basic s3cr3t",
        ] {
            assert_eq!(
                gate().authorize(Some(header)),
                AccessDecision::Reject(AuthError::Malformed),
                "{header:?}"
            );
        }
    }

    #[test]
    fn wrong_token_is_mismatch() {
        for header in ["Bearer S3CR3T", "Bearer s3cr3", "Bearer s3cr3tt", "Bearer "] {
            assert_eq!(
                gate().authorize(Some(header)),
                AccessDecision::Reject(AuthError::Mismatch),
                "{header:?}"
            );
        }
    }

    #[test]
    fn decision_into_result() {
        assert_eq!(AccessDecision::Admit.into_result(), Ok(()));
        assert_eq!(
            AccessDecision::Reject(AuthError::Mismatch).into_result(),
            Err(AuthError::Mismatch)
        );
        assert!(!AccessDecision::Reject(AuthError::Missing).is_admit());
    }

    #[test]
    fn credential_debug_is_redacted() {
        let rendered = format!("{:?}", gate());
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn presentable_credentials() {
        assert!(Credential::new("abc123").is_presentable());
        assert!(!Credential::new("").is_presentable());
        assert!(!Credential::new("two words").is_presentable());
    }

    proptest! {
        #[test]
        fn admits_iff_exact_bearer(secret in "[!-~]{1,32}", header in "[ -~]{0,48}") {
            let gate = AccessGate::new(Credential::new(secret.clone()));
            let expected = format!("Bearer {secret}");
            prop_assert_eq!(gate.authorize(Some(&header)).is_admit(), header == expected);
            prop_assert!(gate.authorize(Some(&expected)).is_admit());
        }
    }
}
