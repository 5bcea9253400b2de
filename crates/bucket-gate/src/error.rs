/// Why the gate rejected a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or an empty one.
    #[error("authorization header is missing")]
    Missing,

    /// The header is not of the form `Bearer <token>`.
    #[error("authorization header is malformed")]
    Malformed,

    /// Well-formed header carrying the wrong token.
    #[error("bearer token does not match")]
    Mismatch,
}

impl AuthError {
    /// Short machine-friendly label for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Malformed => "malformed",
            Self::Mismatch => "mismatch",
        }
    }
}
