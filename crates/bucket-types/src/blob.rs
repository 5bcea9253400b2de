use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of the hex-encoded digest that prefixes every derived [`BlobId`].
pub const DIGEST_HEX_LEN: usize = 64;

/// Longest id the store can hold: one file name on common filesystems.
pub const MAX_ID_LEN: usize = 255;

/// Public name of a stored blob, doubling as its file name under the
/// storage root.
///
/// A derived `BlobId` is the hex digest of (upload instant ‖ content)
/// followed by the extension of the client-supplied filename, e.g.
/// `9f86d0…0f00a08.txt`. Because the digest is salted with the upload
/// instant, uploading the same bytes twice yields two different ids.
///
/// Ids arriving from clients go through [`BlobId::parse`], which accepts any
/// name that is safe to resolve under the storage root. A well-formed but
/// unknown id is a lookup miss, not a parse error.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobId(String);

impl BlobId {
    /// Build the id for a freshly hashed upload.
    pub fn from_digest(digest: &[u8; 32], filename: &str) -> Self {
        let mut id = hex::encode(digest);
        id.push_str(extension_of(filename));
        Self(id)
    }

    /// Validate an id presented by a client.
    ///
    /// Rejects empty ids, path separators, control characters and names
    /// starting with `.`, which covers `.`, `..` and in-flight staging files.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        if raw.is_empty() {
            return Err(TypeError::EmptyIdentifier);
        }
        let reason = if raw.contains(['/', '\\']) {
            Some("contains a path separator")
        } else if raw.chars().any(char::is_control) {
            Some("contains a control character")
        } else if raw.starts_with('.') {
            Some("names starting with '.' are reserved")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(TypeError::InvalidIdentifier {
                id: raw.to_string(),
                reason,
            }),
            None => Ok(Self(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The extension suffix, including the leading dot. Empty if none.
    pub fn extension(&self) -> &str {
        extension_of(&self.0)
    }

    /// The id without its extension suffix.
    pub fn stem(&self) -> &str {
        &self.0[..self.0.len() - self.extension().len()]
    }

    /// Whether the id fits in a single file name under the storage root.
    /// Derived ids always do.
    pub fn fits_name_limit(&self) -> bool {
        self.0.len() <= MAX_ID_LEN
    }
}

/// Extension of the last path component of `filename`, from the last `.`
/// inclusive. Empty when there is no dot, the suffix holds control
/// characters, or it would push a derived id past [`MAX_ID_LEN`].
pub fn extension_of(filename: &str) -> &str {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rfind('.') {
        Some(idx)
            if name.len() - idx <= MAX_ID_LEN - DIGEST_HEX_LEN
                && !name[idx..].chars().any(char::is_control) =>
        {
            &name[idx..]
        }
        _ => "",
    }
}

impl fmt::Debug for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobId({})", self.0)
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BlobId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BlobId> for String {
    fn from(id: BlobId) -> Self {
        id.0
    }
}
