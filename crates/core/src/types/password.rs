//! Password-at-rest representation.
//!
//! The storefront intentionally uses a reversible, text-safe encoding
//! (standard base64 over the UTF-8 bytes) rather than real password hashing.
//! This is a deliberately weak scheme carried over from the deployed demo;
//! the type exists to keep its comparison rules in one place:
//!
//! - a stored value matches when it equals the encoding of the input, or
//!   when its decoded form equals the input;
//! - values that do not decode as base64/UTF-8 are treated as legacy
//!   plaintext and compared verbatim;
//! - legacy plaintext records are detected so the auth service can
//!   transparently re-encode them on a successful login.
//!
//! Do not reuse this type anywhere that needs actual credential security.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// A password as persisted inside a user record.
///
/// Wraps the raw stored string, which is either the base64 encoding of the
/// password or (for records written by older versions) the plaintext itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredPassword(String);

impl StoredPassword {
    /// Encode a plaintext password into its at-rest form.
    #[must_use]
    pub fn encode(plain: &str) -> Self {
        Self(STANDARD.encode(plain.as_bytes()))
    }

    /// Wrap a value exactly as read from storage.
    #[must_use]
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw stored string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decoded form of the stored value.
    ///
    /// Falls back to the stored string itself when it is not valid
    /// base64/UTF-8, which is how legacy plaintext records compare equal.
    #[must_use]
    pub fn decoded(&self) -> String {
        STANDARD
            .decode(&self.0)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_else(|| self.0.clone())
    }

    /// Whether `plain` is the password this record stores.
    #[must_use]
    pub fn matches(&self, plain: &str) -> bool {
        self.0 == STANDARD.encode(plain.as_bytes()) || self.decoded() == plain
    }

    /// Whether this record stores `plain` un-encoded.
    ///
    /// True only for records written before encoding was introduced; the
    /// auth service re-encodes them after a successful match.
    #[must_use]
    pub fn is_legacy_plaintext(&self, plain: &str) -> bool {
        self.0 == plain && self.0 != STANDARD.encode(plain.as_bytes())
    }
}

// Keep stored credentials out of debug output.
impl core::fmt::Debug for StoredPassword {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("StoredPassword([REDACTED])")
    }
}
