//! Two-factor configuration, fixed at manager construction.

const DEFAULT_SECRET_BYTES: usize = 20;

/// Issuer identity and secret sizing for a [`TwoFactorManager`].
///
/// [`TwoFactorManager`]: crate::TwoFactorManager
#[derive(Clone, Debug)]
pub struct TwoFactorConfig {
    issuer: String,
    secret_bytes: usize,
}

impl TwoFactorConfig {
    /// Create a configuration for the given issuer with a 20-byte (160-bit)
    /// secret, the RFC 4226 recommended seed size.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            secret_bytes: DEFAULT_SECRET_BYTES,
        }
    }

    /// Override the secret seed length in bytes.
    ///
    /// Values below 16 fall under the RFC 6238 minimum and are rejected when
    /// the secret is first used to build a TOTP instance.
    #[must_use]
    pub fn with_secret_bytes(mut self, secret_bytes: usize) -> Self {
        self.secret_bytes = secret_bytes;
        self
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn secret_bytes(&self) -> usize {
        self.secret_bytes
    }
}
