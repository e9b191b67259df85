//! Two-factor manager: TOTP enrollment secrets, token generation, and the
//! verification fallback policy (TOTP check first, recovery codes second).

use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use totp_rs::{Algorithm, Secret, TOTP};
use tracing::debug;

use crate::{config::TwoFactorConfig, error::Error, recovery};

const TOTP_DIGITS: usize = 6;
const TOTP_SKEW: u8 = 1;
const TOTP_STEP_SECONDS: u64 = 30;

// Label used when rebuilding a TOTP instance for checking; it only shows up
// in provisioning URIs and does not participate in code verification.
const VERIFY_LABEL: &str = "user";

/// Enrollment artifacts for one user.
///
/// The caller owns persistence of `secret`; `uri` and `qr` are display-only
/// and can be re-derived from the secret at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoFactorSecret {
    /// Base32-encoded shared secret (RFC 4648, no padding).
    pub secret: String,
    /// `otpauth://totp/...` provisioning URI embedding issuer, label and
    /// secret, as consumed by authenticator apps.
    pub uri: String,
    /// The provisioning URI rendered as a QR code,
    /// `data:image/png;base64,...`, ready for an `<img>` source.
    pub qr: String,
}

/// Issues and verifies TOTP second factors and recovery codes.
///
/// Stateless over `&self` apart from the read-only config: every operation
/// is a pure function of its arguments, the system clock and the OS random
/// source, so a single manager can be shared across threads freely.
#[derive(Clone, Debug)]
pub struct TwoFactorManager {
    config: TwoFactorConfig,
}

impl TwoFactorManager {
    #[must_use]
    pub fn new(config: TwoFactorConfig) -> Self {
        Self { config }
    }

    /// Begin enrollment for a user: draw a fresh random secret and derive
    /// the provisioning URI plus its QR data URL.
    ///
    /// `user_info` is the account label shown in authenticator apps, an
    /// email address in the common case.
    ///
    /// # Errors
    /// Returns an error if the configured secret length is below the
    /// RFC 6238 minimum, the issuer or label is rejected for the
    /// provisioning URI, or QR rendering fails.
    pub fn generate_secret(&self, user_info: &str) -> Result<TwoFactorSecret, Error> {
        let mut seed = vec![0u8; self.config.secret_bytes()];
        OsRng.fill_bytes(&mut seed);

        let totp = self.build_totp(seed, user_info.to_string())?;
        let qr = totp.get_qr_base64().map_err(Error::Qr)?;

        debug!(
            label = user_info,
            secret_bytes = self.config.secret_bytes(),
            "generated two-factor secret"
        );

        Ok(TwoFactorSecret {
            secret: totp.get_secret_base32(),
            uri: totp.get_url(),
            qr: format!("data:image/png;base64,{qr}"),
        })
    }

    /// Generate `count` recovery codes; see [`crate::recovery`] for the
    /// code shape and the caller's storage obligations.
    #[must_use]
    pub fn generate_recovery_codes(&self, count: usize) -> Vec<String> {
        recovery::generate_batch(count)
    }

    /// Compute the current TOTP value for a base32 secret.
    ///
    /// # Errors
    /// Returns an error if the secret is not valid base32, is too short, or
    /// the system clock reads before the Unix epoch.
    pub fn generate_token(&self, secret: &str) -> Result<String, Error> {
        let totp = self.totp_for_secret(secret)?;
        totp.generate_current().map_err(|_| Error::Clock)
    }

    /// Verify a candidate token against the secret, falling back to the
    /// recovery-code list.
    ///
    /// The TOTP check runs inside an error boundary: a malformed secret, a
    /// rejected seed or a clock failure all count as "invalid" rather than
    /// aborting, so the recovery fallback is always reached. Only a
    /// successful TOTP check short-circuits it. Recovery matching is exact
    /// string equality against the stored form; a matched code must be
    /// removed from the caller's store, nothing here enforces single use.
    #[must_use]
    pub fn verify_token(&self, secret: &str, token: &str, recovery_codes: &[String]) -> bool {
        let otp_valid = self.check_otp(secret, token).unwrap_or(false);
        if otp_valid {
            debug!("token accepted by totp check");
            return true;
        }

        let recovered = recovery_codes.iter().any(|code| code == token);
        if recovered {
            debug!("token accepted via recovery code fallback");
        }
        recovered
    }

    fn check_otp(&self, secret: &str, token: &str) -> Result<bool, Error> {
        let totp = self.totp_for_secret(secret)?;
        totp.check_current(token).map_err(|_| Error::Clock)
    }

    fn totp_for_secret(&self, secret: &str) -> Result<TOTP, Error> {
        let seed = Secret::Encoded(secret.to_string())
            .to_bytes()
            .map_err(|_| Error::SecretFormat)?;
        self.build_totp(seed, VERIFY_LABEL.to_string())
    }

    fn build_totp(&self, seed: Vec<u8>, label: String) -> Result<TOTP, Error> {
        Ok(TOTP::new(
            Algorithm::SHA1,
            TOTP_DIGITS,
            TOTP_SKEW,
            TOTP_STEP_SECONDS,
            seed,
            Some(self.config.issuer().to_string()),
            label,
        )?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{TwoFactorConfig, TwoFactorManager};

    fn manager() -> TwoFactorManager {
        TwoFactorManager::new(TwoFactorConfig::new("Acme"))
    }

    #[test]
    fn generated_token_round_trips() {
        let manager = manager();
        let enrollment = manager.generate_secret("alice@acme.com").unwrap();

        let token = manager.generate_token(&enrollment.secret).unwrap();
        assert_eq!(token.len(), 6);
        assert!(manager.verify_token(&enrollment.secret, &token, &[]));
    }

    #[test]
    fn uri_embeds_secret_and_issuer() {
        let manager = manager();
        let enrollment = manager.generate_secret("alice@acme.com").unwrap();

        assert!(enrollment.uri.starts_with("otpauth://totp/"));
        assert!(enrollment.uri.contains(&enrollment.secret));
        assert!(enrollment.uri.contains("Acme"));
        assert!(enrollment.qr.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn invalid_token_with_no_recovery_codes_is_rejected() {
        let manager = manager();
        let enrollment = manager.generate_secret("alice@acme.com").unwrap();

        assert!(!manager.verify_token(&enrollment.secret, "not-a-token", &[]));
    }

    #[test]
    fn recovery_code_matches_even_when_totp_check_fails() {
        let manager = manager();
        let enrollment = manager.generate_secret("alice@acme.com").unwrap();
        let codes = manager.generate_recovery_codes(3);

        assert!(manager.verify_token(&enrollment.secret, &codes[1], &codes));
    }

    #[test]
    fn malformed_secret_still_reaches_the_recovery_fallback() {
        let manager = manager();
        let codes = vec!["ABCDE FGHIJ".to_string()];

        // Not base32 at all: the TOTP leg errors internally, which must read
        // as "invalid" and fall through rather than abort verification.
        assert!(manager.verify_token("not base32!!", "ABCDE FGHIJ", &codes));
        assert!(!manager.verify_token("not base32!!", "123456", &codes));
    }

    #[test]
    fn empty_secret_and_token_are_rejected() {
        let manager = manager();
        assert!(!manager.verify_token("", "", &[]));
    }

    #[test]
    fn short_secret_config_is_rejected_at_generation() {
        let manager =
            TwoFactorManager::new(TwoFactorConfig::new("Acme").with_secret_bytes(8));
        assert!(manager.generate_secret("alice@acme.com").is_err());
    }
}
