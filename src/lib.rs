//! Two-factor second factors: TOTP enrollment secrets, current-token
//! generation and verification, plus backup recovery codes.
//!
//! The RFC 6238 algorithm and QR rendering are delegated to `totp-rs`; this
//! crate owns the enrollment artifact shape, the recovery-code policy, and
//! the verification fallback order (TOTP first, recovery codes second).
//! Nothing here touches storage: callers persist the secret and the
//! recovery-code batch, and remove a recovery code once it has been used.

pub mod config;
pub mod error;
pub mod manager;
pub mod recovery;

pub use config::TwoFactorConfig;
pub use error::Error;
pub use manager::{TwoFactorManager, TwoFactorSecret};
pub use recovery::{DEFAULT_RECOVERY_CODE_COUNT, RECOVERY_CODE_LEN};
