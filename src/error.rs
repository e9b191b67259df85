use thiserror::Error;
use totp_rs::TotpUrlError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid base32 secret")]
    SecretFormat,
    #[error("totp parameters rejected: {0}")]
    Totp(#[from] TotpUrlError),
    #[error("qr rendering failed: {0}")]
    Qr(String),
    #[error("system clock before unix epoch")]
    Clock,
}
