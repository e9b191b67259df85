//! Recovery code generation.
//!
//! Recovery codes are backup second factors for when the TOTP device is
//! unavailable. This module only generates them: the caller persists the
//! batch and removes each code from its store once consumed, since nothing
//! here tracks single use.

use rand::{rngs::OsRng, Rng};

/// Batch size used when the caller has no preference.
pub const DEFAULT_RECOVERY_CODE_COUNT: usize = 16;

/// Characters per code, not counting the readability space.
pub const RECOVERY_CODE_LEN: usize = 10;

const RECOVERY_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate `count` independently drawn recovery codes.
///
/// Codes in a batch are not checked against each other for uniqueness; the
/// 36^10 keyspace makes collisions negligible.
#[must_use]
pub fn generate_batch(count: usize) -> Vec<String> {
    let mut rng = OsRng;
    generate_batch_with_rng(&mut rng, count)
}

fn generate_batch_with_rng<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| generate_code(rng, RECOVERY_CODE_LEN))
        .collect()
}

/// Generate one code: `length` uniform draws over the 36-symbol alphabet,
/// then a single space inserted at `length / 2` for readability. The space
/// does not change the character content; odd lengths put the shorter half
/// first.
fn generate_code<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let mut code = String::with_capacity(length + 1);
    for _ in 0..length {
        // gen_range keeps the draw unbiased: 36 does not divide 256, so
        // reducing a raw byte with a modulo would skew towards A-D.
        let idx = rng.gen_range(0..RECOVERY_CODE_ALPHABET.len());
        code.push(RECOVERY_CODE_ALPHABET[idx] as char);
    }
    code.insert(length / 2, ' ');
    code
}
