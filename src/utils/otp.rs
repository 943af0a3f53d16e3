//! One-time password helpers
//!
//! Numeric codes with a fixed TTL, stored on the user row and checked by
//! timestamp comparison at verification time.

use rand::RngExt;
use subtle::ConstantTimeEq;

/// Generate a numeric OTP of the given length (leading zeros allowed)
pub fn generate_otp(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Constant-time OTP comparison
///
/// Length mismatch short-circuits; equal-length codes are compared without
/// data-dependent branching.
pub fn otp_matches(submitted: &str, stored: &str) -> bool {
    let a = submitted.as_bytes();
    let b = stored.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
