pub mod otp;
pub mod password;
pub mod url_validator;

use rand::RngExt;

/// Generate a secure random token string (alphanumeric)
pub fn generate_secure_token(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_token_length() {
        assert_eq!(generate_secure_token(32).len(), 32);
        assert_eq!(generate_secure_token(0).len(), 0);
    }

    #[test]
    fn test_generate_secure_token_charset() {
        let token = generate_secure_token(64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
