//! Database credential generation

use rand::Rng;

pub const DEFAULT_PASSWORD_LENGTH: usize = 16;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

// Alphanumeric only: the value lands in env vars and connection URLs unescaped
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a fresh random password of `len` characters
pub fn generate_password(len: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
