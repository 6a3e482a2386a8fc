use rand::RngCore;
use rand::rngs::OsRng;

/// The number of random bytes behind a session token.
pub const SESSION_TOKEN_BYTES: usize = 512;
/// The length of a hex-encoded session token.
pub const SESSION_TOKEN_LEN: usize = SESSION_TOKEN_BYTES * 2;

/// Generates a new random session token.
///
/// # Returns
///
/// A lowercase hex-encoded token of exactly [`SESSION_TOKEN_LEN`] characters.
pub fn generate_session_token() -> String {
    let mut token = vec![0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut token);

    hex::encode(token)
}

/// Whether `token` has the shape of a token produced by [`generate_session_token`].
pub fn is_well_formed(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LEN
        && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// A short, loggable prefix of a token.
pub fn redact(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
