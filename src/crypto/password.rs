use crate::error::{AppError, Result};
use argon2::{Algorithm, Argon2, ParamsBuilder, Version};
use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 1;
/// The length of the derived digest in bytes.
const HASH_LEN: usize = 32;
/// The length of a generated salt in bytes.
const SALT_LEN: usize = 16;

fn argon2() -> Result<Argon2<'static>> {
    let params = ParamsBuilder::new()
        .m_cost(ARGON2_MEMORY_MB * 1024)
        .t_cost(ARGON2_ITERATIONS)
        .p_cost(ARGON2_PARALLELISM)
        .output_len(HASH_LEN)
        .build()
        .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn derive(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; HASH_LEN]>> {
    let mut digest = Zeroizing::new([0u8; HASH_LEN]);
    argon2()?
        .hash_password_into(password.as_bytes(), salt, &mut digest[..])
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?;
    Ok(digest)
}

/// Generates a fresh random salt, hex-encoded.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    hex::encode(salt)
}

/// Hashes a password with Argon2id under the given hex-encoded salt.
///
/// # Returns
///
/// The hex-encoded digest.
pub fn hash_password(password: &str, salt: &str) -> Result<String> {
    let salt_bytes = hex::decode(salt)
        .map_err(|e| AppError::Internal(format!("Salt decoding error: {}", e)))?;
    let digest = derive(password, &salt_bytes)?;

    tracing::debug!("Password hashed successfully with Argon2");
    Ok(hex::encode(&digest[..]))
}

/// Verifies a password against a stored digest and salt.
///
/// The digest comparison is constant-time. Stored values that cannot be
/// decoded never match.
pub fn verify_password(password: &str, stored_hash: &str, salt: &str) -> bool {
    let (Ok(expected), Ok(salt_bytes)) = (hex::decode(stored_hash), hex::decode(salt)) else {
        tracing::warn!("Stored credentials are not valid hex");
        return false;
    };
    if expected.len() != HASH_LEN {
        tracing::warn!("Stored digest has unexpected length {}", expected.len());
        return false;
    }

    match derive(password, &salt_bytes) {
        Ok(digest) => bool::from(digest[..].ct_eq(&expected[..])),
        Err(e) => {
            tracing::error!("Password verification failed: {}", e);
            false
        }
    }
}
