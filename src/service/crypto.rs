use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha3::Sha3_256;
use subtle::ConstantTimeEq;
use tokio::task;

use crate::errors::BoothError;

const SCHEME: &str = "pbkdf2-sha3-256";
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;
pub const HASH_ITERATIONS: u32 = 100_000;

fn derive(pwd: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha3_256>(pwd.as_bytes(), salt, iterations, &mut key);
    key
}

/// Hashes `pwd` with a fresh random salt.
/// Output: `pbkdf2-sha3-256$<iterations>$<salt hex>$<key hex>`.
pub fn hash_password(pwd: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let key = derive(pwd, &salt, HASH_ITERATIONS);
    format!(
        "{SCHEME}${HASH_ITERATIONS}${}${}",
        hex::encode(salt),
        hex::encode(key)
    )
}

/// Checks `pwd` against an encoded hash. Malformed encodings never verify.
pub fn verify_password(pwd: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let (Ok(iterations), Ok(salt), Ok(expected)) = (
        iterations.parse::<u32>(),
        hex::decode(salt),
        hex::decode(expected),
    ) else {
        return false;
    };
    if iterations == 0 {
        return false;
    }
    let actual = derive(pwd, &salt, iterations);
    actual.len() == expected.len() && actual.as_slice().ct_eq(expected.as_slice()).unwrap_u8() == 1
}

/// [`hash_password`] on the blocking pool.
pub async fn hash(pwd: String) -> Result<String, BoothError> {
    task::spawn_blocking(move || hash_password(&pwd))
        .await
        .map_err(|e| BoothError::Store(format!("password hashing task failed: {e}")))
}

/// [`verify_password`] on the blocking pool.
pub async fn verify(pwd: String, encoded: String) -> Result<bool, BoothError> {
    task::spawn_blocking(move || verify_password(&pwd, &encoded))
        .await
        .map_err(|e| BoothError::Store(format!("password check task failed: {e}")))
}
