//! Password encryption for the single-sign-on form.
//!
//! The identity server's login script expects the password encrypted with
//! AES-128-CBC: the page-provided salt is the key, the IV is a random
//! 16-character string, 64 random filler characters are prepended to the
//! password, PKCS7 padding, Base64 output. Reproduced here byte-for-byte
//! so the posted form is indistinguishable from the browser's.

use aes::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use coursehunt_core::AuthError;
use rand::Rng;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

/// Alphabet the identity server's own script draws random characters from.
const KEY_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTWXYZabcdefhijkmnprstwxyz2345678";

/// Random string over the server's alphabet.
pub fn random_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
        .collect()
}

/// Encrypts a password with the page-provided salt.
pub fn encrypt_password(password: &str, salt: &str) -> Result<String, AuthError> {
    let payload = format!("{}{password}", random_string(64));
    let iv = random_string(16);
    encrypt_cbc(payload.as_bytes(), salt.as_bytes(), iv.as_bytes())
}

fn encrypt_cbc(data: &[u8], key: &[u8], iv: &[u8]) -> Result<String, AuthError> {
    let cipher = Aes128CbcEnc::new_from_slices(key, iv)
        .map_err(|e| AuthError::Encryption(e.to_string()))?;
    Ok(STANDARD.encode(cipher.encrypt_padded_vec_mut::<Pkcs7>(data)))
}
