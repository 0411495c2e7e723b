//! Passphrase-based AES-256-GCM encryption.
//!
//! Ciphertext layout before base64: `version (1) || salt (16) || nonce (12) ||
//! ciphertext+tag`. The key is derived per ciphertext with Argon2id, so the
//! same plaintext never encrypts to the same string twice.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;
use zeroize::Zeroizing;

use super::{VaultError, VaultResult};

const FORMAT_VERSION: u8 = 1;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;
const HEADER_LEN: usize = 1 + SALT_LEN + NONCE_LEN;

/// Encrypt `plaintext` under `passphrase`.
pub fn encrypt(plaintext: &str, passphrase: &str) -> VaultResult<String> {
    if plaintext.is_empty() {
        return Err(VaultError::EmptyPlaintext);
    }
    if passphrase.is_empty() {
        return Err(VaultError::EmptyPassphrase);
    }

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(passphrase, &salt)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let sealed = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|error| VaultError::Encryption(error.to_string()))?;

    let mut output = Vec::with_capacity(HEADER_LEN + sealed.len());
    output.push(FORMAT_VERSION);
    output.extend_from_slice(&salt);
    output.extend_from_slice(nonce.as_slice());
    output.extend_from_slice(&sealed);
    Ok(STANDARD.encode(output))
}

/// Decrypt a string produced by [`encrypt`].
///
/// A wrong passphrase and a tampered ciphertext both fail the tag check and
/// are reported as [`VaultError::Decryption`].
pub fn decrypt(ciphertext: &str, passphrase: &str) -> VaultResult<String> {
    if passphrase.is_empty() {
        return Err(VaultError::EmptyPassphrase);
    }

    let raw = STANDARD
        .decode(ciphertext.trim())
        .map_err(|_| VaultError::MalformedCiphertext("not valid base64"))?;
    if raw.len() < HEADER_LEN + TAG_LEN {
        return Err(VaultError::MalformedCiphertext("too short"));
    }
    if raw[0] != FORMAT_VERSION {
        return Err(VaultError::UnsupportedVersion(raw[0]));
    }

    let salt = &raw[1..=SALT_LEN];
    let nonce = Nonce::from_slice(&raw[1 + SALT_LEN..HEADER_LEN]);
    let key = derive_key(passphrase, salt)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
    let plain = Zeroizing::new(
        cipher
            .decrypt(nonce, &raw[HEADER_LEN..])
            .map_err(|_| VaultError::Decryption)?,
    );
    String::from_utf8(plain.to_vec()).map_err(|_| VaultError::Decryption)
}

fn derive_key(passphrase: &str, salt: &[u8]) -> VaultResult<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(
        Params::DEFAULT_M_COST,
        Params::DEFAULT_T_COST,
        Params::DEFAULT_P_COST,
        Some(KEY_LEN),
    )
    .map_err(|error| VaultError::KeyDerivation(error.to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(passphrase.as_bytes(), salt, key.as_mut_slice())
        .map_err(|error| VaultError::KeyDerivation(error.to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_recovers_plaintext() {
        let plain = r#"{"website":"example.com","username":"alice","password":"hunter22"}"#;
        let sealed = encrypt(plain, "correct horse").unwrap();
        assert_ne!(sealed, plain);
        assert_eq!(decrypt(&sealed, "correct horse").unwrap(), plain);
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let first = encrypt("secret", "passphrase").unwrap();
        let second = encrypt("secret", "passphrase").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn wrong_passphrase_fails_cleanly() {
        let sealed = encrypt("secret", "passphrase-one").unwrap();
        assert!(matches!(
            decrypt(&sealed, "passphrase-two"),
            Err(VaultError::Decryption)
        ));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let sealed = encrypt("secret", "passphrase").unwrap();
        let mut raw = STANDARD.decode(&sealed).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = STANDARD.encode(raw);
        assert!(matches!(
            decrypt(&tampered, "passphrase"),
            Err(VaultError::Decryption)
        ));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(encrypt("", "passphrase"), Err(VaultError::EmptyPlaintext)));
        assert!(matches!(encrypt("secret", ""), Err(VaultError::EmptyPassphrase)));
    }

    #[test]
    fn garbage_input_is_malformed() {
        assert!(matches!(
            decrypt("%%%not base64%%%", "passphrase"),
            Err(VaultError::MalformedCiphertext(_))
        ));
        assert!(matches!(
            decrypt(&STANDARD.encode([1u8; 8]), "passphrase"),
            Err(VaultError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let sealed = encrypt("secret", "passphrase").unwrap();
        let mut raw = STANDARD.decode(&sealed).unwrap();
        raw[0] = 9;
        assert!(matches!(
            decrypt(&STANDARD.encode(raw), "passphrase"),
            Err(VaultError::UnsupportedVersion(9))
        ));
    }
}
