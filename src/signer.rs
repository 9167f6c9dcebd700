//! Detached signatures over serialized transaction bytes
//!
//! The codecs never link a signature backend directly; callers hand them a
//! [`Signer`]. Two schemes are provided:
//!
//! - [`Ed25519Signer`]: native chain, Ed25519 over SHA-256(message)
//! - [`Secp256k1Signer`]: Bitcoin family, ECDSA over SHA256d(message), compact 64-byte form

use crate::constants::*;
use crate::error::{CodecError, Result};
use crate::types::ByteString;
use bitcoin_hashes::{sha256d, Hash as BitcoinHash};
use ed25519_dalek::{Signature as DalekSignature, Signer as _, SigningKey, VerifyingKey};
use secp256k1::{ecdsa, Message, PublicKey, Secp256k1, SecretKey};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;

/// Signature capability injected into signing flows
pub trait Signer {
    /// Fixed width of every signature this scheme produces
    fn signature_length(&self) -> usize {
        SIGNATURE_LENGTH
    }

    fn sign(&self, message: &[u8], private_key: &[u8]) -> Result<ByteString>;

    /// Check length first, then the signature itself
    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<()>;

    fn is_valid(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        self.verify(message, signature, public_key).is_ok()
    }
}

fn check_signature_length(signature: &[u8], expected: usize) -> Result<()> {
    if signature.len() != expected {
        return Err(CodecError::InvalidSignatureLength {
            expected,
            found: signature.len(),
        });
    }
    Ok(())
}

fn fixed<const N: usize>(bytes: &[u8], err: CodecError) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| err)
}

/// Key pair held only for the duration of a signing operation
///
/// Deliberately not `Serialize`; `Debug` shows the public key only.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    public_key: ByteString,
    private_key: ByteString,
}

impl KeyPair {
    /// Native chain keys: Ed25519 seeded with SHA-256 of the BIP-39 mnemonic seed
    ///
    /// mnemonic seed = PBKDF2-HMAC-SHA512(passphrase, "mnemonic", 2048 rounds)
    pub fn from_passphrase(passphrase: &str) -> Result<Self> {
        if passphrase.trim().is_empty() {
            return Err(CodecError::KeyGeneration("empty passphrase".to_string()));
        }
        let mut mnemonic_seed = [0u8; MNEMONIC_SEED_LENGTH];
        pbkdf2::<Hmac<Sha512>>(
            passphrase.as_bytes(),
            MNEMONIC_SALT,
            MNEMONIC_PBKDF2_ROUNDS,
            &mut mnemonic_seed,
        )
        .map_err(|e| CodecError::KeyGeneration(e.to_string()))?;
        let seed: [u8; 32] = Sha256::digest(mnemonic_seed).into();
        Ok(Self::ed25519_from_seed(&seed))
    }

    pub fn ed25519_from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self {
            public_key: signing_key.verifying_key().to_bytes().to_vec(),
            private_key: seed.to_vec(),
        }
    }

    /// Bitcoin-family keys: compressed public key for a 32-byte secret
    pub fn secp256k1_from_secret(secret: &[u8]) -> Result<Self> {
        let secp = Secp256k1::signing_only();
        let secret_key =
            SecretKey::from_slice(secret).map_err(|e| CodecError::KeyGeneration(e.to_string()))?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Ok(Self {
            public_key: public_key.serialize().to_vec(),
            private_key: secret.to_vec(),
        })
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(&self.public_key))
            .finish_non_exhaustive()
    }
}

/// Ed25519 over SHA-256 of the message
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

impl Signer for Ed25519Signer {
    fn sign(&self, message: &[u8], private_key: &[u8]) -> Result<ByteString> {
        let seed: [u8; 32] = fixed(
            private_key,
            CodecError::KeyGeneration("ed25519 private key must be 32 bytes".to_string()),
        )?;
        let digest = Sha256::digest(message);
        let signature = SigningKey::from_bytes(&seed).sign(&digest);
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<()> {
        check_signature_length(signature, self.signature_length())?;
        let key: [u8; ED25519_PUBLIC_KEY_LENGTH] = fixed(public_key, CodecError::InvalidPublicKey)?;
        let verifying_key = VerifyingKey::from_bytes(&key).map_err(|_| CodecError::InvalidPublicKey)?;
        let sig_bytes: [u8; SIGNATURE_LENGTH] = fixed(signature, CodecError::InvalidSignature)?;
        let signature = DalekSignature::from_bytes(&sig_bytes);
        let digest = Sha256::digest(message);
        verifying_key
            .verify_strict(&digest, &signature)
            .map_err(|_| CodecError::InvalidSignature)
    }
}

/// ECDSA/secp256k1 over SHA256d of the message
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Signer;

impl Secp256k1Signer {
    fn message(message: &[u8]) -> Result<Message> {
        let digest = sha256d::Hash::hash(message).into_inner();
        Message::from_digest_slice(&digest).map_err(|e| CodecError::Serialization(e.to_string()))
    }
}

impl Signer for Secp256k1Signer {
    fn sign(&self, message: &[u8], private_key: &[u8]) -> Result<ByteString> {
        let secp = Secp256k1::signing_only();
        let secret_key =
            SecretKey::from_slice(private_key).map_err(|e| CodecError::KeyGeneration(e.to_string()))?;
        let signature = secp.sign_ecdsa(&Self::message(message)?, &secret_key);
        Ok(signature.serialize_compact().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<()> {
        check_signature_length(signature, self.signature_length())?;
        let secp = Secp256k1::verification_only();
        let public_key = PublicKey::from_slice(public_key).map_err(|_| CodecError::InvalidPublicKey)?;
        let signature =
            ecdsa::Signature::from_compact(signature).map_err(|_| CodecError::InvalidSignature)?;
        secp.verify_ecdsa(&Self::message(message)?, &signature, &public_key)
            .map_err(|_| CodecError::InvalidSignature)
    }
}
