//! Error types for address and transaction codecs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Bits conversion failed: {0}")]
    BitsConversionFailed(String),

    #[error("Invalid character {0:?} at position {1}")]
    InvalidCharacter(char, usize),

    #[error("Mixed-case string")]
    MixedCase,

    #[error("Missing separator")]
    MissingSeparator,

    #[error("Invalid human-readable part: {0}")]
    InvalidHrp(String),

    #[error("Human-readable part mismatch: expected {expected}, found {found}")]
    HrpMismatch { expected: String, found: String },

    #[error("Checksum size too low: {0} symbols")]
    ChecksumSizeTooLow(usize),

    #[error("Invalid checksum")]
    InvalidChecksum,

    #[error("Invalid witness version: {0}")]
    InvalidWitnessVersion(u8),

    #[error("Invalid witness program length: {0}")]
    InvalidWitnessProgramLength(usize),

    #[error("Witness v0 program must be 20 or 32 bytes, found {0}")]
    SegwitV0ProgramSizeMismatch(usize),

    #[error("Witness version {0} encoded with the wrong checksum variant")]
    SegwitVersionAndEncodingMismatch(u8),

    #[error("Encoded address failed to decode back to its input")]
    EncodingCheckFailed,

    #[error("Invalid address length: {0}")]
    InvalidAddressLength(usize),

    #[error("Wrong address prefix: {0:#04x}")]
    WrongAddressPrefix(u8),

    #[error("Unknown address type: {0}")]
    UnknownAddressType(String),

    #[error("Invalid recipient id: {0}")]
    InvalidRecipientId(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Missing asset for transaction type {0}")]
    MissingAsset(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid signature length: expected {expected}, found {found}")]
    InvalidSignatureLength { expected: usize, found: usize },

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Digest too short for a deterministic id: {0} bytes")]
    NonDeterministicId(usize),

    #[error("All interpretations failed: {0:?}")]
    Aggregate(Vec<CodecError>),
}

pub type Result<T> = std::result::Result<T, CodecError>;
