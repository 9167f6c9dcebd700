//! Codec constants: checksum parameters, widths, opcodes, native chain values

/// Bech32 alphabet (BIP-173)
pub const BECH32_CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Checksum XOR constant selecting Bech32
pub const BECH32_CONST: u32 = 1;

/// Checksum XOR constant selecting Bech32m (BIP-350)
pub const BECH32M_CONST: u32 = 0x2bc8_30a3;

/// Checksum width in 5-bit symbols
pub const BECH32_CHECKSUM_LENGTH: usize = 6;

/// Maximum total length of a Bech32 string
pub const BECH32_MAX_LENGTH: usize = 90;

/// Bech32 separator between human-readable part and data
pub const BECH32_SEPARATOR: char = '1';

/// Base58 alphabet: no 0, O, I or l
pub const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Base58Check checksum width
pub const BASE58_CHECKSUM_LENGTH: usize = 4;

/// Length of a pubkey or script hash (hash160)
pub const HASH160_LENGTH: usize = 20;

/// Witness program bounds
pub const MIN_WITNESS_PROGRAM_LENGTH: usize = 2;
pub const MAX_WITNESS_PROGRAM_LENGTH: usize = 40;

/// Highest valid witness version
pub const MAX_WITNESS_VERSION: u8 = 16;

/// Witness v0 program lengths (P2WPKH, P2WSH)
pub const WITNESS_V0_KEYHASH_LENGTH: usize = 20;
pub const WITNESS_V0_SCRIPTHASH_LENGTH: usize = 32;

/// Taproot witness version and output key length
pub const TAPROOT_WITNESS_VERSION: u8 = 1;
pub const TAPROOT_PROGRAM_LENGTH: usize = 32;

/// Opcodes used by standard output scripts
pub const OP_0: u8 = 0x00;
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;

/// Sequence number for final input
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/// Sequence number signalling RBF
pub const SEQUENCE_RBF: u32 = 0xfffffffe;

/// Ed25519 and compact ECDSA signatures are both 64 bytes
pub const SIGNATURE_LENGTH: usize = 64;

/// Ed25519 public key width
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;

/// BIP-39 mnemonic-to-seed parameters used for native passphrases
pub const MNEMONIC_SALT: &[u8] = b"mnemonic";
pub const MNEMONIC_PBKDF2_ROUNDS: u32 = 2048;
pub const MNEMONIC_SEED_LENGTH: usize = 64;

/// Native chain address prefix
pub const NATIVE_ADDRESS_PREFIX: char = 'U';

/// Native chain epoch: 2017-09-02T17:00:00Z
pub const NATIVE_EPOCH_UNIX: u64 = 1_504_371_600;

/// Native chain minor units per coin
pub const NATIVE_DECIMALS: u32 = 8;

/// Width of the id window taken from the transaction digest
pub const ID_WINDOW_LENGTH: usize = 8;
