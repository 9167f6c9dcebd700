//! # Wallet-Codec
//!
//! Address and transaction byte codecs for the embedded wallets.
//!
//! This crate provides pure, side-effect-free functions that turn addresses and
//! transactions into the exact byte strings that chains hash and sign, and back.
//!
//! ## Architecture
//!
//! The codecs are layered leaf-first:
//! - Bit regrouping (`bits`) and Bech32/Bech32m (`bech32`)
//! - SegWit and Taproot addresses (`segwit`, `taproot`), Base58Check (`base58`)
//! - The `Address` sum type and locking scripts (`address`, `script`)
//! - Bitcoin-family serialization (`transaction`)
//! - Native chain serialization, ids and signing (`native`, `txid`, `signer`)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: no I/O, no clock, no randomness
//! 2. **Fail Closed**: malformed input is an error, never a default value
//! 3. **Exact Version Pinning**: signature-critical dependencies pinned to exact versions
//! 4. **Injected Signing**: signature schemes are passed in through the `Signer` trait
//!
//! ## Usage
//!
//! ```rust
//! use wallet_codec::WalletCodec;
//! use wallet_codec::network::NetworkParams;
//!
//! let codec = WalletCodec::new(NetworkParams::bitcoin());
//! let address = codec.parse_address("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4").unwrap();
//! assert_eq!(codec.locking_script(&address)[..2], [0x00u8, 0x14]);
//! ```

pub mod types;
pub mod constants;
pub mod error;
pub mod bits;
pub mod bech32;
pub mod segwit;
pub mod taproot;
pub mod base58;
pub mod script;
pub mod address;
pub mod network;
pub mod transaction;
pub mod native;
pub mod txid;
pub mod signer;
pub mod rpc;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{CodecError, Result};
pub use address::{Address, LegacyKind};
pub use script::ScriptType;
pub use network::NetworkParams;
pub use native::{Amount, SignedTransaction, UnregisteredTransaction};
pub use txid::TransactionId;
pub use signer::{Ed25519Signer, KeyPair, Secp256k1Signer, Signer};

/// Codec bound to one Bitcoin-family chain's parameters
///
/// # Examples
///
/// ```
/// use wallet_codec::WalletCodec;
/// use wallet_codec::network::NetworkParams;
///
/// let codec = WalletCodec::new(NetworkParams::bitcoin());
/// let address = codec.parse_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH").unwrap();
/// assert_eq!(address.to_string(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
/// ```
#[derive(Debug, Clone, Default)]
pub struct WalletCodec {
    params: NetworkParams,
}

impl WalletCodec {
    /// Create a codec for `params`
    ///
    /// # Examples
    ///
    /// ```
    /// use wallet_codec::WalletCodec;
    /// use wallet_codec::network::NetworkParams;
    ///
    /// let codec = WalletCodec::new(NetworkParams::dogecoin());
    /// assert_eq!(codec.params().name, "dogecoin");
    /// ```
    pub fn new(params: NetworkParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Parse an address in any format the chain supports
    ///
    /// # Examples
    ///
    /// ```
    /// use wallet_codec::{WalletCodec, ScriptType};
    ///
    /// let codec = WalletCodec::default();
    /// let address = codec
    ///     .parse_address("bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr")
    ///     .unwrap();
    /// assert_eq!(address.script_type(), ScriptType::P2tr);
    /// ```
    pub fn parse_address(&self, text: &str) -> Result<Address> {
        Address::parse(&self.params, text)
    }

    /// Encode a witness program under the chain's HRP
    ///
    /// # Examples
    ///
    /// ```
    /// use wallet_codec::WalletCodec;
    ///
    /// let codec = WalletCodec::default();
    /// let program = [0x75u8, 0x1e];
    /// let address = codec.encode_segwit(16, &program).unwrap();
    /// assert_eq!(address, "bc1sw50qgdz25j");
    /// assert_eq!(codec.decode_segwit(&address).unwrap(), (16, program.to_vec()));
    /// ```
    pub fn encode_segwit(&self, version: u8, program: &[u8]) -> Result<String> {
        segwit::encode(self.params.require_hrp()?, version, program)
    }

    /// Decode a witness address into `(version, program)`
    pub fn decode_segwit(&self, address: &str) -> Result<(u8, ByteString)> {
        let wp = segwit::decode(self.params.require_hrp()?, address)?;
        Ok((wp.version, wp.program))
    }

    /// Canonical output script paying `address`
    pub fn locking_script(&self, address: &Address) -> ByteString {
        address.locking_script()
    }

    /// Serialize a Bitcoin-family transaction
    ///
    /// # Examples
    ///
    /// ```
    /// use wallet_codec::WalletCodec;
    /// use wallet_codec::types::*;
    ///
    /// let codec = WalletCodec::default();
    /// let tx = Transaction {
    ///     version: 2,
    ///     inputs: vec![],
    ///     outputs: vec![TransactionOutput {
    ///         value: 1000,
    ///         script_pubkey: vec![0x51],
    ///     }],
    ///     lock_time: 0,
    /// };
    /// let bytes = codec.serialize_transaction(&tx);
    /// assert_eq!(codec.deserialize_transaction(&bytes).unwrap(), tx);
    /// ```
    pub fn serialize_transaction(&self, tx: &Transaction) -> ByteString {
        transaction::serialize(tx)
    }

    pub fn deserialize_transaction(&self, bytes: &[u8]) -> Result<Transaction> {
        transaction::deserialize(bytes)
    }

    /// Sign the transaction preimage with a secp256k1 key
    ///
    /// # Examples
    ///
    /// ```
    /// use wallet_codec::{WalletCodec, KeyPair, Secp256k1Signer, Signer};
    /// use wallet_codec::types::*;
    ///
    /// let codec = WalletCodec::default();
    /// let key_pair = KeyPair::secp256k1_from_secret(&[3u8; 32]).unwrap();
    /// let tx = Transaction { version: 1, inputs: vec![], outputs: vec![], lock_time: 0 };
    /// let signature = codec.sign_transaction(&tx, &key_pair).unwrap();
    /// let preimage = codec.serialize_transaction(&tx);
    /// assert!(Secp256k1Signer.is_valid(&preimage, &signature, key_pair.public_key()));
    /// ```
    pub fn sign_transaction(&self, tx: &Transaction, key_pair: &KeyPair) -> Result<ByteString> {
        Secp256k1Signer.sign(&transaction::serialize(tx), key_pair.private_key())
    }

    /// Sign a native chain transaction and derive its id
    ///
    /// # Examples
    ///
    /// ```
    /// use wallet_codec::{WalletCodec, KeyPair, Amount, UnregisteredTransaction};
    ///
    /// let codec = WalletCodec::default();
    /// let key_pair = KeyPair::from_passphrase("correct horse battery staple").unwrap();
    /// let sender: [u8; 32] = key_pair.public_key().try_into().unwrap();
    /// let tx = UnregisteredTransaction::transfer(10, sender, "U12345", Amount::from_minor(1));
    /// let signed = codec.sign_native_transaction(&tx, &key_pair).unwrap();
    /// assert_eq!(signed.id, signed.transaction.id().unwrap());
    /// ```
    pub fn sign_native_transaction(
        &self,
        tx: &UnregisteredTransaction,
        key_pair: &KeyPair,
    ) -> Result<SignedTransaction> {
        native::sign_transaction(&Ed25519Signer, tx, key_pair)
    }

    /// Verify a signed native chain transaction
    pub fn verify_native_transaction(&self, tx: &UnregisteredTransaction) -> Result<()> {
        native::verify_transaction(&Ed25519Signer, tx)
    }
}
