//! Native chain transactions: model, byte layout, signing
//!
//! GetBytes(tx) = type:u8 ‖ timestamp:u32le ‖ sender_pk[32] ‖ requester_pk[32]?
//!              ‖ recipient:u64be ‖ amount:u64le ‖ asset ‖ signature ‖ second_signature
//!
//! An absent recipient is eight zero bytes; absent requester key and signatures
//! contribute nothing.

use crate::constants::*;
use crate::error::{CodecError, Result};
use crate::signer::{KeyPair, Signer};
use crate::txid::{self, TransactionId};
use crate::types::ByteString;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Transaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransactionType {
    Send = 0,
    Signature = 1,
    Delegate = 2,
    Vote = 3,
    Multi = 4,
    Dapp = 5,
    InTransfer = 6,
    OutTransfer = 7,
    ChatMessage = 8,
    State = 9,
}

impl TransactionType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TransactionType {
    type Error = CodecError;

    fn try_from(code: u8) -> Result<Self> {
        use TransactionType::*;
        Ok(match code {
            0 => Send,
            1 => Signature,
            2 => Delegate,
            3 => Vote,
            4 => Multi,
            5 => Dapp,
            6 => InTransfer,
            7 => OutTransfer,
            8 => ChatMessage,
            9 => State,
            _ => return Err(CodecError::Serialization(format!("unknown transaction type {}", code))),
        })
    }
}

/// Chat subtype codes
pub mod chat_type {
    pub const MESSAGE_OLD: u32 = 0;
    pub const MESSAGE: u32 = 1;
    pub const RICH_MESSAGE: u32 = 2;
    pub const SIGNAL: u32 = 3;
}

/// State subtype codes
pub mod state_type {
    pub const KEY_VALUE: u32 = 0;
}

/// Encrypted chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAsset {
    pub message: ByteString,
    pub own_message: ByteString,
    pub chat_type: u32,
}

impl ChatAsset {
    /// From the hex ciphertext and nonce as carried in API payloads
    pub fn from_hex(message: &str, own_message: &str, chat_type: u32) -> Result<Self> {
        let decode = |field: &str, value: &str| {
            hex::decode(value).map_err(|e| CodecError::Serialization(format!("{}: {}", field, e)))
        };
        Ok(Self {
            message: decode("message", message)?,
            own_message: decode("own_message", own_message)?,
            chat_type,
        })
    }
}

/// Key/value record stored on chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAsset {
    pub key: String,
    pub value: String,
    pub state_type: u32,
}

/// Add or remove a delegate vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub add: bool,
    pub delegate_public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
}

impl Vote {
    /// `+<hex key>` or `-<hex key>`, always 65 bytes
    pub fn to_bytes(&self) -> ByteString {
        let mut out = Vec::with_capacity(1 + 2 * ED25519_PUBLIC_KEY_LENGTH);
        out.push(if self.add { b'+' } else { b'-' });
        out.extend_from_slice(hex::encode(self.delegate_public_key).as_bytes());
        out
    }
}

/// Type-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    None,
    Chat(ChatAsset),
    State(StateAsset),
    Votes(Vec<Vote>),
}

impl Default for Asset {
    fn default() -> Self {
        Asset::None
    }
}

/// Amount in minor units (1 coin = 10^8)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(pub u64);

impl Amount {
    pub fn from_minor(units: u64) -> Self {
        Amount(units)
    }

    pub fn minor_units(self) -> u64 {
        self.0
    }

    /// Scale a decimal string to minor units, dropping digits below the minor unit
    pub fn from_decimal_str(s: &str) -> Result<Self> {
        let invalid = || CodecError::InvalidAmount(s.to_string());
        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(invalid());
        }

        let scale = 10u64.pow(NATIVE_DECIMALS);
        let whole_units = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| invalid())?
        };

        let mut fraction_units = 0u64;
        for (i, digit) in fraction.bytes().take(NATIVE_DECIMALS as usize).enumerate() {
            fraction_units += (digit - b'0') as u64 * 10u64.pow(NATIVE_DECIMALS - 1 - i as u32);
        }

        whole_units
            .checked_mul(scale)
            .and_then(|units| units.checked_add(fraction_units))
            .map(Amount)
            .ok_or_else(invalid)
    }

    /// Render as a decimal string without trailing zeros
    pub fn to_decimal_string(self) -> String {
        let scale = 10u64.pow(NATIVE_DECIMALS);
        let whole = self.0 / scale;
        let fraction = self.0 % scale;
        if fraction == 0 {
            return whole.to_string();
        }
        let digits = format!("{:0width$}", fraction, width = NATIVE_DECIMALS as usize);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl FromStr for Amount {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Amount::from_decimal_str(s)
    }
}

/// Transaction before the network assigns it a block
///
/// There is no stored id: it is always derived from the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnregisteredTransaction {
    pub transaction_type: TransactionType,
    /// Seconds since the native epoch
    pub timestamp: u32,
    pub sender_public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
    #[serde(default)]
    pub requester_public_key: Option<[u8; ED25519_PUBLIC_KEY_LENGTH]>,
    #[serde(default)]
    pub recipient_id: Option<String>,
    pub amount: Amount,
    #[serde(default)]
    pub asset: Asset,
    /// Empty until signed
    #[serde(default)]
    pub signature: ByteString,
    #[serde(default)]
    pub second_signature: Option<ByteString>,
}

impl UnregisteredTransaction {
    /// Plain transfer
    pub fn transfer(
        timestamp: u32,
        sender_public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
        recipient_id: &str,
        amount: Amount,
    ) -> Self {
        Self {
            transaction_type: TransactionType::Send,
            timestamp,
            sender_public_key,
            requester_public_key: None,
            recipient_id: Some(recipient_id.to_string()),
            amount,
            asset: Asset::None,
            signature: Vec::new(),
            second_signature: None,
        }
    }

    /// Chat message, optionally carrying a transfer amount
    pub fn chat(
        timestamp: u32,
        sender_public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
        recipient_id: &str,
        amount: Amount,
        chat: ChatAsset,
    ) -> Self {
        Self {
            transaction_type: TransactionType::ChatMessage,
            asset: Asset::Chat(chat),
            ..Self::transfer(timestamp, sender_public_key, recipient_id, amount)
        }
    }

    /// Key/value state record
    pub fn state(
        timestamp: u32,
        sender_public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
        state: StateAsset,
    ) -> Self {
        Self {
            transaction_type: TransactionType::State,
            timestamp,
            sender_public_key,
            requester_public_key: None,
            recipient_id: None,
            amount: Amount::default(),
            asset: Asset::State(state),
            signature: Vec::new(),
            second_signature: None,
        }
    }

    /// Same fields with both signatures cleared
    pub fn unsigned(&self) -> Self {
        Self {
            signature: Vec::new(),
            second_signature: None,
            ..self.clone()
        }
    }

    pub fn to_bytes(&self) -> Result<ByteString> {
        serialize(self)
    }

    /// Derived id; requires a signed transaction to match the chain's id
    pub fn id(&self) -> Result<TransactionId> {
        txid::derive_id(&serialize(self)?)
    }
}

/// Parse `U<decimal u64>` into its numeric value
pub fn parse_recipient_id(recipient_id: &str) -> Result<u64> {
    let invalid = || CodecError::InvalidRecipientId(recipient_id.to_string());
    let digits = recipient_id
        .strip_prefix(NATIVE_ADDRESS_PREFIX)
        .ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    digits.parse::<u64>().map_err(|_| invalid())
}

/// Native address of a public key: same digest window as transaction ids
pub fn address_from_public_key(public_key: &[u8; ED25519_PUBLIC_KEY_LENGTH]) -> Result<String> {
    let digest = Sha256::digest(public_key);
    let value = txid::id_from_digest(&digest)?;
    Ok(format!("{}{}", NATIVE_ADDRESS_PREFIX, value))
}

/// Seconds since the native epoch for a caller-supplied unix time
pub fn epoch_time(unix_seconds: u64) -> Result<u32> {
    let elapsed = unix_seconds.checked_sub(NATIVE_EPOCH_UNIX).ok_or_else(|| {
        CodecError::Serialization(format!("{} predates the native epoch", unix_seconds))
    })?;
    u32::try_from(elapsed)
        .map_err(|_| CodecError::Serialization(format!("{} overflows the timestamp field", unix_seconds)))
}

fn asset_bytes(tx: &UnregisteredTransaction) -> Result<ByteString> {
    let mismatch = || {
        debug!(kind = ?tx.transaction_type, "asset does not match transaction type");
        CodecError::MissingAsset(format!("{:?}", tx.transaction_type))
    };
    match (tx.transaction_type, &tx.asset) {
        (TransactionType::ChatMessage, Asset::Chat(chat)) => {
            let mut out = Vec::with_capacity(chat.message.len() + chat.own_message.len() + 4);
            out.extend_from_slice(&chat.message);
            out.extend_from_slice(&chat.own_message);
            out.extend_from_slice(&chat.chat_type.to_le_bytes());
            Ok(out)
        }
        (TransactionType::State, Asset::State(state)) => {
            let mut out = Vec::with_capacity(state.value.len() + state.key.len() + 4);
            out.extend_from_slice(state.value.as_bytes());
            out.extend_from_slice(state.key.as_bytes());
            out.extend_from_slice(&state.state_type.to_le_bytes());
            Ok(out)
        }
        (TransactionType::Vote, Asset::Votes(votes)) => {
            Ok(votes.iter().flat_map(Vote::to_bytes).collect())
        }
        (TransactionType::ChatMessage | TransactionType::State | TransactionType::Vote, _) => {
            Err(mismatch())
        }
        (_, Asset::None) => Ok(Vec::new()),
        (_, _) => Err(mismatch()),
    }
}

/// Serialize into the byte layout that is hashed for ids and signed
pub fn serialize(tx: &UnregisteredTransaction) -> Result<ByteString> {
    let asset = asset_bytes(tx)?;
    let recipient = match &tx.recipient_id {
        Some(id) => parse_recipient_id(id)?,
        None => 0,
    };

    let mut out = Vec::with_capacity(
        1 + 4 + 2 * ED25519_PUBLIC_KEY_LENGTH + 8 + 8 + asset.len() + 2 * SIGNATURE_LENGTH,
    );
    out.push(tx.transaction_type.code());
    out.extend_from_slice(&tx.timestamp.to_le_bytes());
    out.extend_from_slice(&tx.sender_public_key);
    if let Some(requester) = &tx.requester_public_key {
        out.extend_from_slice(requester);
    }
    out.extend_from_slice(&recipient.to_be_bytes());
    out.extend_from_slice(&tx.amount.minor_units().to_le_bytes());
    out.extend_from_slice(&asset);
    out.extend_from_slice(&tx.signature);
    if let Some(second) = &tx.second_signature {
        out.extend_from_slice(second);
    }
    Ok(out)
}

/// A signed transaction and its derived id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: UnregisteredTransaction,
    pub id: TransactionId,
}

/// Sign the unsigned layout of `tx` with `key_pair` and derive its id
pub fn sign_transaction<S: Signer>(
    signer: &S,
    tx: &UnregisteredTransaction,
    key_pair: &KeyPair,
) -> Result<SignedTransaction> {
    if key_pair.public_key() != tx.sender_public_key.as_slice() {
        return Err(CodecError::InvalidPublicKey);
    }
    let mut transaction = tx.unsigned();
    transaction.signature = signer.sign(&serialize(&transaction)?, key_pair.private_key())?;
    let id = transaction.id()?;
    debug!(%id, kind = ?transaction.transaction_type, "signed native transaction");
    Ok(SignedTransaction { transaction, id })
}

/// Check the sender's signature over the unsigned layout
pub fn verify_transaction<S: Signer>(signer: &S, tx: &UnregisteredTransaction) -> Result<()> {
    let message = serialize(&tx.unsigned())?;
    signer.verify(&message, &tx.signature, &tx.sender_public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Ed25519Signer;

    const PASSPHRASE: &str =
        "process gospel angry height able cupboard spy dwarf grant slice gather pet";
    const RECIPIENT: &str = "U7771441689362721578";

    fn sender() -> [u8; 32] {
        KeyPair::from_passphrase(PASSPHRASE)
            .unwrap()
            .public_key()
            .try_into()
            .unwrap()
    }

    #[test]
    fn test_amount_from_decimal() {
        assert_eq!(Amount::from_decimal_str("1.12").unwrap(), Amount(112_000_000));
        assert_eq!(Amount::from_decimal_str("0").unwrap(), Amount(0));
        assert_eq!(Amount::from_decimal_str(".5").unwrap(), Amount(50_000_000));
        assert_eq!(Amount::from_decimal_str("7.").unwrap(), Amount(700_000_000));
        // below the minor unit is truncated, not rounded
        assert_eq!(Amount::from_decimal_str("0.000000019").unwrap(), Amount(1));
        assert_eq!(Amount::from_decimal_str("0.999999999").unwrap(), Amount(99_999_999));
    }

    #[test]
    fn test_amount_rejects_malformed() {
        for s in ["", ".", "-1", "1.2.3", "1,5", "abc", " 1", "184467440738"] {
            assert!(Amount::from_decimal_str(s).is_err(), "{:?}", s);
        }
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount(112_000_000).to_string(), "1.12");
        assert_eq!(Amount(100_000_000).to_string(), "1");
        assert_eq!(Amount(1).to_string(), "0.00000001");
        assert_eq!("2.5".parse::<Amount>().unwrap(), Amount(250_000_000));
    }

    #[test]
    fn test_parse_recipient_id() {
        assert_eq!(parse_recipient_id(RECIPIENT).unwrap(), 7771441689362721578);
        assert_eq!(parse_recipient_id("U18446744073709551615").unwrap(), u64::MAX);
        for bad in ["", "U", "7771441689362721578", "u123", "U12a", "U+1", "U18446744073709551616"] {
            assert!(matches!(
                parse_recipient_id(bad),
                Err(CodecError::InvalidRecipientId(_))
            ));
        }
    }

    #[test]
    fn test_address_from_public_key() {
        assert_eq!(address_from_public_key(&sender()).unwrap(), "U13252793974881837910");
    }

    #[test]
    fn test_epoch_time() {
        assert_eq!(epoch_time(NATIVE_EPOCH_UNIX + 10).unwrap(), 10);
        assert!(epoch_time(NATIVE_EPOCH_UNIX - 1).is_err());
        assert!(epoch_time(NATIVE_EPOCH_UNIX + u32::MAX as u64 + 1).is_err());
    }

    #[test]
    fn test_transfer_layout() {
        let tx = UnregisteredTransaction::transfer(10, sender(), RECIPIENT, Amount(112_000_000));
        assert_eq!(
            hex::encode(serialize(&tx).unwrap()),
            "000a000000a9912a2b8841f61e087bfc138abbee110489d432ab8bae4300cde0e40acb6d7c\
             6bd9b50aa7206b2a00fcac0600000000"
        );
    }

    #[test]
    fn test_chat_layout() {
        let chat = ChatAsset::from_hex("aabbcc", "0102", chat_type::MESSAGE).unwrap();
        let tx = UnregisteredTransaction::chat(10, sender(), RECIPIENT, Amount(0), chat);
        assert_eq!(
            hex::encode(serialize(&tx).unwrap()),
            "080a000000a9912a2b8841f61e087bfc138abbee110489d432ab8bae4300cde0e40acb6d7c\
             6bd9b50aa7206b2a0000000000000000aabbcc010201000000"
        );
    }

    #[test]
    fn test_state_layout() {
        let state = StateAsset {
            key: "key".to_string(),
            value: "value".to_string(),
            state_type: state_type::KEY_VALUE,
        };
        let tx = UnregisteredTransaction::state(10, sender(), state);
        assert_eq!(
            hex::encode(serialize(&tx).unwrap()),
            "090a000000a9912a2b8841f61e087bfc138abbee110489d432ab8bae4300cde0e40acb6d7c\
             0000000000000000000000000000000076616c75656b657900000000"
        );
    }

    #[test]
    fn test_vote_layout_keeps_order() {
        let votes = vec![
            Vote {
                add: true,
                delegate_public_key: [0xbb; 32],
            },
            Vote {
                add: false,
                delegate_public_key: [0xaa; 32],
            },
        ];
        let tx = UnregisteredTransaction {
            transaction_type: TransactionType::Vote,
            recipient_id: None,
            asset: Asset::Votes(votes),
            ..UnregisteredTransaction::transfer(10, sender(), RECIPIENT, Amount(0))
        };
        let bytes = serialize(&tx).unwrap();
        let asset = &bytes[1 + 4 + 32 + 8 + 8..];
        assert_eq!(asset.len(), 130);
        assert_eq!(asset[0], b'+');
        assert_eq!(&asset[1..65], "bb".repeat(32).as_bytes());
        assert_eq!(asset[65], b'-');
        assert_eq!(&asset[66..], "aa".repeat(32).as_bytes());
    }

    #[test]
    fn test_requester_and_second_signature() {
        let mut tx = UnregisteredTransaction::transfer(10, sender(), RECIPIENT, Amount(1));
        let base = serialize(&tx).unwrap().len();
        tx.requester_public_key = Some([7u8; 32]);
        tx.signature = vec![1u8; 64];
        tx.second_signature = Some(vec![2u8; 64]);
        let bytes = serialize(&tx).unwrap();
        assert_eq!(bytes.len(), base + 32 + 64 + 64);
        assert_eq!(&bytes[37..69], &[7u8; 32]);
        assert_eq!(&bytes[bytes.len() - 64..], &[2u8; 64][..]);
    }

    #[test]
    fn test_missing_asset_fails_closed() {
        let tx = UnregisteredTransaction {
            transaction_type: TransactionType::ChatMessage,
            ..UnregisteredTransaction::transfer(10, sender(), RECIPIENT, Amount(0))
        };
        assert!(matches!(serialize(&tx), Err(CodecError::MissingAsset(_))));

        let tx = UnregisteredTransaction {
            asset: Asset::Votes(vec![]),
            ..UnregisteredTransaction::transfer(10, sender(), RECIPIENT, Amount(0))
        };
        assert!(matches!(serialize(&tx), Err(CodecError::MissingAsset(_))));
    }

    #[test]
    fn test_invalid_recipient_fails() {
        let tx = UnregisteredTransaction::transfer(10, sender(), "X123", Amount(1));
        assert!(matches!(serialize(&tx), Err(CodecError::InvalidRecipientId(_))));
    }

    #[test]
    fn test_transaction_type_codes() {
        for code in 0..=9u8 {
            assert_eq!(TransactionType::try_from(code).unwrap().code(), code);
        }
        assert!(TransactionType::try_from(10).is_err());
    }

    #[test]
    fn test_sign_rejects_foreign_key() {
        let tx = UnregisteredTransaction::transfer(10, [0u8; 32], RECIPIENT, Amount(1));
        let kp = KeyPair::from_passphrase(PASSPHRASE).unwrap();
        assert_eq!(
            sign_transaction(&Ed25519Signer, &tx, &kp),
            Err(CodecError::InvalidPublicKey)
        );
    }

    #[test]
    fn test_sign_then_verify() {
        let kp = KeyPair::from_passphrase(PASSPHRASE).unwrap();
        let tx = UnregisteredTransaction::transfer(10, sender(), RECIPIENT, Amount(112_000_000));
        let signed = sign_transaction(&Ed25519Signer, &tx, &kp).unwrap();
        assert!(verify_transaction(&Ed25519Signer, &signed.transaction).is_ok());

        let mut tampered = signed.transaction.clone();
        tampered.amount = Amount(112_000_001);
        assert_eq!(
            verify_transaction(&Ed25519Signer, &tampered),
            Err(CodecError::InvalidSignature)
        );
    }
}
