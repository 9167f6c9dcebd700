//! Integration tests for wallet-codec

use wallet_codec::rpc::{RpcRequest, RpcResponse};
use wallet_codec::*;

fn utxo(txid: &str, index: u32, value: u64) -> UnspentOutput {
    UnspentOutput {
        outpoint: OutPoint::from_display_hex(txid, index).unwrap(),
        output: TransactionOutput {
            value,
            script_pubkey: vec![],
        },
    }
}

#[test]
fn test_wallet_codec_bitcoin_flow() {
    let codec = WalletCodec::new(NetworkParams::bitcoin());
    let mut secret = [0u8; 32];
    secret[31] = 7;
    let key_pair = KeyPair::secp256k1_from_secret(&secret).unwrap();
    let change = Address::p2wpkh_from_public_key(codec.params(), key_pair.public_key()).unwrap();
    let payee = codec
        .parse_address("bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr")
        .unwrap();

    let tx = transaction::unsigned_transaction(
        2,
        &[utxo(&"ab".repeat(32), 0, 100_000)],
        &[(payee.clone(), 60_000), (change.clone(), 39_000)],
        SEQUENCE_RBF,
        0,
    );
    assert_eq!(tx.outputs[0].script_pubkey, codec.locking_script(&payee));
    assert_eq!(tx.outputs[1].script_pubkey[..2], [OP_0, 0x14]);

    let bytes = codec.serialize_transaction(&tx);
    assert_eq!(codec.deserialize_transaction(&bytes).unwrap(), tx);

    let signature = codec.sign_transaction(&tx, &key_pair).unwrap();
    assert!(Secp256k1Signer.is_valid(&bytes, &signature, key_pair.public_key()));
}

#[test]
fn test_wallet_codec_segwit_round_trip() {
    let codec = WalletCodec::new(NetworkParams::bitcoin_testnet());
    for (version, program) in [(0u8, vec![9u8; 20]), (0, vec![9; 32]), (1, vec![9; 32]), (2, vec![9; 40])] {
        let address = codec.encode_segwit(version, &program).unwrap();
        assert!(address.starts_with("tb1"));
        assert_eq!(codec.decode_segwit(&address).unwrap(), (version, program));
    }
}

#[test]
fn test_wallet_codec_native_flow() {
    let codec = WalletCodec::default();
    let key_pair = KeyPair::from_passphrase("wallet codec integration").unwrap();
    let sender: [u8; 32] = key_pair.public_key().try_into().unwrap();
    let recipient = native::address_from_public_key(&[5u8; 32]).unwrap();

    let tx = UnregisteredTransaction::transfer(
        native::epoch_time(NATIVE_EPOCH_UNIX + 3600).unwrap(),
        sender,
        &recipient,
        "0.5".parse().unwrap(),
    );
    let signed = codec.sign_native_transaction(&tx, &key_pair).unwrap();
    assert!(codec.verify_native_transaction(&signed.transaction).is_ok());
    assert_eq!(signed.id.to_string().parse::<TransactionId>().unwrap(), signed.id);

    let mut tampered = signed.transaction.clone();
    tampered.recipient_id = Some(native::address_from_public_key(&[6u8; 32]).unwrap());
    assert_eq!(
        codec.verify_native_transaction(&tampered),
        Err(CodecError::InvalidSignature)
    );
    assert_ne!(tampered.id().unwrap(), signed.id);
}

#[test]
fn test_network_presets_by_name() {
    for name in ["bitcoin", "bitcoin-testnet", "litecoin", "dogecoin", "dash"] {
        let params = NetworkParams::by_name(name).unwrap();
        assert_eq!(params.name, name);
        let codec = WalletCodec::new(params);
        let address = Address::legacy(codec.params(), LegacyKind::ScriptHash, [1u8; 20]).unwrap();
        assert_eq!(codec.parse_address(&address.to_string()).unwrap(), address);
    }
    assert!(NetworkParams::by_name("unknown").is_none());
}

#[test]
fn test_rpc_round_trip() -> anyhow::Result<()> {
    let codec = WalletCodec::default();
    let tx = transaction::unsigned_transaction(
        1,
        &[utxo(&"01".repeat(32), 3, 5_000)],
        &[(codec.parse_address("3CNHUhP3uyB9EUtRLsmvFUmvGdjGdkTxJw")?, 4_000)],
        SEQUENCE_FINAL,
        0,
    );
    let request = RpcRequest::send_raw_transaction(&tx);
    let raw = hex::decode(&request.params[0])?;
    assert_eq!(codec.deserialize_transaction(&raw)?, tx);

    let txid = transaction::txid_hex(&tx);
    let body = format!(r#"{{"result":"{}","error":null}}"#, txid);
    let response: RpcResponse<String> = RpcResponse::from_json(&body)?;
    assert_eq!(response.into_result()?, txid);
    Ok(())
}
