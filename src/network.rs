//! Chain parameter tables for Bitcoin-family address codecs
//!
//! Codecs take HRPs and version bytes as arguments; this table is where a wallet
//! binds them for a particular chain.

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};

/// Address parameters of one Bitcoin-family chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub name: String,
    /// Bech32 human-readable part; `None` for chains without SegWit
    #[serde(default)]
    pub bech32_hrp: Option<String>,
    pub p2pkh_version: u8,
    pub p2sh_version: u8,
}

impl NetworkParams {
    pub fn bitcoin() -> Self {
        Self::new("bitcoin", Some("bc"), 0x00, 0x05)
    }

    pub fn bitcoin_testnet() -> Self {
        Self::new("bitcoin-testnet", Some("tb"), 0x6f, 0xc4)
    }

    pub fn litecoin() -> Self {
        Self::new("litecoin", Some("ltc"), 0x30, 0x32)
    }

    pub fn dogecoin() -> Self {
        Self::new("dogecoin", None, 0x1e, 0x16)
    }

    pub fn dash() -> Self {
        Self::new("dash", None, 0x4c, 0x10)
    }

    fn new(name: &str, hrp: Option<&str>, p2pkh_version: u8, p2sh_version: u8) -> Self {
        Self {
            name: name.to_string(),
            bech32_hrp: hrp.map(str::to_string),
            p2pkh_version,
            p2sh_version,
        }
    }

    /// Look up a preset by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "bitcoin" => Some(Self::bitcoin()),
            "bitcoin-testnet" => Some(Self::bitcoin_testnet()),
            "litecoin" => Some(Self::litecoin()),
            "dogecoin" => Some(Self::dogecoin()),
            "dash" => Some(Self::dash()),
            _ => None,
        }
    }

    /// Load a custom table from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| CodecError::Serialization(format!("network params: {}", e)))?;
        if params.p2pkh_version == params.p2sh_version {
            return Err(CodecError::Serialization(
                "p2pkh and p2sh version bytes must differ".to_string(),
            ));
        }
        Ok(params)
    }

    /// Bech32 HRP, or `UnknownAddressType` for chains without SegWit
    pub fn require_hrp(&self) -> Result<&str> {
        self.bech32_hrp
            .as_deref()
            .ok_or_else(|| CodecError::UnknownAddressType(format!("{} has no segwit", self.name)))
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self::bitcoin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(NetworkParams::bitcoin().bech32_hrp.as_deref(), Some("bc"));
        assert_eq!(NetworkParams::bitcoin_testnet().p2pkh_version, 0x6f);
        assert_eq!(NetworkParams::dogecoin().bech32_hrp, None);
        assert_eq!(NetworkParams::default(), NetworkParams::bitcoin());
    }

    #[test]
    fn test_by_name() {
        assert_eq!(NetworkParams::by_name("dash"), Some(NetworkParams::dash()));
        assert_eq!(NetworkParams::by_name("unknown"), None);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"name":"regtest","bech32_hrp":"bcrt","p2pkh_version":111,"p2sh_version":196}"#;
        let params = NetworkParams::from_json(json).unwrap();
        assert_eq!(params.bech32_hrp.as_deref(), Some("bcrt"));
        assert_eq!(params.require_hrp().unwrap(), "bcrt");
    }

    #[test]
    fn test_from_json_without_hrp() {
        let json = r#"{"name":"legacy","p2pkh_version":30,"p2sh_version":22}"#;
        let params = NetworkParams::from_json(json).unwrap();
        assert!(params.require_hrp().is_err());
    }

    #[test]
    fn test_from_json_rejects_bad_tables() {
        assert!(NetworkParams::from_json("{").is_err());
        let json = r#"{"name":"x","p2pkh_version":0,"p2sh_version":0}"#;
        assert!(NetworkParams::from_json(json).is_err());
    }
}
