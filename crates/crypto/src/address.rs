//! # ウォレットアドレス
//!
//! secp256k1公開鍵から導出される20バイトのアドレスと、EIP-55チェックサム表記。

use std::fmt;
use std::str::FromStr;

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::{keccak256, CryptoError};

/// 20バイトのウォレットアドレス。
///
/// `Display` はEIP-55チェックサム表記、`FromStr` は大文字小文字を区別しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// 生バイト列からアドレスを構築する。
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// 生バイト列を返す。
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// 公開鍵からアドレスを導出する。
    ///
    /// `keccak256(非圧縮公開鍵から0x04を除いた64バイト)` の下位20バイト。
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    /// EIP-55チェックサム付きの `0x` 表記。
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// 申告されたアドレス文字列と一致するか（大文字小文字を区別しない）。
    ///
    /// 文字列全体をそのまま比較する。前後の空白や `0x` の欠落は
    /// [`FromStr`] と違って許容せず、不一致として扱う。
    pub fn matches(&self, claimed: &str) -> bool {
        claimed.eq_ignore_ascii_case(&self.to_checksum())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 40 {
            return Err(CryptoError::InvalidAddress(s.to_string()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| CryptoError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}
