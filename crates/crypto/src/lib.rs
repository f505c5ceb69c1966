//! # Signboard 署名処理
//!
//! ウォレットの `personal_sign` 署名から署名者アドレスを復元する。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 署名 | secp256k1 ECDSA（リカバリID付き） |
//! | ハッシュ | Keccak-256 |
//! | アドレス | Keccak-256(公開鍵) の下位20バイト、EIP-55表記 |
//!
//! ## 署名形式
//! - 65バイト `r ‖ s ‖ v`（`v` は 0/1、または 27 以上で偶奇が yParity。37/38 など EIP-155 形式も可）
//! - 64バイト EIP-2098 コンパクト形式（`s` の最上位ビットが yParity）

mod address;

pub use address::Address;
pub use k256::ecdsa::SigningKey;

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

/// `personal_sign` のドメイン分離プレフィックス
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// 署名処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// 16進デコード失敗
    #[error("16進文字列として解釈できません: {0}")]
    InvalidHex(String),
    /// 署名長が64/65バイトのいずれでもない
    #[error("署名長が不正です: {0}バイト")]
    InvalidSignatureLength(usize),
    /// リカバリバイト `v` が不正
    #[error("リカバリバイトが不正です: {0}")]
    InvalidRecoveryByte(u8),
    /// r, s が曲線の位数の範囲外、またはゼロ
    #[error("署名の r/s が不正です")]
    MalformedSignature,
    /// 公開鍵の復元に失敗
    #[error("署名から公開鍵を復元できません")]
    RecoveryFailed,
    /// アドレス文字列が不正
    #[error("アドレスが不正です: {0}")]
    InvalidAddress(String),
    /// 秘密鍵が不正
    #[error("秘密鍵が不正です")]
    InvalidPrivateKey,
}

/// Keccak-256ハッシュ計算。
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `personal_sign` 用のメッセージハッシュ。
///
/// `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`
/// （長さはバイト数の10進表記）
pub fn hash_personal_message(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

fn decode_hex(s: &str) -> Result<Vec<u8>, CryptoError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| CryptoError::InvalidHex(e.to_string()))
}

/// 16進署名をsecp256k1署名とリカバリIDに分解する。
///
/// high-s署名は low-s に正規化し、yParity を反転する。
pub fn parse_signature(signature_hex: &str) -> Result<(Signature, RecoveryId), CryptoError> {
    let bytes = decode_hex(signature_hex)?;

    let (rs, y_odd) = match bytes.len() {
        65 => {
            let y_odd = match bytes[64] {
                0 => false,
                1 => true,
                // 27/28 や EIP-155 形式 (37/38 など)。奇数が偶パリティ
                v if v >= 27 => v % 2 == 0,
                v => return Err(CryptoError::InvalidRecoveryByte(v)),
            };
            let mut rs = [0u8; 64];
            rs.copy_from_slice(&bytes[..64]);
            (rs, y_odd)
        }
        64 => {
            // EIP-2098: s の最上位ビットに yParity を格納
            let mut rs = [0u8; 64];
            rs.copy_from_slice(&bytes);
            let y_odd = rs[32] & 0x80 != 0;
            rs[32] &= 0x7f;
            (rs, y_odd)
        }
        n => return Err(CryptoError::InvalidSignatureLength(n)),
    };

    let signature = Signature::from_slice(&rs).map_err(|_| CryptoError::MalformedSignature)?;

    let (signature, y_odd) = match signature.normalize_s() {
        Some(normalized) => (normalized, !y_odd),
        None => (signature, y_odd),
    };

    Ok((signature, RecoveryId::new(y_odd, false)))
}

/// 署名から公開鍵を復元する。
pub fn recover_verifying_key(
    message: &[u8],
    signature_hex: &str,
) -> Result<VerifyingKey, CryptoError> {
    let (signature, recovery_id) = parse_signature(signature_hex)?;
    let digest = hash_personal_message(message);
    VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)
}

/// `personal_sign` 署名から署名者のアドレスを復元する。
pub fn recover_address(message: &[u8], signature_hex: &str) -> Result<Address, CryptoError> {
    let key = recover_verifying_key(message, signature_hex)?;
    Ok(Address::from_verifying_key(&key))
}

/// 16進秘密鍵（`0x` 任意）から署名鍵を構築する。
pub fn parse_signing_key(private_key_hex: &str) -> Result<SigningKey, CryptoError> {
    let bytes = decode_hex(private_key_hex)?;
    SigningKey::from_slice(&bytes).map_err(|_| CryptoError::InvalidPrivateKey)
}

/// 署名鍵に対応するアドレス。
pub fn address_of(key: &SigningKey) -> Address {
    Address::from_verifying_key(key.verifying_key())
}

/// `personal_sign` 署名を生成する。
///
/// 65バイト `r ‖ s ‖ v`（`v` は 27/28）の `0x` 付き16進文字列を返す。
pub fn sign_personal_message(key: &SigningKey, message: &[u8]) -> Result<String, CryptoError> {
    let digest = hash_personal_message(message);
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(&digest)
        .map_err(|_| CryptoError::MalformedSignature)?;

    let mut bytes = Vec::with_capacity(65);
    bytes.extend_from_slice(&signature.to_bytes());
    bytes.push(27 + u8::from(recovery_id.is_y_odd()));
    Ok(format!("0x{}", hex::encode(bytes)))
}
