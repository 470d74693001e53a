//! # 比特编解码
//!
//! 在字节序列与单个比特序列之间转换。每个字节按从高位到低位 (MSB-first) 展开，
//! 因此序列中的第 0 个比特对应第 0 个字节的最高位。

use crate::error::StegoError;

/// 将字节序列展开为比特序列，输出长度恰好是 `8 * bytes.len()`。
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect()
}

/// 将比特序列重新组装为字节序列。
///
/// 每 8 个连续比特组成一个字节，组内第 `j` 个比特对应字节的第 `7 - j` 位。
///
/// # Errors
///
/// 如果 `bits.len()` 不是 8 的倍数，返回 [`StegoError::InvalidLength`]。
pub fn bits_to_bytes(bits: &[bool]) -> Result<Vec<u8>, StegoError> {
    if bits.len() % 8 != 0 {
        return Err(StegoError::InvalidLength(bits.len()));
    }

    Ok(bits
        .chunks_exact(8)
        .map(|group| {
            group
                .iter()
                .enumerate()
                .filter(|&(_, &bit)| bit)
                .fold(0u8, |byte, (j, _)| byte | (1 << (7 - j)))
        })
        .collect())
}
