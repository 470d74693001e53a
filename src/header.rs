//! # 长度头部
//!
//! 负载前固定的 4 字节大端序长度字段。头部长度是协议常量，从不根据数据计算。

use crate::bits::{bits_to_bytes, bytes_to_bits};
use crate::constants::{HEADER_SIZE_BITS, HEADER_SIZE_BYTES};
use crate::error::StegoError;

/// 将负载的字节长度编码为 32 个比特 (大端序，MSB-first)。
pub fn encode(size: u32) -> Vec<bool> {
    bytes_to_bits(&size.to_be_bytes())
}

/// 从 32 个头部比特中解码负载的字节长度。
///
/// # Errors
///
/// 如果 `header_bits` 的长度不是 32，返回 [`StegoError::InvalidHeaderSize`]。
pub fn decode(header_bits: &[bool]) -> Result<u32, StegoError> {
    if header_bits.len() != HEADER_SIZE_BITS {
        return Err(StegoError::InvalidHeaderSize(header_bits.len()));
    }

    let bytes: [u8; HEADER_SIZE_BYTES] = bits_to_bytes(header_bits)?
        .try_into()
        .map_err(|_| StegoError::InvalidHeaderSize(header_bits.len()))?;

    Ok(u32::from_be_bytes(bytes))
}

/// 头部占用的比特数，固定为 32。
pub const fn header_size_bits() -> usize {
    HEADER_SIZE_BITS
}

/// 头部占用的字节数，固定为 4。
pub const fn header_size_bytes() -> usize {
    HEADER_SIZE_BYTES
}
