//! # 容量规划
//!
//! 每个像素的红、绿、蓝通道各提供一个比特，alpha 不参与存储。
//! 所有计算都使用 `u64`，避免大尺寸图像 (约 27k×27k 以上) 在 32 位下溢出。

use crate::constants::{CHANNELS_PER_PIXEL, HEADER_SIZE_BITS};
use crate::error::StegoError;

/// 计算 `width × height` 图像可承载的比特数。
pub fn capacity_bits(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * CHANNELS_PER_PIXEL as u64
}

/// 扣除头部之后，图像最多能承载的负载字节数。
pub fn max_payload_bytes(width: u32, height: u32) -> u64 {
    capacity_bits(width, height).saturating_sub(HEADER_SIZE_BITS as u64) / 8
}

/// 检查所需比特数是否能放入载体。必须在修改任何像素之前调用。
///
/// # Errors
///
/// 当 `required_bits > capacity_bits` 时返回 [`StegoError::InsufficientCapacity`]，
/// 其中带有两个数值以便诊断。
pub fn validate(required_bits: u64, capacity_bits: u64) -> Result<(), StegoError> {
    if required_bits > capacity_bits {
        return Err(StegoError::InsufficientCapacity {
            required: required_bits,
            capacity: capacity_bits,
        });
    }
    Ok(())
}
