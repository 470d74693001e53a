//! # 隐写核心
//!
//! 帧 (frame) = 32 位长度头部 + 负载比特流。嵌入时按光栅顺序 (行优先，自上而下、
//! 自左而右) 遍历像素，依次把帧的比特写入红、绿、蓝通道的最低有效位；alpha 通道
//! 保持不变。提取时按同样的顺序先读出头部，再读出整个帧。

use crate::bits::{bits_to_bytes, bytes_to_bits};
use crate::capacity::{capacity_bits, validate};
use crate::constants::{CHANNELS_PER_PIXEL, HEADER_SIZE_BITS, MAX_PAYLOAD_LEN};
use crate::error::StegoError;
use crate::header;
use image::RgbaImage;
use tracing::{debug, info};

/// 为一段负载构造完整的帧：头部比特在前，负载比特在后。
///
/// # Errors
///
/// 负载超过 `i32::MAX` 字节时返回 [`StegoError::PayloadTooLarge`]。
pub fn build_frame(payload: &[u8]) -> Result<Vec<bool>, StegoError> {
    let len = u32::try_from(payload.len())
        .ok()
        .filter(|&len| len <= MAX_PAYLOAD_LEN)
        .ok_or(StegoError::PayloadTooLarge(payload.len() as u64))?;

    let mut frame = header::encode(len);
    frame.extend(bytes_to_bits(payload));
    Ok(frame)
}

/// 把帧写入图像像素的最低有效位。
///
/// 容量在写入任何像素之前检查，因此失败时图像保持原样。帧耗尽后立即停止，
/// 其余通道和像素不做修改。
///
/// # Errors
///
/// 帧比特数超过图像容量时返回 [`StegoError::InsufficientCapacity`]。
pub fn embed(image: &mut RgbaImage, frame: &[bool]) -> Result<(), StegoError> {
    let capacity = capacity_bits(image.width(), image.height());
    validate(frame.len() as u64, capacity)?;

    let mut bits = frame.iter().copied().peekable();

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        if bits.peek().is_none() {
            debug!(x, y, "frame exhausted, stopping scan");
            break;
        }

        // 通道先行：通道用完时 zip 不会多取一个比特
        for (channel, bit) in pixel.0[..CHANNELS_PER_PIXEL].iter_mut().zip(bits.by_ref()) {
            *channel = (*channel & 0xFE) | u8::from(bit);
        }
    }

    debug_assert!(bits.peek().is_none(), "capacity check let an oversized frame through");

    info!(bits = frame.len(), capacity, "frame embedded");
    Ok(())
}

/// 构造帧并嵌入图像，返回写入的比特数。
///
/// # Errors
///
/// * 负载超过 `i32::MAX` 字节时返回 [`StegoError::PayloadTooLarge`]。
/// * 帧比特数超过图像容量时返回 [`StegoError::InsufficientCapacity`]，图像保持原样。
pub fn hide(image: &mut RgbaImage, payload: &[u8]) -> Result<u64, StegoError> {
    let frame = build_frame(payload)?;
    embed(image, &frame)?;
    Ok(frame.len() as u64)
}

/// 从图像中恢复负载字节。
///
/// 第一阶段读出 32 个头部比特得到负载长度；第二阶段从头重新扫描，
/// 读出 `32 + 8 * 长度` 个比特并丢弃头部。
///
/// # Errors
///
/// * 图像不足 32 个比特时返回 [`StegoError::IncompleteHeader`]。
/// * 头部声明的长度超出图像容量时返回 [`StegoError::IncompletePayload`]。
/// * 头部长度超过 `i32::MAX` 且图像容量足以容纳时返回 [`StegoError::PayloadTooLarge`]。
///   容量先于长度上限检查，所以在常规尺寸的图像上这种头部报告为 `IncompletePayload`。
pub fn extract(image: &RgbaImage) -> Result<Vec<u8>, StegoError> {
    let header_bits = read_lsbs(image, HEADER_SIZE_BITS as u64);
    if header_bits.len() < HEADER_SIZE_BITS {
        return Err(StegoError::IncompleteHeader {
            read: header_bits.len() as u64,
        });
    }

    let payload_len = header::decode(&header_bits)?;
    let capacity = capacity_bits(image.width(), image.height());
    let total_bits = frame_bits_for(payload_len, capacity)?;
    debug!(payload_len, total_bits, "header decoded");

    let frame = read_lsbs(image, total_bits);
    if (frame.len() as u64) < total_bits {
        return Err(StegoError::IncompletePayload {
            read: frame.len() as u64,
            expected: total_bits,
        });
    }

    let payload = bits_to_bytes(&frame[HEADER_SIZE_BITS..])?;
    info!(bytes = payload.len(), "payload extracted");
    Ok(payload)
}

/// 根据头部长度计算整个帧的比特数，并检查它能否从 `capacity` 个比特中读出。
fn frame_bits_for(payload_len: u32, capacity: u64) -> Result<u64, StegoError> {
    let total_bits = HEADER_SIZE_BITS as u64 + 8 * u64::from(payload_len);
    if total_bits > capacity {
        return Err(StegoError::IncompletePayload {
            read: capacity,
            expected: total_bits,
        });
    }
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(StegoError::PayloadTooLarge(u64::from(payload_len)));
    }
    Ok(total_bits)
}

/// 按光栅顺序读出最多 `count` 个通道最低有效位。
fn read_lsbs(image: &RgbaImage, count: u64) -> Vec<bool> {
    let count = usize::try_from(count).unwrap_or(usize::MAX);

    image
        .pixels()
        .flat_map(|pixel| pixel.0[..CHANNELS_PER_PIXEL].iter().map(|&c| c & 1 == 1))
        .take(count)
        .collect()
}
