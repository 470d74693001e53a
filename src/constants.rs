//! 隐写协议的固定参数。
//!
//! 这些值构成了载体图像中的数据格式，任何修改都会导致旧图像无法恢复。

/// 长度头部的字节数 (大端序 32 位长度)。
pub const HEADER_SIZE_BYTES: usize = 4;

/// 长度头部的比特数。
pub const HEADER_SIZE_BITS: usize = HEADER_SIZE_BYTES * 8;

/// 每个像素可用于存储的颜色通道数 (红、绿、蓝)。alpha 通道从不写入。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 头部字段允许的最大负载长度 (字节)。
/// 头部按有符号 32 位整数的范围使用，因此上限为 `i32::MAX`。
pub const MAX_PAYLOAD_LEN: u32 = i32::MAX as u32;
