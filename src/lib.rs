//! # lsb_stash 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：比特与头部编解码、容量规划、
//! 像素最低有效位的嵌入与提取，以及归档和图像读写这两个外部协作者。

// 声明库包含的所有模块。

pub mod archive;
pub mod bits;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod header;
pub mod image_io;
pub mod pipeline;
pub mod steganography;

pub use error::{ArchiveError, CarrierError, StegoError};
