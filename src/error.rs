//! # 错误类型
//!
//! 编解码核心返回 [`StegoError`]；归档与图像两个外部协作者分别返回
//! [`ArchiveError`] 和 [`CarrierError`]。上层 (`pipeline`, `handler`) 使用
//! `anyhow` 为它们附加阶段上下文。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 隐写编解码过程中可能出现的错误。
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Bit sequence length {0} is not a multiple of 8")]
    InvalidLength(usize),

    #[error("Header must be exactly 32 bits, got {0}")]
    InvalidHeaderSize(usize),

    #[error("Not enough space in the image. Required: {required} bits, Capacity: {capacity} bits")]
    InsufficientCapacity { required: u64, capacity: u64 },

    #[error("Image ended after {read} of 32 header bits")]
    IncompleteHeader { read: u64 },

    #[error("Image ended after {read} of {expected} frame bits")]
    IncompletePayload { read: u64, expected: u64 },

    #[error("Payload of {0} bytes exceeds the 2147483647 byte limit of the header")]
    PayloadTooLarge(u64),
}

/// 打包/解包文件树时的错误。
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Source does not exist: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source is neither a file nor a directory: {0}")]
    InvalidSource(PathBuf),

    #[error("Archive entry escapes the output directory: {0}")]
    UnsafeEntry(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Malformed archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// 载入/保存载体图像时的错误。
#[derive(Error, Debug)]
pub enum CarrierError {
    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    #[error("Image path is not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Unable to access image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unable to encode image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
