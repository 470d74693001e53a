//! # 嵌入/提取流程
//!
//! 把归档、图像读写与隐写核心串联起来。每一步失败都会附带所处阶段的上下文，
//! 方便调用者判断是嵌入还是提取、头部还是负载出了问题。

use crate::capacity::{capacity_bits, validate};
use crate::error::StegoError;
use crate::{archive, image_io, steganography};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// 一次成功嵌入的摘要。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    pub payload_bytes: usize,
    pub frame_bits: u64,
    pub capacity_bits: u64,
    pub dest: PathBuf,
}

/// 一次成功提取的摘要。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub payload_bytes: usize,
    pub entries: usize,
    pub output: PathBuf,
}

/// 打包 `source`，嵌入 `carrier` 的像素中，并把结果图像写到 `dest`。
///
/// 容量不足时在修改任何像素之前失败，且不会写出 `dest`。
pub fn embed_path(carrier: &Path, source: &Path, dest: &Path) -> Result<EmbedReport> {
    let blob = archive::pack(source).with_context(|| {
        format!("Embedding: unable to archive source {}", source.display())
    })?;
    info!(bytes = blob.len(), "source archived");

    let frame = steganography::build_frame(&blob).context("Embedding: unable to frame payload")?;

    let mut image = image_io::load(carrier).context("Embedding: unable to load carrier image")?;

    let capacity = capacity_bits(image.width(), image.height());
    validate(frame.len() as u64, capacity).context("Embedding: carrier image is too small")?;

    steganography::embed(&mut image, &frame).context("Embedding: unable to write frame")?;

    image_io::save(&image, dest).context("Embedding: unable to save carrier image")?;

    Ok(EmbedReport {
        payload_bytes: blob.len(),
        frame_bits: frame.len() as u64,
        capacity_bits: capacity,
        dest: dest.to_path_buf(),
    })
}

/// 从 `stego` 中恢复归档并解包到 `output`。
///
/// 只有在完整、正确分帧的字节块恢复之后才会写出任何文件。
pub fn extract_path(stego: &Path, output: &Path) -> Result<ExtractReport> {
    let image = image_io::load(stego).context("Extraction: unable to load image")?;

    let blob = steganography::extract(&image).map_err(|err| {
        let phase = match &err {
            StegoError::IncompleteHeader { .. } | StegoError::InvalidHeaderSize(_) => "header",
            _ => "payload",
        };
        anyhow::Error::new(err).context(format!("Extraction: unable to read {phase}"))
    })?;

    let entries = archive::unpack(&blob, output).with_context(|| {
        format!(
            "Extraction: recovered data is not a valid archive or {} is not writable",
            output.display()
        )
    })?;
    info!(entries, output = %output.display(), "archive unpacked");

    Ok(ExtractReport {
        payload_bytes: blob.len(),
        entries,
        output: output.to_path_buf(),
    })
}
