//! # 命令处理逻辑模块
//!
//! 包含处理 `embed`、`extract` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责决定输出路径、防止意外覆盖、调用 [`crate::pipeline`] 并向用户报告结果。

use crate::capacity::{capacity_bits, max_payload_bytes};
use crate::cli::{CapacityArgs, EmbedArgs, ExtractArgs};
use crate::image_io;
use crate::pipeline::{embed_path, extract_path};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Embed' 命令的执行逻辑。
///
/// 未指定输出路径时使用载体旁的 `doctored_<文件名>.png`。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `EmbedArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法打包源文件/目录，或无法读取载体图像。
/// * 图像没有足够的空间来隐藏数据。
/// * 无法写入到目标图像文件。
pub fn handle_embed(args: EmbedArgs) -> Result<()> {
    let dest = args.dest.unwrap_or_else(|| default_dest(&args.image));

    anyhow::ensure!(
        args.force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );

    let report = embed_path(&args.image, &args.source, &dest)?;

    println!(
        "Hid {} bytes ({} of {} bits) from {}",
        report.payload_bytes.to_string().green().bold(),
        report.frame_bits.to_string().green(),
        report.capacity_bits.to_string().green(),
        args.source.to_string_lossy().bold()
    );
    println!(
        "The data has been successfully hidden and saved: {}",
        report.dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 未指定输出目录时使用图像旁的 `recovered_<文件名>` 目录。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出目录已存在且非空，且未指定 `--force`。
/// * 无法读取图像，或图像中没有完整的隐藏数据。
/// * 恢复出的数据不是合法的归档，或无法写入输出目录。
pub fn handle_extract(args: ExtractArgs) -> Result<()> {
    let output = args.output.unwrap_or_else(|| default_output(&args.image));

    anyhow::ensure!(
        args.force || !is_non_empty_dir(&output)?,
        "Output directory already exists and is not empty: {}. \nUse --force to write into it.",
        output.to_string_lossy().red().bold()
    );

    let report = extract_path(&args.image, &output)?;

    println!(
        "Recovered {} bytes, {} archive entries",
        report.payload_bytes.to_string().green().bold(),
        report.entries.to_string().green()
    );
    println!(
        "The data has been successfully extracted to: {}",
        report.output.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：报告图像可承载的比特数和最大负载字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let image = image_io::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let (width, height) = image.dimensions();

    println!(
        "{} ({}x{}): {} bits, up to {} bytes of archived data",
        args.image.to_string_lossy().bold(),
        width,
        height,
        capacity_bits(width, height).to_string().green().bold(),
        max_payload_bytes(width, height).to_string().green().bold()
    );
    Ok(())
}

/// 默认的隐写结果路径：`<载体目录>/doctored_<载体文件名>.png`。
pub fn default_dest(image: &Path) -> PathBuf {
    image.with_file_name(format!("doctored_{}.png", file_stem(image)))
}

/// 默认的提取目录：`<图像目录>/recovered_<图像文件名>`。
pub fn default_output(image: &Path) -> PathBuf {
    image.with_file_name(format!("recovered_{}", file_stem(image)))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned())
}

fn is_non_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(path).with_context(|| {
        format!(
            "Unable to read output directory: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(entries.next().is_some())
}
