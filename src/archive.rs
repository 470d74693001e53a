//! # 归档
//!
//! 把单个文件或整棵目录树打包成内存中的 ZIP 字节块，并能把字节块还原到目录中。
//! 隐写核心只把结果当作不透明的字节序列处理。

use crate::error::ArchiveError;
use std::fs::{self, File};
use std::io::{self, Cursor, Read, Write};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// 将 `source` (文件或目录) 打包为 ZIP 字节块。
///
/// 文件只产生一个以其文件名命名的条目。目录中的每个子目录和文件都以相对于
/// `source` 的路径 (使用 `/` 分隔) 作为条目名，根目录本身不产生条目。
/// 遍历按文件名排序，同一棵树总是得到相同的条目顺序。
///
/// # Errors
///
/// * `source` 不存在时返回 [`ArchiveError::SourceNotFound`]。
/// * `source` 既不是文件也不是目录时返回 [`ArchiveError::InvalidSource`]。
/// * 读取文件或写入 ZIP 失败时返回相应的 I/O 或 ZIP 错误。
pub fn pack(source: &Path) -> Result<Vec<u8>, ArchiveError> {
    if !source.exists() {
        return Err(ArchiveError::SourceNotFound(source.to_path_buf()));
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    if source.is_file() {
        let name = source
            .file_name()
            .ok_or_else(|| ArchiveError::InvalidSource(source.to_path_buf()))?
            .to_string_lossy()
            .into_owned();
        add_file(&mut zip, source, name, options)?;
    } else if source.is_dir() {
        // 符号链接按其目标打包；目录环会由 walkdir 报错
        for entry in WalkDir::new(source)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let name = entry_name(source, entry.path());

            if entry.file_type().is_dir() {
                debug!(%name, "adding directory");
                zip.add_directory(format!("{name}/"), options)?;
            } else if entry.file_type().is_file() {
                add_file(&mut zip, entry.path(), name, options)?;
            } else {
                return Err(ArchiveError::InvalidSource(entry.path().to_path_buf()));
            }
        }
    } else {
        return Err(ArchiveError::InvalidSource(source.to_path_buf()));
    }

    Ok(zip.finish()?.into_inner())
}

/// 将 ZIP 字节块解包到 `output`，返回写出的条目数。
///
/// 所有条目先在内存中完成校验和解压，之后才创建 `output` 并写出文件，
/// 因此损坏或不安全的归档不会留下部分结果。
///
/// # Errors
///
/// * 字节块不是合法的 ZIP 或条目校验失败时返回 [`ArchiveError::Zip`] / [`ArchiveError::Io`]。
/// * 条目路径试图逃出 `output` 时返回 [`ArchiveError::UnsafeEntry`]。
pub fn unpack(blob: &[u8], output: &Path) -> Result<usize, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(blob))?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let relative = file
            .enclosed_name()
            .ok_or_else(|| ArchiveError::UnsafeEntry(file.name().to_owned()))?;

        let contents = if file.is_dir() {
            None
        } else {
            let mut buf = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
            file.read_to_end(&mut buf)?;
            Some(buf)
        };
        entries.push((output.join(relative), contents));
    }

    fs::create_dir_all(output)?;
    for (target, contents) in &entries {
        match contents {
            None => fs::create_dir_all(target)?,
            Some(bytes) => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(target, bytes)?;
                debug!(path = %target.display(), "restored file");
            }
        }
    }

    Ok(entries.len())
}

fn add_file<W: Write + io::Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    name: String,
    options: SimpleFileOptions,
) -> Result<(), ArchiveError> {
    debug!(%name, "adding file");
    zip.start_file(name, options)?;
    let mut file = File::open(path)?;
    io::copy(&mut file, zip)?;
    Ok(())
}

fn entry_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
