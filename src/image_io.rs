//! # 载体图像读写
//!
//! 读入时统一转换为 RGBA8，写出时只使用无损格式，避免破坏最低有效位。

use crate::error::CarrierError;
use image::{ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tracing::debug;

/// 本工具能写出的无损格式。
const LOSSLESS_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Qoi,
    ImageFormat::WebP,
];

/// 从 `path` 读取并解码图像。
///
/// # Errors
///
/// 依次检查：路径存在 ([`CarrierError::NotFound`])、是普通文件
/// ([`CarrierError::NotAFile`])、可读 ([`CarrierError::Io`])、可解码
/// ([`CarrierError::Decode`])。
pub fn load(path: &Path) -> Result<RgbaImage, CarrierError> {
    if !path.exists() {
        return Err(CarrierError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(CarrierError::NotAFile(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| CarrierError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let image = image::load_from_memory(&bytes).map_err(|source| CarrierError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "image loaded"
    );
    Ok(image.to_rgba8())
}

/// 将图像保存到 `path`，必要时创建父目录。
///
/// 扩展名是受支持的无损格式时按该格式编码，否则一律写成 PNG。
pub fn save(image: &RgbaImage, path: &Path) -> Result<(), CarrierError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CarrierError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let format = output_format(path);
    debug!(path = %path.display(), ?format, "saving image");

    image
        .save_with_format(path, format)
        .map_err(|source| CarrierError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

pub fn get_pixel(image: &RgbaImage, x: u32, y: u32) -> Rgba<u8> {
    *image.get_pixel(x, y)
}

pub fn set_pixel(image: &mut RgbaImage, x: u32, y: u32, pixel: Rgba<u8>) {
    image.put_pixel(x, y, pixel);
}

fn output_format(path: &Path) -> ImageFormat {
    ImageFormat::from_path(path)
        .ok()
        .filter(|format| LOSSLESS_FORMATS.contains(format))
        .unwrap_or(ImageFormat::Png)
}
