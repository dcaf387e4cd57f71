//! 画像変換モジュール
//!
//! 元画像をWeb配信用の形式へ変換する。固定形式（JPEG・固定品質）、
//! 最大幅超過時のみ縮小、アルファ等は不透明RGBへ平坦化。

use crate::error::{GalleryError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 変換後アセットの固定拡張子
pub const OUTPUT_EXTENSION: &str = "jpg";

/// 変換パラメータ
#[derive(Debug, Clone)]
pub struct TranscodeOptions {
    /// これを超える幅の画像のみ縮小する（拡大はしない）
    pub max_width: u32,
    /// JPEG品質 (1-100)
    pub quality: u8,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            max_width: 1600,
            quality: 85,
        }
    }
}

/// 1枚の画像を変換して書き出す
///
/// 失敗（破損画像・非対応形式・IOエラー）は呼び出し側でログしてスキップする。
/// 出力された画像の寸法を返す。
pub fn transcode(source: &Path, target: &Path, options: &TranscodeOptions) -> Result<(u32, u32)> {
    let img = image::open(source)
        .map_err(|e| GalleryError::ImageLoad(format!("{}: {}", source.display(), e)))?;

    // カラーモードで判定して不透明RGBへ落とす。画素の中身は見ない。
    let img = match img {
        DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let (width, height) = img.dimensions();
    let img = if width > options.max_width {
        let new_height =
            (height as f64 * (options.max_width as f64 / width as f64)) as u32;
        img.resize_exact(options.max_width, new_height, FilterType::Lanczos3)
    } else {
        img
    };

    let (out_width, out_height) = img.dimensions();

    let file = File::create(target)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, options.quality);
    img.write_with_encoder(encoder)?;
    writer.flush()?;

    Ok((out_width, out_height))
}
