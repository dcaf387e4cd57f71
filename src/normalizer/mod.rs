//! アスペクト比正規化（スマートパディング）モジュール
//!
//! 原画像を切り抜かず・変形せずに目標比率のキャンバスへ収める。
//! 余白は単色ではなく、原画像を引き伸ばしてぼかし・減光した背景で埋める。
//!
//! ## 処理フロー
//! 1. 元の比率が目標の1%以内ならそのまま保存
//! 2. 長辺を保ったままキャンバス寸法を算出
//! 3. 引き伸ばし→ガウスぼかし→減光で背景を生成
//! 4. 原画像を中央へ合成
//!
//! 取り込みパイプラインからは独立した前処理。監視フォルダへ置く前に
//! 手動で適用する。

use crate::error::{GalleryError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// 背景ぼかしの強さ（ガウスぼかしのシグマ）
const BLUR_SIGMA: f32 = 30.0;
/// 背景の明度係数。中央の原画像を主役として読ませるため4割暗くする。
const BACKGROUND_BRIGHTNESS: f32 = 0.6;
/// この相対誤差以内なら補完不要とみなす
const RATIO_TOLERANCE: f64 = 0.01;
/// JPEG出力時の品質
const OUTPUT_JPEG_QUALITY: u8 = 95;

/// 目標アスペクト比（幅:高さ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// 横長・正方形画像の既定比率
    pub const LANDSCAPE: AspectRatio = AspectRatio {
        width: 16,
        height: 9,
    };
    /// 縦長画像の既定比率
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 9,
        height: 16,
    };

    /// 幅/高さの比の値
    pub fn value(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// 比率が明示されなかった場合の自動選択
    ///
    /// 横長・正方形（比率1以上）は16:9、縦長は9:16。
    pub fn auto_select(width: u32, height: u32) -> AspectRatio {
        if width as f64 / height as f64 >= 1.0 {
            Self::LANDSCAPE
        } else {
            Self::PORTRAIT
        }
    }
}

impl FromStr for AspectRatio {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            return Err(GalleryError::InvalidRatio(s.to_string()));
        }

        let width: u32 = parts[0]
            .parse()
            .map_err(|_| GalleryError::InvalidRatio(s.to_string()))?;
        let height: u32 = parts[1]
            .parse()
            .map_err(|_| GalleryError::InvalidRatio(s.to_string()))?;

        if width == 0 || height == 0 {
            return Err(GalleryError::InvalidRatio(s.to_string()));
        }

        Ok(AspectRatio { width, height })
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// パディング結果
#[derive(Debug)]
pub enum PadOutcome {
    /// 既に目標比率（1%以内）だったため無加工で保存した
    AlreadyFits {
        width: u32,
        height: u32,
        ratio: AspectRatio,
    },
    /// 補完して保存した
    Padded {
        from: (u32, u32),
        to: (u32, u32),
        ratio: AspectRatio,
    },
}

/// 元の比率が目標の1%以内か
pub fn fits_ratio(width: u32, height: u32, ratio: &AspectRatio) -> bool {
    let orig = width as f64 / height as f64;
    ((orig - ratio.value()) / ratio.value()).abs() < RATIO_TOLERANCE
}

/// 原画像を完全に含む目標比率のキャンバス寸法
///
/// 元が目標より横長なら幅を保って高さを伸ばし、そうでなければ高さを
/// 保って幅を伸ばす。小数は切り捨て。
pub fn target_canvas(width: u32, height: u32, ratio: &AspectRatio) -> (u32, u32) {
    let orig = width as f64 / height as f64;

    if orig > ratio.value() {
        (width, (width as f64 / ratio.value()) as u32)
    } else {
        ((height as f64 * ratio.value()) as u32, height)
    }
}

fn center_offset(canvas: (u32, u32), source: (u32, u32)) -> (i64, i64) {
    (
        ((canvas.0 - source.0) / 2) as i64,
        ((canvas.1 - source.1) / 2) as i64,
    )
}

/// 目標比率のキャンバスへ補完する（純粋変換）
///
/// 背景は原画像をキャンバス寸法へ引き伸ばし（クロップしない）、
/// ぼかして減光したもの。原画像は無加工のまま中央へ合成される。
pub fn pad_to_ratio(img: &DynamicImage, ratio: &AspectRatio) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (canvas_width, canvas_height) = target_canvas(width, height, ratio);

    let stretched = img
        .resize_exact(canvas_width, canvas_height, FilterType::Lanczos3)
        .to_rgb8();
    let mut background = imageops::blur(&stretched, BLUR_SIGMA);
    for pixel in background.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = (*channel as f32 * BACKGROUND_BRIGHTNESS) as u8;
        }
    }

    let (offset_x, offset_y) = center_offset((canvas_width, canvas_height), (width, height));
    imageops::overlay(&mut background, &img.to_rgb8(), offset_x, offset_y);

    DynamicImage::ImageRgb8(background)
}

/// ファイルを読み、補完して書き出す
///
/// 比率省略時は自動選択。出力形式は出力パスの拡張子で決まる。
pub fn pad_file(input: &Path, output: &Path, ratio: Option<AspectRatio>) -> Result<PadOutcome> {
    let img = image::open(input)
        .map_err(|e| GalleryError::ImageLoad(format!("{}: {}", input.display(), e)))?;
    let (width, height) = img.dimensions();
    let ratio = ratio.unwrap_or_else(|| AspectRatio::auto_select(width, height));

    if fits_ratio(width, height, &ratio) {
        save_for_extension(&img, output)?;
        return Ok(PadOutcome::AlreadyFits {
            width,
            height,
            ratio,
        });
    }

    let padded = pad_to_ratio(&img, &ratio);
    let (out_width, out_height) = padded.dimensions();
    save_for_extension(&padded, output)?;

    Ok(PadOutcome::Padded {
        from: (width, height),
        to: (out_width, out_height),
        ratio,
    })
}

/// 拡張子に応じて書き出す
///
/// jpg/jpeg は品質指定つきで、その他の拡張子はコーデック既定の
/// パラメータでエンコードする。
fn save_for_extension(img: &DynamicImage, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            let encoder = JpegEncoder::new_with_quality(&mut writer, OUTPUT_JPEG_QUALITY);
            rgb.write_with_encoder(encoder)?;
            writer.flush()?;
        }
        _ => img.save(path)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_ratio_parse() {
        let ratio: AspectRatio = "16:9".parse().unwrap();
        assert_eq!(ratio, AspectRatio::LANDSCAPE);

        let ratio: AspectRatio = "9:16".parse().unwrap();
        assert_eq!(ratio, AspectRatio::PORTRAIT);

        let ratio: AspectRatio = "4:3".parse().unwrap();
        assert!((ratio.value() - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_parse_rejects_malformed() {
        assert!("".parse::<AspectRatio>().is_err());
        assert!("16".parse::<AspectRatio>().is_err());
        assert!("16:9:2".parse::<AspectRatio>().is_err());
        assert!("a:b".parse::<AspectRatio>().is_err());
        assert!("0:9".parse::<AspectRatio>().is_err());
        assert!("16:0".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_ratio_display() {
        assert_eq!(AspectRatio::LANDSCAPE.to_string(), "16:9");
    }

    #[test]
    fn test_auto_select() {
        assert_eq!(AspectRatio::auto_select(2000, 1000), AspectRatio::LANDSCAPE);
        // 正方形は横長扱い
        assert_eq!(AspectRatio::auto_select(500, 500), AspectRatio::LANDSCAPE);
        assert_eq!(AspectRatio::auto_select(1000, 2000), AspectRatio::PORTRAIT);
    }

    #[test]
    fn test_target_canvas_wider_source() {
        // 2000x1000 (比率2.0) → 16:9 なら幅を保って高さ1125
        assert_eq!(
            target_canvas(2000, 1000, &AspectRatio::LANDSCAPE),
            (2000, 1125)
        );
    }

    #[test]
    fn test_target_canvas_taller_source() {
        // 1000x2000 (比率0.5) → 9:16 なら高さを保って幅1125
        assert_eq!(
            target_canvas(1000, 2000, &AspectRatio::PORTRAIT),
            (1125, 2000)
        );
    }

    #[test]
    fn test_center_offset_truncates() {
        // (1125-1000)/2 = 62.5 → 62
        assert_eq!(center_offset((2000, 1125), (2000, 1000)), (0, 62));
    }

    #[test]
    fn test_fits_ratio_tolerance() {
        // ぴったり
        assert!(fits_ratio(1920, 1080, &AspectRatio::LANDSCAPE));
        // 1%以内のずれ
        assert!(fits_ratio(1921, 1080, &AspectRatio::LANDSCAPE));
        // 大きくずれている
        assert!(!fits_ratio(2000, 1000, &AspectRatio::LANDSCAPE));
        assert!(!fits_ratio(1000, 1000, &AspectRatio::LANDSCAPE));
    }

    #[test]
    fn test_pad_to_ratio_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, Rgb([200, 10, 10])));
        let padded = pad_to_ratio(&img, &AspectRatio::LANDSCAPE);
        // 64/ (16/9) = 36
        assert_eq!(padded.dimensions(), (64, 36));
    }

    #[test]
    fn test_pad_keeps_source_pixels_at_center() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, Rgb([200, 10, 10])));
        let padded = pad_to_ratio(&img, &AspectRatio::LANDSCAPE);

        let buffer = padded.as_rgb8().unwrap();
        // 中央は原画像の画素がそのまま載る
        assert_eq!(buffer.get_pixel(32, 18), &Rgb([200, 10, 10]));
        // 上端は減光された背景（原画像の単色より暗い）
        let top = buffer.get_pixel(32, 0);
        assert!(top.0[0] < 200);
    }

    #[test]
    fn test_pad_file_noop_within_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("fit.png");
        let output = dir.path().join("fit_out.png");
        let original = RgbImage::from_pixel(160, 90, Rgb([10, 200, 30]));
        original.save(&input).unwrap();

        let outcome = pad_file(&input, &output, Some(AspectRatio::LANDSCAPE)).unwrap();
        assert!(matches!(outcome, PadOutcome::AlreadyFits { .. }));

        // PNGは可逆なので無加工保存は画素まで一致する
        let saved = image::open(&output).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (160, 90));
        assert_eq!(saved, original);
    }

    #[test]
    fn test_pad_file_auto_ratio_portrait() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tall.png");
        let output = dir.path().join("tall_out.jpg");
        RgbImage::from_pixel(30, 90, Rgb([50, 50, 50]))
            .save(&input)
            .unwrap();

        let outcome = pad_file(&input, &output, None).unwrap();
        match outcome {
            PadOutcome::Padded { to, ratio, .. } => {
                assert_eq!(ratio, AspectRatio::PORTRAIT);
                // 高さ90を保って幅を 90*9/16 = 50 へ
                assert_eq!(to, (50, 90));
            }
            other => panic!("補完されるはず: {:?}", other),
        }

        assert!(output.exists());
    }

    #[test]
    fn test_pad_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = pad_file(
            &dir.path().join("none.jpg"),
            &dir.path().join("out.jpg"),
            None,
        );
        assert!(matches!(result, Err(GalleryError::ImageLoad(_))));
    }
}
