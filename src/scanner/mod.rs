pub mod date;

use crate::error::{GalleryError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 元画像フォルダの走査結果1件
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub file_name: String,
    /// 拡張子を除いた語幹。カタログIDと出力ファイル名の元になる。
    pub stem: String,
}

/// 元画像フォルダを走査する
///
/// 直下のみ（再帰しない）。ドットファイルとディレクトリは飛ばす。
/// 拡張子では絞らない。画像でないファイルは日付抽出か変換の段階で弾かれる。
pub fn scan_source_dir(dir: &Path) -> Result<Vec<SourceImage>> {
    if !dir.exists() {
        return Err(GalleryError::FolderNotFound(dir.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if file_name.starts_with('.') {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        images.push(SourceImage {
            path: path.to_path_buf(),
            file_name,
            stem,
        });
    }

    // ファイル名でソートし、取り込み順を決定的にする
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}
