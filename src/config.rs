use crate::error::{GalleryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// パイプライン設定
///
/// 設定ファイルで一部のフィールドだけ指定した場合、残りは既定値になる。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 元画像フォルダ
    pub raw_dir: PathBuf,
    /// 変換済み画像の出力フォルダ
    pub processed_dir: PathBuf,
    /// カタログ本体（JSON）
    pub data_file: PathBuf,
    /// カタログのスクリプト埋め込みミラー
    pub data_js_file: PathBuf,
    /// 出力画像の最大幅px（超える場合のみ縮小）
    pub max_width: u32,
    /// JPEG品質 (1-100)
    pub jpeg_quality: u8,
    /// 新規エントリのタイトル書式（{date} が日付に置換される）
    pub title_template: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("raw_images"),
            processed_dir: PathBuf::from("images"),
            data_file: PathBuf::from("data.json"),
            data_js_file: PathBuf::from("data.js"),
            max_width: 1600,
            jpeg_quality: 85,
            title_template: "Minnie 的画 - {date}".into(),
        }
    }
}

impl Config {
    /// 設定を読み込む
    ///
    /// 明示パス指定時は読めなければエラー。省略時は既定パスにあれば読み、
    /// なければ既定値を返す。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    GalleryError::Config(format!(
                        "設定ファイルを読めません: {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                serde_json::from_str(&content).map_err(|e| {
                    GalleryError::Config(format!(
                        "設定ファイルが不正: {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
            None => {
                let path = Self::config_path()?;
                if path.exists() {
                    let content = std::fs::read_to_string(&path)?;
                    serde_json::from_str(&content)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GalleryError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-gallery").join("config.json"))
    }

    /// 境界での検証。不正値はここで弾き、変換処理まで持ち込まない。
    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 {
            return Err(GalleryError::Config("max_width は1以上".into()));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(GalleryError::Config("jpeg_quality は1〜100".into()));
        }
        if !self.title_template.contains("{date}") {
            return Err(GalleryError::Config(
                "title_template に {date} が含まれていません".into(),
            ));
        }
        Ok(())
    }

    /// タイトル書式に日付を埋め込む
    pub fn title_for(&self, date: &str) -> String {
        self.title_template.replace("{date}", date)
    }
}
