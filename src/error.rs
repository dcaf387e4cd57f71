use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像処理エラー: {0}")]
    Image(#[from] image::ImageError),

    #[error("比率指定が不正: {0}（例: 16:9）")]
    InvalidRatio(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
