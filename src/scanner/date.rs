//! ファイル名からの日付抽出
//!
//! カタログの日付はファイル名だけから決める。EXIF等へのフォールバックは
//! しない。判別できないファイルは取り込まれず、次回実行で再試行される。

use regex::Regex;

/// ファイル名から `YYYY-MM-DD` 形式の日付を取り出す
///
/// 優先順:
/// 1. 連続8桁 `YYYYMMDD`（例: 20251206.jpg）
/// 2. `YYYY-MM-DD`（例: 2025-12-06.jpg）
///
/// 最初にマッチした箇所のみ使う。月13日40のような暦として不正な値も
/// そのまま通す。
pub fn extract_date(file_name: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref COMPACT_RE: Regex = Regex::new(r"(\d{4})(\d{2})(\d{2})").unwrap();
        static ref DASHED_RE: Regex = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
    }

    if let Some(caps) = COMPACT_RE.captures(file_name) {
        return Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]));
    }

    if let Some(caps) = DASHED_RE.captures(file_name) {
        return Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]));
    }

    None
}
