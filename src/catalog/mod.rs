//! カタログ永続化モジュール
//!
//! 処理済み画像のメタデータを日付降順で保持し、常に2つの表現へ
//! 書き出す。構造化JSON（data.json）と、フロントエンドがscriptタグで
//! そのまま読み込むミラー（data.js）。両者は同一スナップショットから
//! 再生成され、内容は常に一致する。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ミラーが代入するグローバル変数名
pub const GALLERY_DATA_GLOBAL: &str = "window.__GALLERY_DATA__";

/// 処理済みアセット1件分のメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// 元ファイル名の語幹
    pub id: String,
    /// ISO形式の日付。ソートキー（降順）。
    pub date: String,
    /// 変換済みアセットのファイル名。カタログ内で一意、重複判定のキー。
    pub filename: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 将来用のBGM参照
    #[serde(default)]
    pub music: String,
}

/// カタログ読み込みの結果
///
/// 「空のカタログ」と「破損していて空として回復した」を区別する。
#[derive(Debug)]
pub enum CatalogLoad {
    Loaded(Vec<CatalogEntry>),
    Recovered { reason: String },
}

impl CatalogLoad {
    pub fn into_entries(self) -> Vec<CatalogEntry> {
        match self {
            CatalogLoad::Loaded(entries) => entries,
            CatalogLoad::Recovered { .. } => Vec::new(),
        }
    }

    pub fn recovery_reason(&self) -> Option<&str> {
        match self {
            CatalogLoad::Loaded(_) => None,
            CatalogLoad::Recovered { reason } => Some(reason),
        }
    }
}

/// カタログの2ファイルを所有するストア
pub struct CatalogStore {
    data_path: PathBuf,
    js_path: PathBuf,
}

impl CatalogStore {
    pub fn new(data_path: PathBuf, js_path: PathBuf) -> Self {
        Self { data_path, js_path }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn js_path(&self) -> &Path {
        &self.js_path
    }

    /// カタログを読み込む
    ///
    /// ファイルがなければ空。読めない・パースできない場合は
    /// `Recovered` を返し、呼び出し側が警告した上で空として続行する。
    pub fn load(&self) -> CatalogLoad {
        if !self.data_path.exists() {
            return CatalogLoad::Loaded(Vec::new());
        }

        let content = match std::fs::read_to_string(&self.data_path) {
            Ok(content) => content,
            Err(e) => {
                return CatalogLoad::Recovered {
                    reason: e.to_string(),
                }
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => CatalogLoad::Loaded(entries),
            Err(e) => CatalogLoad::Recovered {
                reason: e.to_string(),
            },
        }
    }

    /// 全エントリを日付降順に並べ替えて両ファイルへ書き出す
    ///
    /// 2ファイルは同じソート済みスナップショットから生成する。
    pub fn save(&self, entries: &[CatalogEntry]) -> Result<()> {
        let mut sorted = entries.to_vec();
        sort_entries(&mut sorted);

        self.write_data_file(&sorted)?;
        self.write_mirror(&sorted)?;
        Ok(())
    }

    /// ミラー（data.js）だけを再生成する
    ///
    /// 新規取り込みゼロの実行でも呼ばれる。外部で編集されたカタログを
    /// ミラーへ追従させるため。
    pub fn write_mirror(&self, entries: &[CatalogEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        let script = format!("{} = {};\n", GALLERY_DATA_GLOBAL, json);
        write_atomic(&self.js_path, script.as_bytes())
    }

    fn write_data_file(&self, entries: &[CatalogEntry]) -> Result<()> {
        // 4スペースインデント・非ASCIIは素通し
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        entries.serialize(&mut ser)?;
        write_atomic(&self.data_path, &buf)
    }
}

/// 日付降順。同日のエントリは元の並び順を保つ（安定ソート）。
pub fn sort_entries(entries: &mut [CatalogEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// 一時ファイルへ書いてからrenameする。読み手に書きかけの状態を見せない。
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = match path.file_name() {
        Some(name) => path.with_file_name(format!("{}.tmp", name.to_string_lossy())),
        None => {
            std::fs::write(path, bytes)?;
            return Ok(());
        }
    };

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
