//! 取り込みパイプライン
//!
//! 1回の実行で終わるバッチ処理。常駐しない。
//!
//! ## 処理フロー
//! 1. 元画像・出力フォルダを用意（なければ作成）
//! 2. カタログを読み、使用済みファイル名の集合を作る
//! 3. 元画像フォルダを走査し、新規のみ 日付抽出 → 変換 → ステージ
//! 4. 新規があればカタログへ追記して保存。なければミラーだけ再生成。
//!
//! 1ファイルの失敗はそのファイルのスキップに留まり、バッチ全体や
//! 他のファイルのステージ済みエントリには波及しない。

use crate::catalog::{CatalogEntry, CatalogStore};
use crate::config::Config;
use crate::error::Result;
use crate::scanner::{self, date};
use crate::transcoder::{self, TranscodeOptions};
use std::collections::HashSet;

/// 1回の実行の集計
#[derive(Debug, Default)]
pub struct IngestReport {
    /// 走査したファイル数
    pub scanned: usize,
    /// 新規に取り込んだファイル名
    pub added: Vec<String>,
    /// カタログ登録済みのためスキップした数
    pub skipped_existing: usize,
    /// 日付を判別できず保留のままのファイル名
    pub skipped_no_date: Vec<String>,
    /// 変換に失敗して保留のままのファイル名
    pub failed: Vec<String>,
    /// カタログが破損していて空として回復した場合の理由
    pub catalog_recovered: Option<String>,
}

impl IngestReport {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }
}

/// パイプラインを1回実行する
pub fn run(config: &Config, verbose: bool) -> Result<IngestReport> {
    std::fs::create_dir_all(&config.raw_dir)?;
    std::fs::create_dir_all(&config.processed_dir)?;

    let store = CatalogStore::new(config.data_file.clone(), config.data_js_file.clone());

    let loaded = store.load();
    let mut report = IngestReport::default();
    if let Some(reason) = loaded.recovery_reason() {
        // 履歴が失われたことを黙って飲み込まない
        eprintln!(
            "⚠️  カタログを読み込めませんでした。空として続行します: {}",
            reason
        );
        report.catalog_recovered = Some(reason.to_string());
    }
    let mut entries = loaded.into_entries();

    let mut used: HashSet<String> = entries.iter().map(|e| e.filename.clone()).collect();

    let sources = scanner::scan_source_dir(&config.raw_dir)?;
    report.scanned = sources.len();

    let options = TranscodeOptions {
        max_width: config.max_width,
        quality: config.jpeg_quality,
    };

    let mut staged = Vec::new();

    for source in &sources {
        // 出力ファイル名を先に確定し、登録済みならスキップ（再実行の冪等性）
        let processed_filename = format!("{}.{}", source.stem, transcoder::OUTPUT_EXTENSION);
        if used.contains(&processed_filename) {
            if verbose {
                println!("⏭  登録済み: {}", source.file_name);
            }
            report.skipped_existing += 1;
            continue;
        }

        let extracted = match date::extract_date(&source.file_name) {
            Some(date) => date,
            None => {
                eprintln!(
                    "⚠️  スキップ {}: ファイル名から日付を判別できません（YYYYMMDD形式を推奨）",
                    source.file_name
                );
                report.skipped_no_date.push(source.file_name.clone());
                continue;
            }
        };

        println!("🎨 変換中: {}...", source.file_name);
        let target = config.processed_dir.join(&processed_filename);
        match transcoder::transcode(&source.path, &target, &options) {
            Ok((width, height)) => {
                if verbose {
                    println!("   {}x{} → {}", width, height, target.display());
                }
            }
            Err(e) => {
                eprintln!("⚠️  変換失敗 {}: {}", source.path.display(), e);
                report.failed.push(source.file_name.clone());
                continue;
            }
        }

        staged.push(CatalogEntry {
            id: source.stem.clone(),
            date: extracted.clone(),
            filename: processed_filename.clone(),
            title: config.title_for(&extracted),
            description: String::new(),
            music: String::new(),
        });
        used.insert(processed_filename);
        report.added.push(source.file_name.clone());
    }

    if staged.is_empty() {
        // 新規ゼロでもミラーは無条件に作り直す
        store.write_mirror(&entries)?;
    } else {
        entries.extend(staged);
        store.save(&entries)?;
    }

    Ok(report)
}
