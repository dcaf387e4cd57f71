use clap::Parser;
use photo_gallery_rust::{catalog, cli, config, error, normalizer, pipeline};

use cli::{Cli, Commands};
use config::Config;
use error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            config,
            raw_dir,
            out_dir,
            max_width,
        } => {
            println!("🌻 photo-gallery - ギャラリー更新\n");

            let mut config = Config::load(config.as_deref())?;
            if let Some(dir) = raw_dir {
                config.raw_dir = dir;
            }
            if let Some(dir) = out_dir {
                config.processed_dir = dir;
            }
            if let Some(width) = max_width {
                config.max_width = width;
            }
            config.validate()?;

            if cli.verbose {
                println!("設定:");
                println!("  元画像: {}", config.raw_dir.display());
                println!("  出力先: {}", config.processed_dir.display());
                println!(
                    "  最大幅: {}px / JPEG品質: {}",
                    config.max_width, config.jpeg_quality
                );
                println!();
            }

            let report = pipeline::run(&config, cli.verbose)?;

            println!();
            if report.added_count() > 0 {
                println!("✅ 新しい画像を{}枚追加しました", report.added_count());
            } else {
                println!("✨ 新しい画像はありません。カタログは最新です");
            }
            if !report.skipped_no_date.is_empty() || !report.failed.is_empty() {
                println!(
                    "   保留: 日付不明 {}件 / 変換失敗 {}件（次回の実行で再試行されます）",
                    report.skipped_no_date.len(),
                    report.failed.len()
                );
            }
        }

        Commands::Pad {
            input,
            output,
            ratio,
        } => {
            println!("🖼  photo-gallery - スマートパディング\n");

            match normalizer::pad_file(&input, &output, ratio)? {
                normalizer::PadOutcome::AlreadyFits {
                    width,
                    height,
                    ratio,
                } => {
                    println!(
                        "✓ すでに {} 比率です（{}x{}）。そのまま保存しました",
                        ratio, width, height
                    );
                }
                normalizer::PadOutcome::Padded { from, to, ratio } => {
                    println!(
                        "✓ 処理完了: {}x{} → {}x{} ({})",
                        from.0, from.1, to.0, to.1, ratio
                    );
                }
            }
            println!("  出力: {}", output.display());
        }

        Commands::Status { config } => {
            let config = Config::load(config.as_deref())?;
            let store =
                catalog::CatalogStore::new(config.data_file.clone(), config.data_js_file.clone());

            println!("カタログ情報:");
            println!("  パス: {}", store.data_path().display());
            match store.load() {
                catalog::CatalogLoad::Loaded(entries) => {
                    println!("  件数: {}", entries.len());
                    if let Some(newest) = entries.iter().map(|e| e.date.as_str()).max() {
                        println!("  最新日付: {}", newest);
                    }
                }
                catalog::CatalogLoad::Recovered { reason } => {
                    println!("  状態: 読み込み不可（破損の可能性）: {}", reason);
                }
            }
            if let Ok(meta) = std::fs::metadata(store.data_path()) {
                println!("  サイズ: {} bytes", meta.len());
            }
        }

        Commands::Config { init, show } => {
            if init {
                let config = Config::default();
                config.save()?;
                println!(
                    "✔ 既定の設定を書き出しました: {}",
                    Config::config_path()?.display()
                );
            }

            if show || !init {
                let config = Config::load(None)?;
                println!("設定:");
                println!("  元画像フォルダ: {}", config.raw_dir.display());
                println!("  出力フォルダ: {}", config.processed_dir.display());
                println!(
                    "  カタログ: {} / {}",
                    config.data_file.display(),
                    config.data_js_file.display()
                );
                println!("  最大幅: {}px", config.max_width);
                println!("  JPEG品質: {}", config.jpeg_quality);
                println!("  タイトル書式: {}", config.title_template);
            }
        }
    }

    Ok(())
}
