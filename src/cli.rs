use crate::normalizer::AspectRatio;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-gallery")]
#[command(about = "ギャラリー画像の取り込み・Webカタログ生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 元画像フォルダを走査し、新しい画像をカタログへ取り込む
    Ingest {
        /// 設定ファイル（省略時は ~/.config/photo-gallery/config.json）
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 元画像フォルダ（設定を上書き）
        #[arg(long)]
        raw_dir: Option<PathBuf>,

        /// 変換済み画像の出力フォルダ（設定を上書き）
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// 出力画像の最大幅px（設定を上書き）
        #[arg(long)]
        max_width: Option<u32>,
    },

    /// 画像を目標アスペクト比へスマートパディングする
    Pad {
        /// 入力画像パス
        #[arg(required = true)]
        input: PathBuf,

        /// 出力画像パス（拡張子で出力形式が決まる）
        #[arg(required = true)]
        output: PathBuf,

        /// 目標比率（例: 16:9。省略時は横長→16:9 / 縦長→9:16）
        #[arg(short, long)]
        ratio: Option<AspectRatio>,
    },

    /// カタログの状態を表示
    Status {
        /// 設定ファイル（省略時は既定パス）
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 設定を表示/初期化
    Config {
        /// 既定値の設定ファイルを書き出す
        #[arg(long)]
        init: bool,

        /// 有効な設定を表示
        #[arg(long)]
        show: bool,
    },
}
