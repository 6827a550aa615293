use clap::{Parser, Subcommand};
use media_ai_common::Mode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "media-ai")]
#[command(about = "画像・動画AI推論クライアント（分類・物体検出・セグメンテーション）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドのベースURL（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ファイルを1つ送信して結果を表示
    Process {
        /// 画像または動画ファイル
        #[arg(required = true)]
        file: PathBuf,

        /// 推論モード (classify/detect/segment)
        #[arg(short, long, default_value = "classify")]
        mode: Mode,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話モード（ファイル選択・モード切替・送信を繰り返す）
    Interactive,

    /// 設定を表示/編集
    Config {
        /// ベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// タイムアウト秒数を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
