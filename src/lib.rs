//! 画像・動画AI推論クライアント
//!
//! 1つのファイルを分類・物体検出・セグメンテーションのいずれかの
//! エンドポイントへ送り、モード別の結果を表示する。
//! 状態遷移と結果表示は `media_ai_common` にあり、Web版と共有している。

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod media;
pub mod session;
pub mod ui;
