use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("プレビュー生成エラー: {0}")]
    Preview(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("バックエンドエラー: ステータス {status}")]
    BackendStatus { status: u16 },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MediaAiError>;
