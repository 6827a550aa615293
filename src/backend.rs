//! 推論バックエンド連携
//!
//! 選択ファイルを `file` フィールド1つだけのmultipartでPOSTする。
//! エンドポイントはリクエスト発行時のモードで決まる:
//! - classify → {base}/predict/classify
//! - detect   → {base}/predict/detect
//! - segment  → {base}/predict/segment
//!
//! 2xx以外はエラー。本文の形の検証は状態遷移側で行う。

use crate::config::Config;
use crate::error::{MediaAiError, Result};
use media_ai_common::{Mode, UploadRequest};
use reqwest::multipart::{Form, Part};
use std::future::Future;
use std::time::Duration;

/// 推論バックエンド
pub trait InferenceBackend {
    /// アップロードを1回発行し、成功時はレスポンス本文を返す
    fn predict(&self, request: &UploadRequest) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// HTTPバックエンド
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// 構築済みのクライアントを使う
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.effective_base_url(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// モードに対応するエンドポイントURL
    pub fn endpoint_url(&self, mode: Mode) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            mode.endpoint_path()
        )
    }
}

impl InferenceBackend for HttpBackend {
    async fn predict(&self, request: &UploadRequest) -> Result<Vec<u8>> {
        let url = self.endpoint_url(request.mode);
        let file = &request.file;

        let part = Part::bytes(file.data().to_vec())
            .file_name(file.file_name().to_string())
            .mime_str(file.mime_type())?;
        let form = Form::new().part(UploadRequest::FIELD_NAME, part);

        tracing::info!(
            token = request.token.value(),
            url = %url,
            bytes = file.len(),
            "推論リクエスト送信"
        );

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        tracing::debug!(token = request.token.value(), status = status.as_u16(), "レスポンス受信");

        if !status.is_success() {
            return Err(MediaAiError::BackendStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
