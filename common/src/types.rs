//! 推論リクエスト・レスポンスの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Mode: 推論モード（分類・検出・セグメンテーション）
//! - SelectedFile: アップロード対象のファイル
//! - Prediction: モード別に検証済みのレスポンス
//! - RequestOutcome: 直近の送信結果

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 失敗時に表示する汎用メッセージ（原因は区別しない）
pub const FAILURE_MESSAGE: &str = "Failed to process file";

/// 推論モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Classify,
    Detect,
    Segment,
}

impl Mode {
    /// タブの表示順
    pub const ALL: [Mode; 3] = [Mode::Classify, Mode::Detect, Mode::Segment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Classify => "classify",
            Mode::Detect => "detect",
            Mode::Segment => "segment",
        }
    }

    /// バックエンドのエンドポイントパス（ベースURLからの相対）
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Mode::Classify => "predict/classify",
            Mode::Detect => "predict/detect",
            Mode::Segment => "predict/segment",
        }
    }

    /// タブのラベル
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Classify => "Classification",
            Mode::Detect => "Object Detection",
            Mode::Segment => "Segmentation",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classify" | "classification" | "c" => Ok(Mode::Classify),
            "detect" | "detection" | "d" => Ok(Mode::Detect),
            "segment" | "segmentation" | "s" => Ok(Mode::Segment),
            _ => Err(format!("Unknown mode: {}. Use classify, detect, or segment", s)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// メディア種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// MIMEタイプから判定（image/* 以外はすべて動画扱い）
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }
}

const MIME_TABLE: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
];

/// ファイル名の拡張子からMIMEタイプを推定
pub fn mime_from_file_name(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return "application/octet-stream",
    };

    MIME_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

/// アップロード対象のファイル
///
/// 内容の検証は行わない（種別・サイズの判定はバックエンドに委ねる）。
/// データは `Arc` で共有するため、リクエスト発行時の複製は安価。
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    file_name: String,
    mime_type: String,
    kind: MediaKind,
    data: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        let mime_type = mime_type.into();
        Self {
            file_name: file_name.into(),
            kind: MediaKind::from_mime(&mime_type),
            mime_type,
            data: data.into(),
        }
    }

    /// MIMEタイプをファイル名から推定して作成
    pub fn from_file_name(file_name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        let file_name = file_name.into();
        let mime = mime_from_file_name(&file_name);
        Self::new(file_name, mime, data)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// バイト長
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 分類結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyPayload {
    pub prediction: String,
    pub confidence: f64,
}

/// 検出された物体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub object: String,
    pub confidence: f64,
    /// [x, y, w, h]
    pub bbox: [f64; 4],
}

/// 物体検出結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectPayload {
    pub detections: Vec<Detection>,
}

/// セグメンテーション結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPayload {
    pub message: String,
    /// 生成されたマスクの参照（ファイル名など）
    pub mask: String,
}

/// モード別に検証済みのレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Prediction {
    Classify(ClassifyPayload),
    Detect(DetectPayload),
    Segment(SegmentPayload),
}

impl Prediction {
    /// このレスポンスを生んだモード
    pub fn mode(&self) -> Mode {
        match self {
            Prediction::Classify(_) => Mode::Classify,
            Prediction::Detect(_) => Mode::Detect,
            Prediction::Segment(_) => Mode::Segment,
        }
    }
}

/// 直近の送信結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "lowercase")]
pub enum RequestOutcome {
    /// 結果なし
    #[default]
    Pending,
    Success(Prediction),
    Failure(String),
}

impl RequestOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestOutcome::Pending)
    }
}
