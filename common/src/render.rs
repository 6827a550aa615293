//! 結果表示
//!
//! (モード, 送信結果) からモード別の表示構造を作る純粋関数と、
//! 画面に出す固定文言。

use crate::types::{Mode, Prediction, RequestOutcome};
use std::fmt;

/// 送信ボタンのラベル
pub fn submit_label(loading: bool) -> &'static str {
    if loading {
        "Processing..."
    } else {
        "Process"
    }
}

/// アップロードエリアの案内文
pub fn drop_hint(drag_active: bool) -> &'static str {
    if drag_active {
        "Drop the file here ..."
    } else {
        "Drag & drop an image or video here, or click to select file"
    }
}

/// 検出結果の1行
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRow {
    pub object: String,
    pub confidence: f64,
    /// "x, y, w, h"
    pub bbox: String,
}

/// モード別の表示構造
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Error { message: String },
    Classification { prediction: String, confidence: f64 },
    Detection { rows: Vec<DetectionRow> },
    Segmentation { message: String, mask: String },
}

impl ResultView {
    /// 見出し（エラー表示にはなし）
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            ResultView::Error { .. } => None,
            ResultView::Classification { .. } => Some("Classification Result"),
            ResultView::Detection { .. } => Some("Detection Results"),
            ResultView::Segmentation { .. } => Some("Segmentation Result"),
        }
    }

    /// 本文の行
    pub fn lines(&self) -> Vec<String> {
        match self {
            ResultView::Error { message } => vec![message.clone()],
            ResultView::Classification { prediction, confidence } => vec![
                format!("Prediction: {}", prediction),
                format!("Confidence: {}", confidence),
            ],
            ResultView::Detection { rows } => rows
                .iter()
                .flat_map(|row| {
                    [
                        format!("Object: {}", row.object),
                        format!("Confidence: {}", row.confidence),
                        format!("Bounding Box: {}", row.bbox),
                    ]
                })
                .collect(),
            ResultView::Segmentation { message, mask } => {
                vec![message.clone(), format!("Mask File: {}", mask)]
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultView::Error { .. })
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = self.heading().into_iter().map(str::to_string).collect::<Vec<_>>();
        out.extend(self.lines());
        write!(f, "{}", out.join("\n"))
    }
}

/// バウンディングボックスを元の順序で連結
pub fn format_bbox(bbox: &[f64; 4]) -> String {
    bbox.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 表示構造を作る
///
/// - 失敗: モードに関係なくエラー表示
/// - 結果なし: 表示なし
/// - 成功: 現在のモードに対応する表示（モードが一致しなければ表示なし）
pub fn render(mode: Mode, outcome: &RequestOutcome) -> Option<ResultView> {
    match outcome {
        RequestOutcome::Pending => None,
        RequestOutcome::Failure(message) => Some(ResultView::Error {
            message: message.clone(),
        }),
        RequestOutcome::Success(prediction) => match (mode, prediction) {
            (Mode::Classify, Prediction::Classify(p)) => Some(ResultView::Classification {
                prediction: p.prediction.clone(),
                confidence: p.confidence,
            }),
            (Mode::Detect, Prediction::Detect(p)) => Some(ResultView::Detection {
                rows: p
                    .detections
                    .iter()
                    .map(|d| DetectionRow {
                        object: d.object.clone(),
                        confidence: d.confidence,
                        bbox: format_bbox(&d.bbox),
                    })
                    .collect(),
            }),
            (Mode::Segment, Prediction::Segment(p)) => Some(ResultView::Segmentation {
                message: p.message.clone(),
                mask: p.mask.clone(),
            }),
            _ => None,
        },
    }
}
