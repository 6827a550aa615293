//! APIレスポンスパーサー
//!
//! バックエンドのJSONレスポンスを、リクエスト発行時のモードに
//! 対応する型として検証する。形が合わなければエラーを返し、
//! 状態には失敗として記録される。

use crate::error::{Error, Result};
use crate::types::{ClassifyPayload, DetectPayload, Mode, Prediction, SegmentPayload};

/// レスポンス本文をモード別のPredictionにパース
///
/// # Arguments
/// * `mode` - リクエスト発行時のモード
/// * `body` - レスポンス本文（JSON）
///
/// # Returns
/// * `Ok(Prediction)` - パース成功
/// * `Err` - JSONが不正、またはモードの形と一致しない場合
///
/// # Examples
/// ```
/// use media_ai_common::{parse_prediction, Mode, Prediction};
///
/// let body = br#"{"prediction": "cat", "confidence": 0.97}"#;
/// let prediction = parse_prediction(Mode::Classify, body).unwrap();
/// assert!(matches!(prediction, Prediction::Classify(_)));
/// ```
pub fn parse_prediction(mode: Mode, body: &[u8]) -> Result<Prediction> {
    let context = |e: serde_json::Error| Error::Parse(format!("{} JSONパースエラー: {}", mode, e));

    let prediction = match mode {
        Mode::Classify => {
            Prediction::Classify(serde_json::from_slice::<ClassifyPayload>(body).map_err(context)?)
        }
        Mode::Detect => {
            Prediction::Detect(serde_json::from_slice::<DetectPayload>(body).map_err(context)?)
        }
        Mode::Segment => {
            Prediction::Segment(serde_json::from_slice::<SegmentPayload>(body).map_err(context)?)
        }
    };

    Ok(prediction)
}
