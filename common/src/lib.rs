//! Media AI Common Library
//!
//! CLIとWeb(WASM)で共有される型・状態遷移・結果表示

pub mod types;
pub mod error;
pub mod parser;
pub mod state;
pub mod render;

pub use types::{
    ClassifyPayload, DetectPayload, Detection, MediaKind, Mode, Prediction, RequestOutcome,
    SegmentPayload, SelectedFile, FAILURE_MESSAGE,
};
pub use error::{Error, Result};
pub use parser::parse_prediction;
pub use state::{reduce, AppState, Effect, Event, RequestToken, Selection, UploadRequest};
pub use render::{drop_hint, format_bbox, render, submit_label, DetectionRow, ResultView};
