//! 送信制御テスト
//!
//! モックバックエンドで、選択→送信→表示の流れを検証

use media_ai_common::{
    Effect, Mode, RequestOutcome, ResultView, SelectedFile, Selection, UploadRequest,
    FAILURE_MESSAGE,
};
use media_ai_rust::backend::InferenceBackend;
use media_ai_rust::error::{MediaAiError, Result};
use media_ai_rust::session::Session;
use std::sync::{Arc, Mutex};

/// 固定レスポンスを返し、受け取ったリクエストを記録するバックエンド
#[derive(Clone)]
struct MockBackend {
    response: std::result::Result<&'static str, u16>,
    calls: Arc<Mutex<Vec<(Mode, String)>>>,
}

impl MockBackend {
    fn ok(body: &'static str) -> Self {
        Self {
            response: Ok(body),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn status(status: u16) -> Self {
        Self {
            response: Err(status),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<(Mode, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl InferenceBackend for MockBackend {
    async fn predict(&self, request: &UploadRequest) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push((request.mode, request.file.file_name().to_string()));
        match self.response {
            Ok(body) => Ok(body.as_bytes().to_vec()),
            Err(status) => Err(MediaAiError::BackendStatus { status }),
        }
    }
}

fn selection(name: &str) -> Selection<()> {
    Selection::new(SelectedFile::from_file_name(name, vec![0u8; 16]), ())
}

/// シナリオ1: 画像を分類
#[tokio::test]
async fn test_classify_image() {
    let backend = MockBackend::ok(r#"{"prediction": "cat", "confidence": 0.97}"#);
    let mut session: Session<_, ()> = Session::new(backend.clone());

    session.select_file(selection("cat.jpg"));
    let effect = session.submit().await;

    assert!(matches!(effect, Effect::OutcomeStored));
    assert!(!session.state().is_loading());
    assert_eq!(backend.calls(), vec![(Mode::Classify, "cat.jpg".to_string())]);

    let view = session.view().expect("表示なし");
    assert_eq!(view.lines(), vec!["Prediction: cat", "Confidence: 0.97"]);
}

/// シナリオ2: 動画で物体検出
#[tokio::test]
async fn test_detect_video() {
    let backend = MockBackend::ok(
        r#"{"detections": [{"object": "person", "confidence": 0.81, "bbox": [10, 20, 30, 40]}]}"#,
    );
    let mut session: Session<_, ()> = Session::new(backend.clone());

    session.select_file(selection("clip.mp4"));
    session.set_mode(Mode::Detect);
    session.submit().await;

    assert_eq!(backend.calls(), vec![(Mode::Detect, "clip.mp4".to_string())]);

    let view = session.view().expect("表示なし");
    let ResultView::Detection { rows } = &view else {
        panic!("Expected Detection view, got {:?}", view);
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(
        view.lines(),
        vec!["Object: person", "Confidence: 0.81", "Bounding Box: 10, 20, 30, 40"]
    );
}

/// シナリオ3: セグメンテーション
#[tokio::test]
async fn test_segment() {
    let backend = MockBackend::ok(r#"{"message": "done", "mask": "mask_001.png"}"#);
    let mut session: Session<_, ()> = Session::new(backend);

    session.set_mode(Mode::Segment);
    session.select_file(selection("street.png"));
    session.submit().await;

    let view = session.view().expect("表示なし");
    assert_eq!(view.lines(), vec!["done", "Mask File: mask_001.png"]);
}

/// バックエンドの非2xxは汎用メッセージの失敗になる
#[tokio::test]
async fn test_backend_error_status() {
    let mut session: Session<_, ()> = Session::new(MockBackend::status(500));

    session.select_file(selection("cat.jpg"));
    let effect = session.submit().await;

    match effect {
        Effect::Failed { cause } => assert!(cause.contains("500")),
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert!(!session.state().is_loading());
    assert_eq!(
        session.state().outcome(),
        &RequestOutcome::Failure(FAILURE_MESSAGE.to_string())
    );

    let view = session.view().expect("表示なし");
    assert!(view.is_error());
}

/// 形が合わないレスポンスは失敗として表示
#[tokio::test]
async fn test_mismatched_payload_is_failure() {
    let backend = MockBackend::ok(r#"{"prediction": "cat", "confidence": 0.97}"#);
    let mut session: Session<_, ()> = Session::new(backend);

    session.set_mode(Mode::Detect);
    session.select_file(selection("cat.jpg"));
    let effect = session.submit().await;

    assert!(matches!(effect, Effect::Failed { .. }));
    assert!(session.view().expect("表示なし").is_error());
}

/// ファイル未選択の送信は何もしない
#[tokio::test]
async fn test_submit_without_file() {
    let backend = MockBackend::ok("{}");
    let mut session: Session<_, ()> = Session::new(backend.clone());

    let effect = session.submit().await;

    assert!(matches!(effect, Effect::None));
    assert!(backend.calls().is_empty());
    assert!(session.state().outcome().is_pending());
    assert!(session.view().is_none());
}

/// 結果はモード切替・ファイル選択でクリアされる
#[tokio::test]
async fn test_result_cleared_by_mode_and_file() {
    let backend = MockBackend::ok(r#"{"prediction": "cat", "confidence": 0.97}"#);
    let mut session: Session<_, ()> = Session::new(backend);

    session.select_file(selection("cat.jpg"));
    session.submit().await;
    assert!(session.view().is_some());

    session.set_mode(Mode::Classify);
    assert!(session.view().is_none());

    session.submit().await;
    assert!(session.view().is_some());

    session.select_file(selection("dog.jpg"));
    assert!(session.view().is_none());
}

/// シナリオ5: 送信中に別ファイルを選択して再送信
#[tokio::test]
async fn test_superseded_request_is_discarded() {
    let backend = MockBackend::ok(r#"{"prediction": "cat", "confidence": 0.97}"#);
    let mut session: Session<_, ()> = Session::new(backend.clone());

    session.select_file(selection("a.jpg"));
    let request_a = session.begin_submit().expect("送信されない");

    // 実行中の再送信は拒否
    assert!(session.begin_submit().is_none());

    session.select_file(selection("b.jpg"));
    assert!(!session.state().is_loading());
    let request_b = session.begin_submit().expect("送信されない");

    let (result_a, result_b) = tokio::join!(
        session.backend().predict(&request_a),
        session.backend().predict(&request_b)
    );

    // Bが先、Aが後に到着
    let effect_b = session.complete(request_b.token, result_b);
    let effect_a = session.complete(request_a.token, result_a);

    assert!(matches!(effect_b, Effect::OutcomeStored));
    assert!(matches!(effect_a, Effect::StaleDiscarded { .. }));
    assert_eq!(backend.calls().len(), 2);
    assert_eq!(session.state().selected_file().unwrap().file_name(), "b.jpg");
    assert!(matches!(session.state().outcome(), RequestOutcome::Success(_)));
}

/// 破棄で選択が解放される
#[tokio::test]
async fn test_teardown_releases_selection() {
    let mut session: Session<_, ()> = Session::new(MockBackend::ok("{}"));

    session.select_file(selection("a.jpg"));
    assert!(session.state().preview().is_some());

    session.teardown();
    assert!(session.state().selected_file().is_none());
    assert!(session.state().preview().is_none());
}
