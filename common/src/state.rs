//! 画面状態と状態遷移
//!
//! ファイル選択・モード選択・送信・レスポンス受信をイベントとして受け取り、
//! 純粋関数 [`reduce`] で次の状態を計算する。ネットワーク呼び出しなどの
//! 副作用は [`Effect`] として呼び出し側に返す。
//!
//! - 選択ファイルとプレビューは [`Selection`] として常に組で保持する
//! - 送信ごとに [`RequestToken`] を発行し、現在の実行中トークンと
//!   一致しないレスポンスは破棄する
//! - 実行中の再送信は拒否する

use crate::parser::parse_prediction;
use crate::types::{Mode, RequestOutcome, SelectedFile, FAILURE_MESSAGE};

/// 選択ファイルと、そこから派生したプレビュー
///
/// `P` はプレビューの実体（一時ファイル、Object URLなど）。
/// `Selection` が破棄されるとプレビューも `Drop` で解放される。
#[derive(Debug)]
pub struct Selection<P> {
    file: SelectedFile,
    preview: P,
}

impl<P> Selection<P> {
    pub fn new(file: SelectedFile, preview: P) -> Self {
        Self { file, preview }
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }
}

/// 送信ごとに発行される識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 発行すべきアップロード
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub token: RequestToken,
    /// 発行時点のモード
    pub mode: Mode,
    pub file: SelectedFile,
}

impl UploadRequest {
    /// multipartのフィールド名
    pub const FIELD_NAME: &'static str = "file";

    pub fn endpoint_path(&self) -> &'static str {
        self.mode.endpoint_path()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    token: RequestToken,
    mode: Mode,
}

/// 画面状態
#[derive(Debug)]
pub struct AppState<P> {
    selection: Option<Selection<P>>,
    mode: Mode,
    outcome: RequestOutcome,
    in_flight: Option<InFlight>,
    next_token: u64,
}

impl<P> Default for AppState<P> {
    fn default() -> Self {
        Self {
            selection: None,
            mode: Mode::default(),
            outcome: RequestOutcome::Pending,
            in_flight: None,
            next_token: 1,
        }
    }
}

impl<P> AppState<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&Selection<P>> {
        self.selection.as_ref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selection.as_ref().map(Selection::file)
    }

    pub fn preview(&self) -> Option<&P> {
        self.selection.as_ref().map(Selection::preview)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    /// リクエスト実行中か（ボタン表示用）
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_token(&self) -> Option<RequestToken> {
        self.in_flight.map(|f| f.token)
    }

    /// イベントを適用して副作用を返す
    pub fn dispatch(&mut self, event: Event<P>) -> Effect {
        let state = std::mem::take(self);
        let (next, effect) = reduce(state, event);
        *self = next;
        effect
    }
}

/// 状態遷移イベント
#[derive(Debug)]
pub enum Event<P> {
    /// ファイルが選択された（旧選択とプレビューは解放される）
    FileSelected(Selection<P>),
    /// モードが切り替えられた（同じモードでも結果はクリア）
    ModeChanged(Mode),
    /// 送信ボタンが押された
    SubmitRequested,
    /// レスポンスを受信した（Errは通信失敗の原因）
    ResponseReceived {
        token: RequestToken,
        body: Result<Vec<u8>, String>,
    },
    /// 画面の破棄
    Teardown,
}

/// 状態遷移の結果、呼び出し側が行うべきこと
#[derive(Debug)]
pub enum Effect {
    /// 何もしない
    None,
    /// アップロードを1回発行する
    Upload(UploadRequest),
    /// 実行中のため送信を拒否した
    SubmitRejected { in_flight: RequestToken },
    /// 成功結果を保存した
    OutcomeStored,
    /// 失敗を保存した（原因はログ用）
    Failed { cause: String },
    /// 古いレスポンスを破棄した
    StaleDiscarded { token: RequestToken },
}

/// 状態遷移
///
/// 状態を受け取り、次の状態と副作用を返す。
pub fn reduce<P>(mut state: AppState<P>, event: Event<P>) -> (AppState<P>, Effect) {
    let effect = match event {
        Event::FileSelected(selection) => {
            // 旧Selectionはここで破棄され、プレビューが解放される
            state.selection = Some(selection);
            state.outcome = RequestOutcome::Pending;
            state.in_flight = None;
            Effect::None
        }

        Event::ModeChanged(mode) => {
            state.mode = mode;
            state.outcome = RequestOutcome::Pending;
            state.in_flight = None;
            Effect::None
        }

        Event::SubmitRequested => match (&state.selection, state.in_flight) {
            (None, _) => Effect::None,
            (Some(_), Some(in_flight)) => Effect::SubmitRejected {
                in_flight: in_flight.token,
            },
            (Some(selection), None) => {
                let token = RequestToken(state.next_token);
                state.next_token += 1;
                state.in_flight = Some(InFlight {
                    token,
                    mode: state.mode,
                });
                Effect::Upload(UploadRequest {
                    token,
                    mode: state.mode,
                    file: selection.file.clone(),
                })
            }
        },

        Event::ResponseReceived { token, body } => match state.in_flight {
            Some(in_flight) if in_flight.token == token => {
                state.in_flight = None;
                let parsed = body.and_then(|bytes| {
                    parse_prediction(in_flight.mode, &bytes).map_err(|e| e.to_string())
                });
                match parsed {
                    Ok(prediction) => {
                        state.outcome = RequestOutcome::Success(prediction);
                        Effect::OutcomeStored
                    }
                    Err(cause) => {
                        state.outcome = RequestOutcome::Failure(FAILURE_MESSAGE.to_string());
                        Effect::Failed { cause }
                    }
                }
            }
            _ => Effect::StaleDiscarded { token },
        },

        Event::Teardown => {
            state.selection = None;
            state.outcome = RequestOutcome::Pending;
            state.in_flight = None;
            Effect::None
        }
    };

    (state, effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Prediction;
    use std::cell::Cell;
    use std::rc::Rc;

    /// 解放回数を数えるプレビュー
    struct CountingPreview {
        released: Rc<Cell<usize>>,
    }

    impl Drop for CountingPreview {
        fn drop(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    fn selection(name: &str, released: &Rc<Cell<usize>>) -> Selection<CountingPreview> {
        Selection::new(
            SelectedFile::from_file_name(name, vec![0u8; 4]),
            CountingPreview {
                released: Rc::clone(released),
            },
        )
    }

    fn upload_token(effect: Effect) -> RequestToken {
        match effect {
            Effect::Upload(request) => request.token,
            other => panic!("Expected Upload, got {:?}", other),
        }
    }

    fn classify_body() -> Result<Vec<u8>, String> {
        Ok(br#"{"prediction": "cat", "confidence": 0.97}"#.to_vec())
    }

    #[test]
    fn test_initial_state() {
        let state: AppState<()> = AppState::new();
        assert_eq!(state.mode(), Mode::Classify);
        assert!(state.selection().is_none());
        assert!(state.outcome().is_pending());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_file_selected_releases_previous_preview() {
        let released = Rc::new(Cell::new(0));
        let mut state = AppState::new();

        state.dispatch(Event::FileSelected(selection("a.jpg", &released)));
        assert_eq!(released.get(), 0);
        assert!(state.selected_file().is_some());
        assert!(state.preview().is_some());

        state.dispatch(Event::FileSelected(selection("b.mp4", &released)));
        assert_eq!(released.get(), 1);
        assert_eq!(state.selected_file().unwrap().file_name(), "b.mp4");

        state.dispatch(Event::Teardown);
        assert_eq!(released.get(), 2);
        assert!(state.selected_file().is_none());
        assert!(state.preview().is_none());
    }

    #[test]
    fn test_file_selected_clears_outcome() {
        let released = Rc::new(Cell::new(0));
        let mut state = AppState::new();
        state.dispatch(Event::FileSelected(selection("a.jpg", &released)));
        let token = upload_token(state.dispatch(Event::SubmitRequested));
        state.dispatch(Event::ResponseReceived { token, body: classify_body() });
        assert!(!state.outcome().is_pending());

        state.dispatch(Event::FileSelected(selection("b.jpg", &released)));
        assert!(state.outcome().is_pending());
    }

    #[test]
    fn test_mode_change_clears_outcome_even_for_same_mode() {
        let released = Rc::new(Cell::new(0));
        let mut state = AppState::new();
        state.dispatch(Event::FileSelected(selection("a.jpg", &released)));
        let token = upload_token(state.dispatch(Event::SubmitRequested));
        state.dispatch(Event::ResponseReceived { token, body: classify_body() });
        assert!(matches!(state.outcome(), RequestOutcome::Success(_)));

        state.dispatch(Event::ModeChanged(Mode::Classify));
        assert_eq!(state.mode(), Mode::Classify);
        assert!(state.outcome().is_pending());
    }

    #[test]
    fn test_submit_without_file_is_noop() {
        let mut state: AppState<()> = AppState::new();
        state.dispatch(Event::ModeChanged(Mode::Segment));

        let effect = state.dispatch(Event::SubmitRequested);
        assert!(matches!(effect, Effect::None));
        assert!(!state.is_loading());
        assert!(state.outcome().is_pending());
        assert_eq!(state.mode(), Mode::Segment);
    }

    #[test]
    fn test_submit_builds_request_for_current_mode() {
        let released = Rc::new(Cell::new(0));
        let mut state = AppState::new();
        state.dispatch(Event::FileSelected(selection("clip.mp4", &released)));
        state.dispatch(Event::ModeChanged(Mode::Detect));

        match state.dispatch(Event::SubmitRequested) {
            Effect::Upload(request) => {
                assert_eq!(request.mode, Mode::Detect);
                assert_eq!(request.endpoint_path(), "predict/detect");
                assert_eq!(request.file.file_name(), "clip.mp4");
            }
            other => panic!("Expected Upload, got {:?}", other),
        }
        assert!(state.is_loading());
    }

    #[test]
    fn test_submit_rejected_while_in_flight() {
        let released = Rc::new(Cell::new(0));
        let mut state = AppState::new();
        state.dispatch(Event::FileSelected(selection("a.jpg", &released)));
        let token = upload_token(state.dispatch(Event::SubmitRequested));

        let effect = state.dispatch(Event::SubmitRequested);
        assert!(matches!(effect, Effect::SubmitRejected { in_flight } if in_flight == token));
        assert_eq!(state.in_flight_token(), Some(token));
    }

    #[test]
    fn test_loading_cleared_on_success_and_failure() {
        let released = Rc::new(Cell::new(0));
        let mut state = AppState::new();
        state.dispatch(Event::FileSelected(selection("a.jpg", &released)));

        let token = upload_token(state.dispatch(Event::SubmitRequested));
        let effect = state.dispatch(Event::ResponseReceived { token, body: classify_body() });
        assert!(matches!(effect, Effect::OutcomeStored));
        assert!(!state.is_loading());

        let token = upload_token(state.dispatch(Event::SubmitRequested));
        let effect = state.dispatch(Event::ResponseReceived {
            token,
            body: Err("connection refused".to_string()),
        });
        assert!(matches!(effect, Effect::Failed { ref cause } if cause == "connection refused"));
        assert!(!state.is_loading());
        assert_eq!(state.outcome(), &RequestOutcome::Failure(FAILURE_MESSAGE.to_string()));
    }

    #[test]
    fn test_malformed_payload_becomes_failure() {
        let released = Rc::new(Cell::new(0));
        let mut state = AppState::new();
        state.dispatch(Event::FileSelected(selection("a.jpg", &released)));
        state.dispatch(Event::ModeChanged(Mode::Detect));

        let token = upload_token(state.dispatch(Event::SubmitRequested));
        let effect = state.dispatch(Event::ResponseReceived { token, body: classify_body() });
        assert!(matches!(effect, Effect::Failed { .. }));
        assert_eq!(state.outcome(), &RequestOutcome::Failure(FAILURE_MESSAGE.to_string()));
    }

    #[test]
    fn test_stale_response_after_mode_change_is_discarded() {
        let released = Rc::new(Cell::new(0));
        let mut state = AppState::new();
        state.dispatch(Event::FileSelected(selection("a.jpg", &released)));
        let token = upload_token(state.dispatch(Event::SubmitRequested));

        state.dispatch(Event::ModeChanged(Mode::Segment));
        assert!(!state.is_loading());

        let effect = state.dispatch(Event::ResponseReceived { token, body: classify_body() });
        assert!(matches!(effect, Effect::StaleDiscarded { .. }));
        assert!(state.outcome().is_pending());
    }

    #[test]
    fn test_race_keeps_only_latest_request() {
        let released = Rc::new(Cell::new(0));
        let mut state = AppState::new();

        state.dispatch(Event::FileSelected(selection("a.jpg", &released)));
        let token_a = upload_token(state.dispatch(Event::SubmitRequested));

        state.dispatch(Event::FileSelected(selection("b.jpg", &released)));
        let token_b = upload_token(state.dispatch(Event::SubmitRequested));
        assert_ne!(token_a, token_b);

        // Bが先に、Aが後に到着
        let body_b = Ok(br#"{"prediction": "dog", "confidence": 0.6}"#.to_vec());
        state.dispatch(Event::ResponseReceived { token: token_b, body: body_b });
        let effect = state.dispatch(Event::ResponseReceived { token: token_a, body: classify_body() });
        assert!(matches!(effect, Effect::StaleDiscarded { token } if token == token_a));

        match state.outcome() {
            RequestOutcome::Success(Prediction::Classify(payload)) => {
                assert_eq!(payload.prediction, "dog");
            }
            other => panic!("Expected dog classification, got {:?}", other),
        }
    }

    #[test]
    fn test_reduce_is_pure_by_value() {
        let state: AppState<()> = AppState::new();
        let (state, effect) = reduce(state, Event::ModeChanged(Mode::Detect));
        assert!(matches!(effect, Effect::None));
        assert_eq!(state.mode(), Mode::Detect);
    }
}
