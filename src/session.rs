//! 送信制御
//!
//! 画面状態 [`AppState`] とバックエンドを束ね、ファイル選択・モード切替・
//! 送信を行う。送信は状態遷移の [`Effect::Upload`] に従って1回だけ
//! リクエストを発行し、結果を `ResponseReceived` として戻す。
//! 失敗の原因は表示せず（汎用メッセージのみ）、ログに残す。

use crate::backend::InferenceBackend;
use crate::error::Result;
use crate::media::Preview;
use media_ai_common::{
    render, AppState, Effect, Event, Mode, RequestToken, ResultView, Selection, UploadRequest,
};

pub struct Session<B, P = Preview> {
    state: AppState<P>,
    backend: B,
}

impl<B: InferenceBackend, P> Session<B, P> {
    pub fn new(backend: B) -> Self {
        Self {
            state: AppState::new(),
            backend,
        }
    }

    pub fn state(&self) -> &AppState<P> {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// ファイルを選択（旧プレビューは解放、結果はクリア）
    pub fn select_file(&mut self, selection: Selection<P>) {
        if let Some(token) = self.state.in_flight_token() {
            tracing::debug!(token = token.value(), "ファイル変更により実行中のリクエストを破棄");
        }
        self.state.dispatch(Event::FileSelected(selection));
    }

    /// モードを切り替え（同じモードでも結果はクリア）
    pub fn set_mode(&mut self, mode: Mode) {
        if let Some(token) = self.state.in_flight_token() {
            tracing::debug!(token = token.value(), "モード変更により実行中のリクエストを破棄");
        }
        self.state.dispatch(Event::ModeChanged(mode));
    }

    /// 送信を開始（ファイル未選択・実行中なら None）
    pub fn begin_submit(&mut self) -> Option<UploadRequest> {
        match self.state.dispatch(Event::SubmitRequested) {
            Effect::Upload(request) => Some(request),
            Effect::SubmitRejected { in_flight } => {
                tracing::warn!(in_flight = in_flight.value(), "実行中のため送信を拒否");
                None
            }
            _ => None,
        }
    }

    /// レスポンスを状態に反映
    pub fn complete(&mut self, token: RequestToken, result: Result<Vec<u8>>) -> Effect {
        let body = result.map_err(|e| e.to_string());
        let effect = self.state.dispatch(Event::ResponseReceived { token, body });

        match &effect {
            Effect::OutcomeStored => {
                tracing::info!(token = token.value(), "結果を保存");
            }
            Effect::Failed { cause } => {
                tracing::error!(token = token.value(), cause = %cause, "ファイル処理に失敗");
            }
            Effect::StaleDiscarded { token } => {
                tracing::warn!(token = token.value(), "古いレスポンスを破棄");
            }
            _ => {}
        }

        effect
    }

    /// 送信して結果を待つ
    ///
    /// ファイル未選択、または実行中なら何もせず `Effect::None` を返す。
    pub async fn submit(&mut self) -> Effect {
        let Some(request) = self.begin_submit() else {
            return Effect::None;
        };

        let result = self.backend.predict(&request).await;
        self.complete(request.token, result)
    }

    /// 現在のモードと結果から表示構造を作る
    pub fn view(&self) -> Option<ResultView> {
        render(self.state.mode(), self.state.outcome())
    }

    /// 選択とプレビューを解放
    pub fn teardown(&mut self) {
        self.state.dispatch(Event::Teardown);
    }
}
