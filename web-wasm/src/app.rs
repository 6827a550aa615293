//! メインアプリケーションコンポーネント
//!
//! 状態は共通ライブラリの `AppState` を1つのシグナルに持ち、
//! すべての変更を `dispatch` 経由で行う。

use leptos::prelude::*;
use leptos::task::spawn_local;
use media_ai_common::{
    render, submit_label, AppState, Effect, Event, Mode, Selection,
};
use crate::api::inference;
use crate::components::{
    header::Header,
    media_preview::MediaPreview,
    mode_tabs::ModeTabs,
    result_panel::ResultPanel,
    upload_area::UploadArea,
};
use crate::preview::ObjectUrl;

/// 画面の状態
pub type WebState = AppState<ObjectUrl>;

/// イベントを適用し、副作用を実行する
fn dispatch(state: RwSignal<WebState>, event: Event<ObjectUrl>) {
    let Some(effect) = state.try_update(|s| s.dispatch(event)) else {
        return;
    };

    match effect {
        Effect::Upload(request) => {
            spawn_local(async move {
                let body = inference::predict(&request).await;
                dispatch(
                    state,
                    Event::ResponseReceived {
                        token: request.token,
                        body,
                    },
                );
            });
        }
        Effect::Failed { cause } => {
            web_sys::console::error_1(&format!("Error processing file: {}", cause).into());
        }
        Effect::SubmitRejected { in_flight } => {
            web_sys::console::warn_1(
                &format!("request #{} in flight, submit ignored", in_flight.value()).into(),
            );
        }
        Effect::None | Effect::OutcomeStored | Effect::StaleDiscarded { .. } => {}
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let state = RwSignal::new(WebState::new());

    // 画面破棄時にプレビューURLを解放し、実行中の応答を無効化
    on_cleanup(move || dispatch(state, Event::Teardown));

    let mode = Memo::new(move |_| state.with(|s| s.mode()));
    let is_loading = Memo::new(move |_| state.with(|s| s.is_loading()));
    let has_file = Memo::new(move |_| state.with(|s| s.selected_file().is_some()));

    let on_file_selected = move |selection: Selection<ObjectUrl>| {
        dispatch(state, Event::FileSelected(selection));
    };

    let on_mode_changed = move |next: Mode| {
        dispatch(state, Event::ModeChanged(next));
    };

    let on_submit = move |_| {
        dispatch(state, Event::SubmitRequested);
    };

    let preview = move || {
        state.with(|s| {
            s.selection().map(|sel| {
                (sel.preview().as_str().to_string(), sel.file().kind())
            })
        })
    };

    let result = move || state.with(|s| render(s.mode(), s.outcome()));

    view! {
        <div class="container">
            <Header />

            <ModeTabs mode=mode on_change=on_mode_changed />

            <UploadArea on_file_selected=on_file_selected />

            <MediaPreview preview=Signal::derive(preview) />

            <button
                class="btn btn-primary"
                disabled=move || !has_file.get() || is_loading.get()
                on:click=on_submit
            >
                {move || submit_label(is_loading.get())}
            </button>

            <ResultPanel result=Signal::derive(result) />
        </div>
    }
}
