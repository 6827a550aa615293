//! 結果表示コンポーネント

use leptos::prelude::*;
use media_ai_common::ResultView;

#[component]
pub fn ResultPanel(result: Signal<Option<ResultView>>) -> impl IntoView {
    move || {
        result.get().map(|result| {
            let class = if result.is_error() { "result error" } else { "result" };
            let heading = result.heading().map(|h| view! { <h3>{h}</h3> });
            let lines = result
                .lines()
                .into_iter()
                .map(|line| view! { <p>{line}</p> })
                .collect_view();

            view! {
                <div class=class>
                    {heading}
                    {lines}
                </div>
            }
        })
    }
}
