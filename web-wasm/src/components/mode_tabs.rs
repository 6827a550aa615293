//! モード切替タブ

use leptos::prelude::*;
use media_ai_common::Mode;

#[component]
pub fn ModeTabs<F>(
    mode: Memo<Mode>,
    on_change: F,
) -> impl IntoView
where
    F: Fn(Mode) + 'static + Clone + Send + Sync,
{
    let tabs = Mode::ALL
        .iter()
        .copied()
        .map(|tab| {
            let on_change = on_change.clone();
            view! {
                <button
                    class=move || if mode.get() == tab { "tab active" } else { "tab" }
                    on:click=move |_| on_change(tab)
                >
                    {tab.label()}
                </button>
            }
        })
        .collect_view();

    view! {
        <nav class="tabs">
            {tabs}
        </nav>
    }
}
