//! 選択ファイルのプレビュー

use leptos::prelude::*;
use media_ai_common::MediaKind;

#[component]
pub fn MediaPreview(preview: Signal<Option<(String, MediaKind)>>) -> impl IntoView {
    move || {
        preview.get().map(|(url, kind)| match kind {
            MediaKind::Image => view! {
                <div class="preview">
                    <img src=url alt="Preview" />
                </div>
            }
            .into_any(),
            MediaKind::Video => view! {
                <div class="preview">
                    <video src=url controls=true />
                </div>
            }
            .into_any(),
        })
    }
}
