//! アップロードエリアコンポーネント
//!
//! ドラッグ&ドロップまたはクリックで1ファイルを選ぶ。
//! 複数渡された場合は先頭のみ採用する。

use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use media_ai_common::{drop_hint, SelectedFile, Selection};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, File, FileList};
use crate::preview::ObjectUrl;

#[component]
pub fn UploadArea<F>(on_file_selected: F) -> impl IntoView
where
    F: Fn(Selection<ObjectUrl>) + 'static + Clone + Send + Sync,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref = NodeRef::<Input>::new();

    let latest = StoredValue::new(LatestSelection::default());

    let handle_files = move |files: FileList| {
        let Some(file) = files.get(0) else {
            return;
        };
        let Some(ticket) = latest.try_update_value(|l| l.begin()) else {
            return;
        };
        let on_file_selected = on_file_selected.clone();
        spawn_local(async move {
            let result = read_file(&file).await;
            // 後から選ばれたファイルがあれば、この読み込み結果は捨てる
            if !latest.with_value(|l| l.is_latest(ticket)) {
                return;
            }
            match result {
                Ok(selection) => on_file_selected(selection),
                Err(e) => web_sys::console::error_2(&"ファイル読み込みエラー:".into(), &e),
            }
        });
    };

    let on_drop = {
        let handle_files = handle_files.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if let Some(dt) = ev.data_transfer() {
                if let Some(files) = dt.files() {
                    handle_files(files);
                }
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    // ファイル選択ダイアログを開く
    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = move |_| {
        if let Some(input) = input_ref.get() {
            if let Some(files) = input.files() {
                handle_files(files);
            }
            // 同じファイルの再選択でもchangeを発火させる
            input.set_value("");
        }
    };

    view! {
        <div
            class=move || {
                if is_dragover.get() {
                    "upload-area dragover"
                } else {
                    "upload-area"
                }
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <input
                node_ref=input_ref
                type="file"
                accept="image/*,video/*"
                style="display: none"
                on:click=|ev| ev.stop_propagation()
                on:change=on_change
            />
            <p>{move || drop_hint(is_dragover.get())}</p>
        </div>
    }
}

/// 選択操作の順序
///
/// 読み込みは非同期で完了順が前後するため、最後に選ばれたファイルだけを採用する。
#[derive(Debug, Default)]
pub(crate) struct LatestSelection {
    current: u64,
}

impl LatestSelection {
    /// 新しい選択を開始し、その番号を返す
    pub(crate) fn begin(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub(crate) fn is_latest(&self, ticket: u64) -> bool {
        self.current == ticket
    }
}

/// ファイル内容を読み込み、プレビューURLと組にする
async fn read_file(file: &File) -> Result<Selection<ObjectUrl>, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let file_name = file.name();
    let selected = match file.type_() {
        mime if mime.is_empty() => SelectedFile::from_file_name(file_name, bytes),
        mime => SelectedFile::new(file_name, mime, bytes),
    };

    let preview = ObjectUrl::create(file)?;
    Ok(Selection::new(selected, preview))
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use media_ai_common::MediaKind;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn sample_file(name: &str, bytes: &[u8]) -> File {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        File::new_with_u8_array_sequence(&parts, name).expect("File作成失敗")
    }

    #[wasm_bindgen_test]
    async fn wasm_read_file_uses_name_when_type_is_empty() {
        let file = sample_file("cat.png", b"png bytes");
        let selection = read_file(&file).await.expect("読み込み失敗");

        assert_eq!(selection.file().file_name(), "cat.png");
        assert_eq!(selection.file().mime_type(), "image/png");
        assert_eq!(selection.file().kind(), MediaKind::Image);
        assert_eq!(selection.file().data(), b"png bytes");
        assert!(selection.preview().as_str().starts_with("blob:"));
    }

    #[wasm_bindgen_test]
    async fn wasm_earlier_read_is_dropped_after_newer_selection() {
        let mut latest = LatestSelection::default();
        let first = latest.begin();
        let second = latest.begin();

        let newer = read_file(&sample_file("clip.mp4", b"small")).await.expect("読み込み失敗");
        assert!(latest.is_latest(second));

        let older = read_file(&sample_file("big.png", &[0u8; 4096])).await.expect("読み込み失敗");
        assert!(!latest.is_latest(first));
        drop(older);

        assert_eq!(newer.file().file_name(), "clip.mp4");
        assert_eq!(newer.file().kind(), MediaKind::Video);
    }
}
