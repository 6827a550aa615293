//! プレビュー用Object URL
//!
//! `URL.createObjectURL` で作ったURLを保持し、破棄時に `revokeObjectURL` する。
//! 選択ファイルと組で状態に入るため、再選択・画面破棄で必ず解放される。

use wasm_bindgen::JsValue;
use web_sys::{Blob, Url};

#[derive(Debug)]
pub struct ObjectUrl {
    url: String,
}

impl ObjectUrl {
    pub fn create(blob: &Blob) -> Result<Self, JsValue> {
        let url = Url::create_object_url_with_blob(blob)?;
        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.url);
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn sample_blob() -> Blob {
        let bytes = js_sys::Uint8Array::from(&b"preview bytes"[..]);
        let parts = js_sys::Array::of1(&bytes);
        Blob::new_with_u8_array_sequence(&parts).expect("Blob作成失敗")
    }

    #[wasm_bindgen_test]
    async fn wasm_object_url_revoked_on_drop() {
        let window = web_sys::window().expect("window がありません");
        let blob = sample_blob();

        let url = {
            let object_url = ObjectUrl::create(&blob).expect("URL作成失敗");
            assert!(object_url.as_str().starts_with("blob:"));

            let fetched = JsFuture::from(window.fetch_with_str(object_url.as_str())).await;
            assert!(fetched.is_ok(), "有効なURLが取得できない");

            object_url.as_str().to_string()
        };

        // 破棄後のURLは取得できない
        let fetched = JsFuture::from(window.fetch_with_str(&url)).await;
        assert!(fetched.is_err(), "破棄後もURLが有効: {}", url);
    }
}
