//! 推論API連携
//!
//! 選択ファイルを `file` フィールド1つのFormDataでPOSTし、
//! レスポンス本文をそのまま返す。形の検証は状態遷移側で行う。

use media_ai_common::{Mode, UploadRequest};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

pub const API_BASE_URL: &str = "http://localhost:8000";

/// モードに対応するエンドポイントURL
pub fn endpoint_url(mode: Mode) -> String {
    format!("{}/{}", API_BASE_URL, mode.endpoint_path())
}

/// アップロードを1回発行（Errは原因、表示には使わない）
pub async fn predict(request: &UploadRequest) -> Result<Vec<u8>, String> {
    send(request).await.map_err(|e| {
        e.as_string()
            .unwrap_or_else(|| format!("{:?}", e))
    })
}

async fn send(request: &UploadRequest) -> Result<Vec<u8>, JsValue> {
    let file = &request.file;

    let bytes = js_sys::Uint8Array::from(file.data());
    let parts = js_sys::Array::of1(&bytes);
    let blob_opts = BlobPropertyBag::new();
    blob_opts.set_type(file.mime_type());
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &blob_opts)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename(UploadRequest::FIELD_NAME, &blob, file.file_name())?;

    // Content-Typeはboundary付きでブラウザが設定する
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form);

    let req = Request::new_with_str_and_init(&endpoint_url(request.mode), &opts)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window がありません"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&req)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("API error: {}", resp.status())));
    }

    let text = JsFuture::from(resp.text()?).await?;
    Ok(text.as_string().unwrap_or_default().into_bytes())
}
