//! ファイル選択とプレビュー
//!
//! 選択されたファイルを読み込み、表示用のプレビューを派生させる。
//! 画像はサムネイルを一時ファイルに書き出し、`Preview` の破棄時に削除される。
//! 動画（および解釈できない画像）は元ファイルを参照するだけで、解放すべき資源はない。

use crate::error::{MediaAiError, Result};
use image::{DynamicImage, ImageFormat};
use media_ai_common::{MediaKind, SelectedFile, Selection};
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// 選択ファイルから派生したプレビュー
#[derive(Debug)]
pub enum Preview {
    /// 画像のサムネイル（Dropで一時ファイルを削除）
    Thumbnail {
        path: TempPath,
        width: u32,
        height: u32,
    },
    /// 元ファイルを参照
    Source { path: PathBuf, kind: MediaKind },
}

impl Preview {
    pub fn path(&self) -> &Path {
        match self {
            Preview::Thumbnail { path, .. } => &**path,
            Preview::Source { path, .. } => path.as_path(),
        }
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preview::Thumbnail { path, width, height } => {
                write!(f, "画像 {}x{} ({})", width, height, path.display())
            }
            Preview::Source { path, kind } => {
                let label = match kind {
                    MediaKind::Image => "画像",
                    MediaKind::Video => "動画",
                };
                write!(f, "{} ({})", label, path.display())
            }
        }
    }
}

/// ファイルを読み込む（種別・サイズの検証はしない）
pub fn load_file(path: &Path) -> Result<SelectedFile> {
    if !path.is_file() {
        return Err(MediaAiError::FileNotFound(path.display().to_string()));
    }

    let data = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(SelectedFile::from_file_name(file_name, data))
}

/// プレビューを生成
///
/// 失敗しても選択は有効（元ファイル参照にフォールバック）。
pub fn create_preview(source: &Path, file: &SelectedFile, max_size: u32) -> Preview {
    create_preview_in(source, file, max_size, &std::env::temp_dir())
}

/// サムネイルの書き出し先を指定してプレビューを生成
pub fn create_preview_in(
    source: &Path,
    file: &SelectedFile,
    max_size: u32,
    temp_dir: &Path,
) -> Preview {
    let fallback = |kind| Preview::Source {
        path: source.to_path_buf(),
        kind,
    };

    if file.kind() == MediaKind::Video {
        return fallback(MediaKind::Video);
    }

    let image = match image::load_from_memory(file.data()) {
        Ok(image) => image,
        Err(e) => {
            // 解釈できなくても選択は有効（判定はバックエンドに任せる）
            tracing::debug!(file = file.file_name(), error = %e, "サムネイル生成をスキップ");
            return fallback(MediaKind::Image);
        }
    };

    match write_thumbnail(&image, max_size, temp_dir) {
        Ok(preview) => preview,
        Err(e) => {
            tracing::debug!(file = file.file_name(), error = %e, "サムネイル書き出しに失敗");
            fallback(MediaKind::Image)
        }
    }
}

fn write_thumbnail(image: &DynamicImage, max_size: u32, temp_dir: &Path) -> Result<Preview> {
    let thumb = image.thumbnail(max_size, max_size);
    let temp_path = tempfile::Builder::new()
        .prefix("media-ai-preview-")
        .suffix(".png")
        .tempfile_in(temp_dir)
        .map_err(|e| MediaAiError::Preview(e.to_string()))?
        .into_temp_path();

    thumb
        .save_with_format(&temp_path, ImageFormat::Png)
        .map_err(|e| MediaAiError::Preview(e.to_string()))?;

    Ok(Preview::Thumbnail {
        path: temp_path,
        width: thumb.width(),
        height: thumb.height(),
    })
}

/// ファイルを読み込み、プレビューと組にする
pub fn select(path: &Path, preview_max_size: u32) -> Result<Selection<Preview>> {
    let file = load_file(path)?;
    let preview = create_preview(path, &file, preview_max_size);
    tracing::debug!(
        file = file.file_name(),
        bytes = file.len(),
        kind = ?file.kind(),
        "ファイルを選択"
    );
    Ok(Selection::new(file, preview))
}
