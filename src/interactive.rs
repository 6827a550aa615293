//! 対話モード
//!
//! ファイル選択・モード切替・送信をメニューから繰り返す。
//! 終了時（およびCtrl-C以外のエラー終了時）に選択とプレビューを解放する。

use crate::backend::InferenceBackend;
use crate::error::{MediaAiError, Result};
use crate::media::{self, Preview};
use crate::session::Session;
use crate::ui;
use dialoguer::{Input, Select};
use media_ai_common::{drop_hint, submit_label, Mode};
use std::path::PathBuf;

/// メニュー操作
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    /// ファイルを選択
    SelectFile(PathBuf),
    /// モードを切り替え
    SwitchMode(Mode),
    /// 送信
    Process,
    /// 終了
    Quit,
}

const MENU_ITEMS: &[&str] = &["ファイルを選択", "モードを切り替え", "送信", "終了"];

/// 対話モードを実行
pub async fn run_interactive<B: InferenceBackend>(
    session: &mut Session<B, Preview>,
    preview_max_size: u32,
) -> Result<()> {
    println!("🎞  media-ai - 対話モード\n");

    let result = run_loop(session, preview_max_size).await;
    session.teardown();
    result
}

async fn run_loop<B: InferenceBackend>(
    session: &mut Session<B, Preview>,
    preview_max_size: u32,
) -> Result<()> {
    loop {
        print_status(session);

        match prompt_action(session.state().mode())? {
            MenuAction::SelectFile(path) => match media::select(&path, preview_max_size) {
                Ok(selection) => {
                    session.select_file(selection);
                    if let Some(preview) = session.state().preview() {
                        println!("✔ プレビュー: {}\n", preview);
                    }
                }
                Err(e) => println!("⚠ {}\n", e),
            },
            MenuAction::SwitchMode(mode) => {
                session.set_mode(mode);
                println!("✔ モード: {}\n", mode.label());
            }
            MenuAction::Process => {
                if session.state().selected_file().is_none() {
                    println!("ファイルが選択されていません\n");
                    continue;
                }
                let spinner = ui::spinner(submit_label(true));
                session.submit().await;
                spinner.finish_and_clear();

                if let Some(view) = session.view() {
                    ui::print_view(&view);
                }
                println!();
            }
            MenuAction::Quit => {
                println!("終了します");
                return Ok(());
            }
        }
    }
}

fn print_status<B: InferenceBackend>(session: &Session<B, Preview>) {
    let state = session.state();
    let file = state
        .selected_file()
        .map(|f| format!("{} ({} bytes)", f.file_name(), f.len()))
        .unwrap_or_else(|| drop_hint(false).to_string());
    println!("[{}] {}", state.mode().label(), file);
}

fn prompt_action(current: Mode) -> Result<MenuAction> {
    let index = Select::new()
        .with_prompt("操作")
        .items(MENU_ITEMS)
        .default(0)
        .interact()
        .map_err(|e| MediaAiError::Prompt(e.to_string()))?;

    match index {
        0 => {
            let input: String = Input::new()
                .with_prompt("ファイルパス")
                .interact_text()
                .map_err(|e| MediaAiError::Prompt(e.to_string()))?;
            Ok(MenuAction::SelectFile(PathBuf::from(input.trim())))
        }
        1 => {
            let labels: Vec<&str> = Mode::ALL.iter().map(|m| m.label()).collect();
            let default = Mode::ALL.iter().position(|m| *m == current).unwrap_or(0);
            let selected = Select::new()
                .with_prompt("モード")
                .items(&labels)
                .default(default)
                .interact()
                .map_err(|e| MediaAiError::Prompt(e.to_string()))?;
            Ok(MenuAction::SwitchMode(Mode::ALL[selected]))
        }
        2 => Ok(MenuAction::Process),
        _ => Ok(MenuAction::Quit),
    }
}
