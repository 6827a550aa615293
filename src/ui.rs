//! 端末表示

use indicatif::{ProgressBar, ProgressStyle};
use media_ai_common::ResultView;
use std::time::Duration;

/// 実行中表示のスピナー
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// 結果表示を出力
pub fn print_view(view: &ResultView) {
    if view.is_error() {
        for line in view.lines() {
            eprintln!("❌ {}", line);
        }
        return;
    }

    if let Some(heading) = view.heading() {
        println!("📊 {}", heading);
    }

    match view {
        ResultView::Detection { rows } if rows.is_empty() => {
            println!("  (検出なし)");
        }
        ResultView::Detection { .. } => {
            // 3行で1件
            for (i, chunk) in view.lines().chunks(3).enumerate() {
                println!("  [{}]", i + 1);
                for line in chunk {
                    println!("    {}", line);
                }
            }
        }
        _ => {
            for line in view.lines() {
                println!("  {}", line);
            }
        }
    }
}
