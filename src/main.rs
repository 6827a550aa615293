use anyhow::Context;
use clap::Parser;
use media_ai_common::{submit_label, Effect};
use media_ai_rust::backend::HttpBackend;
use media_ai_rust::{cli, config, interactive, media, session, ui};
use cli::{Cli, Commands};
use config::Config;
use session::Session;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// --base-url が指定されていれば設定・環境変数より優先
fn build_backend(config: &Config, base_url: Option<&str>) -> anyhow::Result<HttpBackend> {
    let backend = match base_url {
        Some(url) => HttpBackend::new(url, Duration::from_secs(config.timeout_seconds))?,
        None => HttpBackend::from_config(config)?,
    };
    Ok(backend)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load().context("設定の読み込みに失敗")?;

    match cli.command {
        Commands::Process { file, mode, json } => {
            let backend = build_backend(&config, cli.base_url.as_deref())?;
            if !json {
                println!("🎞  media-ai - {}\n", mode.label());
                println!("- 送信先: {}", backend.endpoint_url(mode));
            }

            let selection = media::select(&file, config.preview_max_size)
                .with_context(|| format!("ファイルを選択できません: {}", file.display()))?;

            let mut session = Session::new(backend);
            session.set_mode(mode);
            session.select_file(selection);

            if !json {
                if let (Some(f), Some(preview)) =
                    (session.state().selected_file(), session.state().preview())
                {
                    println!("- ファイル: {} ({} bytes)", f.file_name(), f.len());
                    println!("- プレビュー: {}\n", preview);
                }
            }

            let spinner = (!json).then(|| ui::spinner(submit_label(true)));
            let effect = session.submit().await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }

            if json {
                println!("{}", serde_json::to_string_pretty(session.state().outcome())?);
            } else if let Some(view) = session.view() {
                ui::print_view(&view);
            }

            session.teardown();

            if matches!(effect, Effect::Failed { .. }) {
                std::process::exit(1);
            }
        }

        Commands::Interactive => {
            let backend = build_backend(&config, cli.base_url.as_deref())?;
            println!("送信先: {}\n", backend.base_url());
            let mut session = Session::new(backend);
            interactive::run_interactive(&mut session, config.preview_max_size).await?;
        }

        Commands::Config { set_base_url, set_timeout, show } => {
            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ タイムアウトを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ベースURL: {}", config.effective_base_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  プレビュー最大サイズ: {}px", config.preview_max_size);
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}
