use anyhow::{Context, Result};
use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;

pub fn init_logging() -> Result<()> {
    let paths = film_archiver_core::app_paths()?;
    let log_dir = paths.config_dir.join("logs");
    fs::create_dir_all(&log_dir).with_context(|| {
        format!("ログフォルダを作成できませんでした: {}", log_dir.display())
    })?;

    let log_file = log_dir.join(format!("film-archiver-{}.log", Local::now().format("%Y%m%d")));

    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Info)
        .chain(fern::log_file(&log_file).with_context(|| {
            format!("ログファイルを開けませんでした: {}", log_file.display())
        })?)
        .chain(
            Dispatch::new()
                .level(LevelFilter::Warn)
                .chain(std::io::stderr()),
        )
        .apply()
        .context("ロガーの初期化に失敗しました")?;
    Ok(())
}
