mod logging;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use film_archiver_core::{
    app_paths, collect_image_files, generate_plan, is_valid_image, load_config, normalize_label,
    process_batch, BatchConfig, BatchPlan, PreferenceStore, ProgressSink,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "film-archiver-cli")]
#[command(about = "フィルムスキャン画像をロール単位でリネーム・整理します")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Archive(ArchiveArgs),
    Cameras(PreferenceArgs),
    Films(PreferenceArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ArchiveArgs {
    #[arg(long)]
    roll: u32,
    #[arg(long)]
    camera: String,
    #[arg(long)]
    film: String,
    #[arg(long)]
    date: String,
    #[arg(long, default_value_t = false)]
    reverse: bool,
    #[arg(long)]
    output_root: Option<PathBuf>,
    #[arg(long)]
    input_dir: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    recursive: bool,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct PreferenceArgs {
    #[command(subcommand)]
    action: PreferenceAction,
}

#[derive(Debug, Subcommand)]
enum PreferenceAction {
    List,
    Add { name: String },
    Remove { name: String },
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy)]
enum PreferenceKind {
    Camera,
    Film,
}

fn main() -> Result<()> {
    logging::init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Archive(args) => cmd_archive(args),
        Commands::Cameras(args) => cmd_preference(PreferenceKind::Camera, args),
        Commands::Films(args) => cmd_preference(PreferenceKind::Film, args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn cmd_archive(args: ArchiveArgs) -> Result<()> {
    let date = parse_date_arg(&args.date)?;
    let app_config = load_config()?;

    let reverse = args.reverse || app_config.reverse_default;
    let config = BatchConfig::new(args.roll, &args.camera, &args.film, date, reverse)?;

    let files = resolve_files(&args)?;

    let output_root = args
        .output_root
        .or(app_config.output_root)
        .context("出力先フォルダを --output-root で指定してください")?;

    let plan = generate_plan(&config, &files, &output_root)?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Table => {
            print_table(&plan);
        }
    }

    if args.apply {
        let mut sink = ConsoleSink;
        let report = process_batch(&plan, date, &mut sink)?;

        let mut store = PreferenceStore::open_default()?;
        store.add_camera(config.camera())?;
        store.add_film(config.film())?;

        log::info!(
            "バッチ完了: {}件 -> {}",
            report.processed,
            report.output_dir.display()
        );
        eprintln!(
            "処理完了: {}/{}件 -> {}",
            report.processed,
            report.total,
            report.output_dir.display()
        );
    } else {
        eprintln!("dry-runモード: 実ファイルは変更していません。コピーするには --apply を指定してください。");
    }

    Ok(())
}

fn resolve_files(args: &ArchiveArgs) -> Result<Vec<PathBuf>> {
    if let Some(input_dir) = &args.input_dir {
        if !args.files.is_empty() {
            anyhow::bail!("--input-dir とファイル指定は同時に使えません");
        }
        let (files, stats) = collect_image_files(input_dir, args.recursive)?;
        eprintln!(
            "集計: scanned={} images={} unsupported_skip={} hidden_skip={}",
            stats.scanned_files, stats.image_files, stats.skipped_unsupported, stats.skipped_hidden
        );
        Ok(files)
    } else {
        for file in &args.files {
            if !is_valid_image(file) {
                anyhow::bail!("対応していない画像ファイルです: {}", file.display());
            }
        }
        Ok(args.files.clone())
    }
}

fn parse_date_arg(input: &str) -> Result<NaiveDate> {
    let candidates = ["%Y-%m-%d", "%m/%d/%Y"];
    for fmt in candidates {
        if let Ok(date) = NaiveDate::parse_from_str(input.trim(), fmt) {
            return Ok(date);
        }
    }
    anyhow::bail!("日付の形式が不正です: {} (YYYY-MM-DD または MM/DD/YYYY)", input)
}

fn cmd_preference(kind: PreferenceKind, args: PreferenceArgs) -> Result<()> {
    let mut store = PreferenceStore::open_default()?;

    match args.action {
        PreferenceAction::List => {
            let names = match kind {
                PreferenceKind::Camera => store.get_cameras(),
                PreferenceKind::Film => store.get_films(),
            };
            for name in names {
                println!("{}", name);
            }
        }
        PreferenceAction::Add { name } => {
            let normalized = normalize_label(&name)?;
            match kind {
                PreferenceKind::Camera => store.add_camera(&normalized)?,
                PreferenceKind::Film => store.add_film(&normalized)?,
            }
            println!("追加しました: {}", normalized);
        }
        PreferenceAction::Remove { name } => {
            let normalized = normalize_label(&name)?;
            match kind {
                PreferenceKind::Camera => store.remove_camera(&normalized)?,
                PreferenceKind::Film => store.remove_film(&normalized)?,
            }
            println!("削除しました: {}", normalized);
        }
    }

    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("環境設定ファイル: {}", paths.preferences_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn print_table(plan: &BatchPlan) {
    println!("元ファイル -> 新ファイル (撮影日)");
    for candidate in &plan.candidates {
        let original = candidate
            .original_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "不明".to_string());
        println!(
            "{} -> {} ({})",
            candidate.source_path.display(),
            candidate.target_path.display(),
            original
        );
    }

    println!("\n出力先: {}", plan.output_dir.display());
}

struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn on_progress(&mut self, percent: f32) {
        log::info!("進捗 {:.0}%", percent);
    }

    fn on_status(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}
