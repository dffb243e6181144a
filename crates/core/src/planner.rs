use crate::exif_reader::source_date;
use crate::formats::{extension_of, kind_of, FormatKind};
use crate::sanitize::{normalize_label, LabelError};
use crate::validate::is_valid_image;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ロール番号は1以上で指定してください")]
    Roll,
    #[error("カメラ名が不正です: {0}")]
    Camera(LabelError),
    #[error("フィルム名が不正です: {0}")]
    Film(LabelError),
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    roll: u32,
    camera: String,
    film: String,
    date: NaiveDate,
    reverse: bool,
}

impl BatchConfig {
    pub fn new(
        roll: u32,
        camera: &str,
        film: &str,
        date: NaiveDate,
        reverse: bool,
    ) -> Result<Self, ConfigError> {
        if roll == 0 {
            return Err(ConfigError::Roll);
        }
        let camera = normalize_label(camera).map_err(ConfigError::Camera)?;
        let film = normalize_label(film).map_err(ConfigError::Film)?;
        Ok(Self {
            roll,
            camera,
            film,
            date,
            reverse,
        })
    }

    pub fn roll(&self) -> u32 {
        self.roll
    }

    pub fn camera(&self) -> &str {
        &self.camera
    }

    pub fn film(&self) -> &str {
        &self.film
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }
}

pub fn assign_order(files: &[PathBuf], reverse: bool) -> Vec<(PathBuf, u32)> {
    let mut ordered: Vec<PathBuf> = files.to_vec();
    if reverse {
        ordered.reverse();
    }
    ordered
        .into_iter()
        .zip(1u32..)
        .collect()
}

pub fn file_name(roll: u32, ordinal: u32, camera: &str, film: &str, ext: &str) -> String {
    format!("{:03}-{:02}-{}-{}{}", roll, ordinal, camera, film, ext)
}

pub fn folder_name(roll: u32, camera: &str, film: &str, date: NaiveDate) -> String {
    let month = date.format("%b%y").to_string().to_uppercase();
    format!("{:03}-{}-{}-{}", roll, camera, film, month)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCandidate {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub ordinal: u32,
    pub original_date: Option<DateTime<Local>>,
    pub format_kind: Option<FormatKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPlan {
    pub output_dir: PathBuf,
    pub folder_name: String,
    pub candidates: Vec<FileCandidate>,
}

pub fn generate_plan(
    config: &BatchConfig,
    files: &[PathBuf],
    output_root: &Path,
) -> Result<BatchPlan> {
    if files.is_empty() {
        anyhow::bail!("ファイルが選択されていません");
    }

    let folder = folder_name(config.roll(), config.camera(), config.film(), config.date());
    let output_dir = output_root.join(&folder);

    let mut candidates = Vec::with_capacity(files.len());
    for (source_path, ordinal) in assign_order(files, config.reverse()) {
        let ext = source_path
            .extension()
            .map(|v| format!(".{}", v.to_string_lossy()))
            .unwrap_or_default();
        let name = file_name(config.roll(), ordinal, config.camera(), config.film(), &ext);
        candidates.push(FileCandidate {
            original_date: source_date(&source_path),
            format_kind: extension_of(&source_path).and_then(|ext| kind_of(&ext)),
            target_path: output_dir.join(name),
            source_path,
            ordinal,
        });
    }

    Ok(BatchPlan {
        output_dir,
        folder_name: folder,
        candidates,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanStats {
    pub scanned_files: usize,
    pub image_files: usize,
    pub skipped_unsupported: usize,
    pub skipped_hidden: usize,
}

pub fn collect_image_files(root: &Path, recursive: bool) -> Result<(Vec<PathBuf>, ScanStats)> {
    if !root.exists() {
        anyhow::bail!("入力フォルダが存在しません: {}", root.display());
    }

    let mut stats = ScanStats::default();
    let mut out = Vec::new();

    if recursive {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("フォルダ走査に失敗しました: {}", root.display()))?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            stats.scanned_files += 1;
            if is_hidden(path) {
                stats.skipped_hidden += 1;
                continue;
            }
            if is_valid_image(path) {
                stats.image_files += 1;
                out.push(path.to_path_buf());
            } else {
                stats.skipped_unsupported += 1;
            }
        }
    } else {
        for entry in fs::read_dir(root)
            .with_context(|| format!("フォルダを読めませんでした: {}", root.display()))?
        {
            let entry =
                entry.with_context(|| format!("エントリ読み取り失敗: {}", root.display()))?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            stats.scanned_files += 1;
            if is_hidden(&path) {
                stats.skipped_hidden += 1;
                continue;
            }
            if is_valid_image(&path) {
                stats.image_files += 1;
                out.push(path);
            } else {
                stats.skipped_unsupported += 1;
            }
        }
        out.sort();
    }

    Ok((out, stats))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
