use crate::config::app_paths;
use crate::sanitize::normalize_label;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PreferenceDocument {
    #[serde(default)]
    cameras: Vec<String>,
    #[serde(default)]
    films: Vec<String>,
}

#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    cameras: Vec<String>,
    films: Vec<String>,
}

impl PreferenceStore {
    pub fn open_default() -> Result<Self> {
        let paths = app_paths()?;
        Ok(Self::load(paths.preferences_path))
    }

    pub fn load(path: PathBuf) -> Self {
        let document = read_document(&path);
        Self {
            path,
            cameras: document.cameras,
            films: document.films,
        }
    }

    pub fn get_cameras(&self) -> Vec<String> {
        let mut cameras = self.cameras.clone();
        cameras.sort();
        cameras
    }

    pub fn get_films(&self) -> Vec<String> {
        let mut films = self.films.clone();
        films.sort();
        films
    }

    pub fn add_camera(&mut self, raw: &str) -> Result<()> {
        let Some(camera) = accepted_label(raw) else {
            return Ok(());
        };
        if self.cameras.contains(&camera) {
            return Ok(());
        }
        self.cameras.push(camera);
        self.save()
    }

    pub fn add_film(&mut self, raw: &str) -> Result<()> {
        let Some(film) = accepted_label(raw) else {
            return Ok(());
        };
        if self.films.contains(&film) {
            return Ok(());
        }
        self.films.push(film);
        self.save()
    }

    pub fn remove_camera(&mut self, raw: &str) -> Result<()> {
        let Some(camera) = accepted_label(raw) else {
            return Ok(());
        };
        if !self.cameras.contains(&camera) {
            return Ok(());
        }
        self.cameras.retain(|known| known != &camera);
        self.save()
    }

    pub fn remove_film(&mut self, raw: &str) -> Result<()> {
        let Some(film) = accepted_label(raw) else {
            return Ok(());
        };
        if !self.films.contains(&film) {
            return Ok(());
        }
        self.films.retain(|known| known != &film);
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("環境設定フォルダを作成できませんでした: {}", parent.display())
            })?;
        }

        let document = PreferenceDocument {
            cameras: self.cameras.clone(),
            films: self.films.clone(),
        };
        let body = serde_json::to_string_pretty(&document)
            .context("環境設定のシリアライズに失敗しました")?;
        fs::write(&self.path, body).with_context(|| {
            format!("環境設定を書き込めませんでした: {}", self.path.display())
        })?;
        Ok(())
    }
}

fn accepted_label(raw: &str) -> Option<String> {
    normalize_label(raw).ok()
}

fn read_document(path: &Path) -> PreferenceDocument {
    if !path.exists() {
        return PreferenceDocument::default();
    }

    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(err) => {
                log::warn!("環境設定を読めませんでした: {}: {}", path.display(), err);
                PreferenceDocument::default()
            }
        },
        Err(err) => {
            log::warn!("環境設定を読めませんでした: {}: {}", path.display(), err);
            PreferenceDocument::default()
        }
    }
}
