use serde::{Deserialize, Serialize};
use std::path::Path;

const SUPPORTED_FORMATS: &[(&str, &str)] = &[
    ("jpg", "JPEG Image"),
    ("jpeg", "JPEG Image"),
    ("png", "PNG Image"),
    ("tiff", "TIFF Image"),
    ("tif", "TIFF Image"),
    ("bmp", "Bitmap Image"),
    ("cr2", "Canon RAW"),
    ("cr3", "Canon CR3 RAW"),
    ("crw", "Canon RAW"),
    ("nef", "Nikon RAW"),
    ("arw", "Sony RAW"),
    ("raw", "RAW Image"),
    ("raf", "Fujifilm RAW"),
    ("dng", "Digital Negative"),
    ("heif", "HEIF Image"),
    ("heic", "HEIC Image"),
    ("psd", "Photoshop Document"),
    ("xcf", "GIMP Image"),
    ("webp", "WebP Image"),
    ("jxr", "JPEG XR"),
    ("j2k", "JPEG 2000"),
];

const RAW_EXTENSIONS: &[&str] = &["cr2", "cr3", "crw", "nef", "arw", "raw", "raf", "dng"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FormatKind {
    Standard,
    Raw,
}

pub fn format_label(ext: &str) -> Option<&'static str> {
    SUPPORTED_FORMATS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, label)| *label)
}

pub fn is_supported(ext: &str) -> bool {
    format_label(ext).is_some()
}

pub fn is_raw(ext: &str) -> bool {
    RAW_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

pub fn kind_of(ext: &str) -> Option<FormatKind> {
    if !is_supported(ext) {
        return None;
    }
    if is_raw(ext) {
        Some(FormatKind::Raw)
    } else {
        Some(FormatKind::Standard)
    }
}

pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
