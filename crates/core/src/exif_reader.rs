use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use exif::Reader;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

const DATE_TAG_PRIORITY: &[&str] = &["DateTimeOriginal", "DateTimeDigitized", "DateTime"];

pub fn read_capture_date(path: &Path) -> Option<DateTime<Local>> {
    read_exif_date(path).ok().flatten()
}

pub fn source_date(path: &Path) -> Option<DateTime<Local>> {
    read_capture_date(path).or_else(|| file_modified_to_local(path))
}

fn read_exif_date(path: &Path) -> Result<Option<DateTime<Local>>> {
    let file = File::open(path)
        .with_context(|| format!("EXIF読み込み対象を開けませんでした: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("EXIFを解析できませんでした: {}", path.display()))?;

    Ok(find_field_value(&exif, DATE_TAG_PRIORITY).and_then(|raw| parse_date(&raw)))
}

fn find_field_value(exif: &exif::Exif, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        exif.fields().find_map(|field| {
            let tag_name = format!("{:?}", field.tag);
            if name.eq_ignore_ascii_case(&tag_name) {
                Some(field.display_value().with_unit(exif).to_string())
            } else {
                None
            }
        })
    })
}

fn parse_date(input: &str) -> Option<DateTime<Local>> {
    let normalized = input.trim();

    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%dT%H:%M:%S%.f%:z",
    ];

    for fmt in candidates {
        if let Ok(dt) = DateTime::parse_from_str(normalized, fmt) {
            return Some(dt.with_timezone(&Local));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(normalized, fmt) {
            if let Some(local) = Local.from_local_datetime(&naive).single() {
                return Some(local);
            }
        }
    }

    None
}

pub fn file_modified_to_local(path: &Path) -> Option<DateTime<Local>> {
    let time = fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::from(time))
}
