use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use std::fs::{File, FileTimes};
use std::path::Path;
use std::time::SystemTime;

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

pub fn rewrite_dates(path: &Path, date: NaiveDate) -> bool {
    let midnight = date.and_time(NaiveTime::MIN);
    let stamp = midnight.format(EXIF_DATE_FORMAT).to_string();

    let exif_ok = match write_exif_dates(path, &stamp) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("EXIF日付を書き込めませんでした: {}: {:#}", path.display(), err);
            false
        }
    };

    let times_ok = match set_file_times(path, midnight) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("更新日時を設定できませんでした: {}: {:#}", path.display(), err);
            false
        }
    };

    exif_ok && times_ok
}

fn write_exif_dates(path: &Path, stamp: &str) -> Result<()> {
    let mut metadata = Metadata::new_from_path(path)
        .with_context(|| format!("EXIFを読めませんでした: {}", path.display()))?;
    metadata.set_tag(ExifTag::ModifyDate(stamp.to_string()));
    metadata.set_tag(ExifTag::DateTimeOriginal(stamp.to_string()));
    metadata.set_tag(ExifTag::CreateDate(stamp.to_string()));
    metadata
        .write_to_file(path)
        .with_context(|| format!("EXIFを書き込めませんでした: {}", path.display()))?;
    Ok(())
}

fn set_file_times(path: &Path, midnight: NaiveDateTime) -> Result<()> {
    let local = Local
        .from_local_datetime(&midnight)
        .earliest()
        .context("ローカル時刻に変換できませんでした")?;
    let stamp = SystemTime::from(local);

    let file = File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("対象ファイルを開けませんでした: {}", path.display()))?;
    file.set_times(FileTimes::new().set_accessed(stamp).set_modified(stamp))
        .with_context(|| format!("タイムスタンプ設定に失敗しました: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use std::time::UNIX_EPOCH;
    use tempfile::tempdir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 8).expect("valid date")
    }

    #[test]
    fn rewrite_swallows_exif_failure_on_non_image() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("fake.jpg");
        fs::write(&path, b"plain text, no exif container").expect("write file");

        let fully_rewritten = rewrite_dates(&path, date());
        assert!(!fully_rewritten);
        assert!(path.exists());
    }

    #[test]
    fn rewrite_sets_filesystem_mtime() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("fake.jpg");
        fs::write(&path, b"plain text, no exif container").expect("write file");

        rewrite_dates(&path, date());

        let midnight = date().and_time(NaiveTime::MIN);
        let expected = Local
            .from_local_datetime(&midnight)
            .earliest()
            .expect("local midnight");
        let expected = SystemTime::from(expected)
            .duration_since(UNIX_EPOCH)
            .expect("post-epoch date")
            .as_secs();

        let modified = fs::metadata(&path)
            .expect("metadata")
            .modified()
            .expect("mtime")
            .duration_since(UNIX_EPOCH)
            .expect("post-epoch mtime")
            .as_secs();
        assert_eq!(modified, expected);
    }

    #[test]
    fn rewrite_on_missing_file_reports_failure_without_panic() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("missing.jpg");
        assert!(!rewrite_dates(&missing, date()));
    }
}
