use crate::exif_writer::rewrite_dates;
use crate::planner::BatchPlan;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub trait ProgressSink {
    fn on_progress(&mut self, percent: f32);
    fn on_status(&mut self, message: &str);
}

#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&mut self, _percent: f32) {}
    fn on_status(&mut self, _message: &str) {}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub ordinal: u32,
    pub metadata_rewritten: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub processed: usize,
    pub total: usize,
    pub outcomes: Vec<FileOutcome>,
}

pub fn process_batch(
    plan: &BatchPlan,
    date: NaiveDate,
    sink: &mut dyn ProgressSink,
) -> Result<BatchReport> {
    if plan.candidates.is_empty() {
        anyhow::bail!("ファイルが選択されていません");
    }

    fs::create_dir_all(&plan.output_dir).with_context(|| {
        format!(
            "出力フォルダを作成できませんでした: {}",
            plan.output_dir.display()
        )
    })?;

    let total = plan.candidates.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, candidate) in plan.candidates.iter().enumerate() {
        fs::copy(&candidate.source_path, &candidate.target_path).with_context(|| {
            format!(
                "コピーに失敗しました: {} -> {}",
                candidate.source_path.display(),
                candidate.target_path.display()
            )
        })?;

        let metadata_rewritten = rewrite_dates(&candidate.target_path, date);

        let done = index + 1;
        let shown = candidate
            .target_path
            .file_name()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_else(|| candidate.target_path.display().to_string());
        sink.on_progress(done as f32 / total as f32 * 100.0);
        sink.on_status(&format!("{} ({}/{})", shown, done, total));

        outcomes.push(FileOutcome {
            source_path: candidate.source_path.clone(),
            target_path: candidate.target_path.clone(),
            ordinal: candidate.ordinal,
            metadata_rewritten,
        });
    }

    Ok(BatchReport {
        output_dir: plan.output_dir.clone(),
        processed: outcomes.len(),
        total,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{generate_plan, BatchConfig};
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingSink {
        percents: Vec<f32>,
        messages: Vec<String>,
    }

    impl ProgressSink for RecordingSink {
        fn on_progress(&mut self, percent: f32) {
            self.percents.push(percent);
        }

        fn on_status(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 8).expect("valid date")
    }

    fn config(reverse: bool) -> BatchConfig {
        BatchConfig::new(1, "NIKON F3", "KODAK 400", date(), reverse).expect("valid config")
    }

    fn write_sources(dir: &std::path::Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, name.as_bytes()).expect("write source");
                path
            })
            .collect()
    }

    #[test]
    fn process_batch_copies_all_files_in_order() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("src");
        let out = temp.path().join("out");
        fs::create_dir_all(&src).expect("create src");

        let files = write_sources(&src, &["a.jpg", "b.jpg", "c.jpg"]);
        let plan = generate_plan(&config(false), &files, &out).expect("plan");

        let mut sink = RecordingSink::default();
        let report = process_batch(&plan, date(), &mut sink).expect("batch must complete");

        assert_eq!(report.processed, 3);
        assert_eq!(report.total, 3);
        assert_eq!(report.outcomes.len(), 3);

        let copied = out
            .join("001-NIKON F3-KODAK 400-FEB24")
            .join("001-02-NIKON F3-KODAK 400.jpg");
        assert_eq!(fs::read(&copied).expect("read copy"), b"b.jpg");

        assert_eq!(sink.percents.len(), 3);
        assert!((sink.percents[2] - 100.0).abs() < f32::EPSILON);
        assert!(sink.messages[0].contains("(1/3)"));
    }

    #[test]
    fn process_batch_reuses_existing_output_directory() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("src");
        let out = temp.path().join("out");
        fs::create_dir_all(&src).expect("create src");

        let files = write_sources(&src, &["a.jpg"]);
        let plan = generate_plan(&config(false), &files, &out).expect("plan");

        let mut sink = NullSink;
        process_batch(&plan, date(), &mut sink).expect("first run");
        let report = process_batch(&plan, date(), &mut sink).expect("second run");
        assert_eq!(report.processed, 1);
    }

    #[test]
    fn process_batch_aborts_on_first_copy_failure() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("src");
        let out = temp.path().join("out");
        fs::create_dir_all(&src).expect("create src");

        let files = write_sources(&src, &["a.jpg", "b.jpg", "c.jpg"]);
        let plan = generate_plan(&config(false), &files, &out).expect("plan");

        fs::create_dir_all(&plan.candidates[1].target_path).expect("block second target");

        let mut sink = RecordingSink::default();
        let err = process_batch(&plan, date(), &mut sink).expect_err("second copy must fail");
        assert!(err.to_string().contains("コピーに失敗しました"));
        assert!(err.to_string().contains("b.jpg"));

        assert!(plan.candidates[0].target_path.is_file());
        assert!(!plan.candidates[2].target_path.exists());
        assert_eq!(sink.percents.len(), 1);
    }

    #[test]
    fn process_batch_counts_files_with_failed_metadata_rewrite() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("src");
        let out = temp.path().join("out");
        fs::create_dir_all(&src).expect("create src");

        let files = write_sources(&src, &["a.jpg"]);
        let plan = generate_plan(&config(false), &files, &out).expect("plan");

        let mut sink = NullSink;
        let report = process_batch(&plan, date(), &mut sink).expect("batch must complete");

        assert_eq!(report.processed, 1);
        assert!(!report.outcomes[0].metadata_rewritten);
        assert!(report.outcomes[0].target_path.is_file());
    }

    #[test]
    fn process_batch_reverse_copies_in_reversed_order() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("src");
        let out = temp.path().join("out");
        fs::create_dir_all(&src).expect("create src");

        let files = write_sources(&src, &["a.jpg", "b.jpg", "c.jpg"]);
        let plan = generate_plan(&config(true), &files, &out).expect("plan");

        let mut sink = NullSink;
        process_batch(&plan, date(), &mut sink).expect("batch must complete");

        let first = out
            .join("001-NIKON F3-KODAK 400-FEB24")
            .join("001-01-NIKON F3-KODAK 400.jpg");
        assert_eq!(fs::read(&first).expect("read copy"), b"c.jpg");
    }

    #[test]
    fn process_batch_overwrites_existing_target() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("src");
        let out = temp.path().join("out");
        fs::create_dir_all(&src).expect("create src");

        let files = write_sources(&src, &["a.jpg"]);
        let plan = generate_plan(&config(false), &files, &out).expect("plan");

        fs::create_dir_all(&plan.output_dir).expect("create out dir");
        fs::write(&plan.candidates[0].target_path, b"stale").expect("write stale copy");

        let mut sink = NullSink;
        process_batch(&plan, date(), &mut sink).expect("batch must complete");
        assert_eq!(
            fs::read(&plan.candidates[0].target_path).expect("read copy"),
            b"a.jpg"
        );
    }
}
