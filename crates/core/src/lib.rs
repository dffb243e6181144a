mod config;
mod exif_reader;
mod exif_writer;
mod formats;
mod planner;
mod preferences;
mod processor;
mod sanitize;
mod validate;

pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use exif_reader::{read_capture_date, source_date};
pub use exif_writer::rewrite_dates;
pub use formats::{extension_of, format_label, is_raw, is_supported, kind_of, FormatKind};
pub use planner::{
    assign_order, collect_image_files, file_name, folder_name, generate_plan, BatchConfig,
    BatchPlan, ConfigError, FileCandidate, ScanStats,
};
pub use preferences::PreferenceStore;
pub use processor::{process_batch, BatchReport, FileOutcome, NullSink, ProgressSink};
pub use sanitize::{normalize_label, LabelError};
pub use validate::is_valid_image;
