use crate::formats::{self, FormatKind};
use image::ImageReader;
use std::path::Path;

pub fn is_valid_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let Some(ext) = formats::extension_of(path) else {
        return false;
    };
    match formats::kind_of(&ext) {
        Some(FormatKind::Raw) => true,
        Some(FormatKind::Standard) => probe_dimensions(path),
        None => false,
    }
}

fn probe_dimensions(path: &Path) -> bool {
    let Ok(reader) = ImageReader::open(path) else {
        return false;
    };
    let Ok(reader) = reader.with_guessed_format() else {
        return false;
    };
    reader.into_dimensions().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_invalid() {
        let temp = tempdir().expect("tempdir");
        assert!(!is_valid_image(&temp.path().join("missing.jpg")));
    }

    #[test]
    fn unsupported_extension_is_invalid() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("notes.txt");
        fs::write(&path, b"hello").expect("write file");
        assert!(!is_valid_image(&path));
    }

    #[test]
    fn raw_extension_needs_existence_only() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("frame.NEF");
        fs::write(&path, b"not really raw sensor data").expect("write file");
        assert!(is_valid_image(&path));
    }

    #[test]
    fn corrupt_standard_file_is_invalid() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("broken.jpg");
        fs::write(&path, b"this is not a jpeg").expect("write file");
        assert!(!is_valid_image(&path));
    }

    #[test]
    fn genuine_png_is_valid() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("scan.png");
        image::RgbImage::new(4, 4)
            .save(&path)
            .expect("encode test png");
        assert!(is_valid_image(&path));
    }

    #[test]
    fn directory_with_image_extension_is_invalid() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("folder.jpg");
        fs::create_dir_all(&path).expect("create dir");
        assert!(!is_valid_image(&path));
    }
}
