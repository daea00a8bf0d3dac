//! Canonical, collision-free storage names.
//!
//! A stored name is `YYYYMMDDHHMMSS` taken from the best available capture
//! time, followed by the current millisecond and the lower-cased extension.
//! Capture time comes from, in order: a device-style file name
//! (`YYYYMMDD_HHMMSS.ext`), the EXIF capture timestamp, the current time.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;
use tokio::fs::{File, OpenOptions};

use photorepo_core::{AssetKind, Clock, ValidationError, extension};

use crate::error::AssetError;
use crate::layout::StoreLayout;

/// File names as written by phone cameras, e.g. `20240315_083000.jpg`.
static DEVICE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{8})_(\d{6})\.(?i:jpg|jpeg|png|mp4|mov)$").expect("device name regex is valid")
});

/// A derived storage name and the date partition it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedName {
    pub kind: AssetKind,
    /// `YYYYMMDDHHMMSSmmm.ext`
    pub name: String,
    /// `YYYY/MM/DD`
    pub date_path: String,
}

impl DerivedName {
    /// Path relative to the store root, e.g. `images/2024/03/15/<name>`.
    pub fn relative_path(&self) -> PathBuf {
        let kind_dir = match self.kind {
            AssetKind::Image => crate::layout::IMAGE_DIR,
            AssetKind::Video => crate::layout::VIDEO_DIR,
        };
        PathBuf::from(kind_dir).join(&self.date_path).join(&self.name)
    }
}

/// A freshly created, empty file at a derived path that no other upload owns.
#[derive(Debug)]
pub struct Reservation {
    pub derived: DerivedName,
    pub path: PathBuf,
    pub file: File,
}

/// Turns upload file names into storage names.
#[derive(Debug, Clone)]
pub struct NameDeriver {
    clock: Arc<dyn Clock>,
}

impl NameDeriver {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Compute a candidate name for `source_file_name`.
    ///
    /// The millisecond suffix always comes from `now`, so two uploads with the
    /// same capture second differ as long as they are derived in different
    /// milliseconds.
    pub fn derive(
        source_file_name: &str,
        captured_at: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<DerivedName, ValidationError> {
        let kind = AssetKind::from_file_name(source_file_name)?;
        let ext = extension(source_file_name).to_ascii_lowercase();

        let taken = device_timestamp(source_file_name)
            .or(captured_at)
            .unwrap_or(now);
        let millis = (now.nanosecond() % 1_000_000_000) / 1_000_000;

        Ok(DerivedName {
            kind,
            name: format!("{}{millis:03}{ext}", taken.format("%Y%m%d%H%M%S")),
            date_path: taken.format("%Y/%m/%d").to_string(),
        })
    }

    /// Derive a name and claim it on disk.
    ///
    /// The target file is opened with `create_new`, so the filesystem decides
    /// between concurrent uploads. A taken path is retried with a fresh
    /// timestamp once at least a millisecond has passed.
    pub async fn reserve(
        &self,
        layout: &StoreLayout,
        source_file_name: &str,
        captured_at: Option<NaiveDateTime>,
    ) -> Result<Reservation, AssetError> {
        loop {
            let now = self.clock.now().naive_local();
            let derived = Self::derive(source_file_name, captured_at, now)?;
            let path = layout.root().join(derived.relative_path());

            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AssetError::io(parent, e))?;
            }

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    return Ok(Reservation {
                        derived,
                        path,
                        file,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(
                        path = %path.display(),
                        source = %source_file_name,
                        "asset path taken, retrying with a fresh timestamp"
                    );
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
                Err(e) => return Err(AssetError::io(path, e)),
            }
        }
    }
}

fn device_timestamp(file_name: &str) -> Option<NaiveDateTime> {
    let caps = DEVICE_NAME_RE.captures(file_name)?;
    NaiveDateTime::parse_from_str(&format!("{}{}", &caps[1], &caps[2]), "%Y%m%d%H%M%S").ok()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Local, NaiveDate, TimeZone};
    use photorepo_core::{AssetName, ManualClock, SystemClock};

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
    }

    #[test]
    fn device_name_wins_over_exif_and_now() {
        let derived = NameDeriver::derive(
            "20230704_182233.JPG",
            Some(at(2020, 1, 1, 0, 0, 0, 0)),
            at(2024, 5, 6, 7, 8, 9, 42),
        )
        .unwrap();
        assert_eq!(derived.kind, AssetKind::Image);
        assert_eq!(derived.name, "20230704182233042.jpg");
        assert_eq!(derived.date_path, "2023/07/04");
        assert_eq!(
            derived.relative_path(),
            PathBuf::from("images/2023/07/04/20230704182233042.jpg")
        );
    }

    #[test]
    fn exif_timestamp_used_when_name_is_not_device_style() {
        let derived = NameDeriver::derive(
            "IMG_1234.jpeg",
            Some(at(2019, 12, 31, 23, 59, 58, 0)),
            at(2024, 5, 6, 7, 8, 9, 7),
        )
        .unwrap();
        assert_eq!(derived.name, "20191231235958007.jpeg");
        assert_eq!(derived.date_path, "2019/12/31");
    }

    #[test]
    fn falls_back_to_now() {
        let derived =
            NameDeriver::derive("clip.MP4", None, at(2024, 5, 6, 7, 8, 9, 999)).unwrap();
        assert_eq!(derived.kind, AssetKind::Video);
        assert_eq!(derived.name, "20240506070809999.mp4");
        assert_eq!(
            derived.relative_path(),
            PathBuf::from("videos/2024/05/06/20240506070809999.mp4")
        );
    }

    #[test]
    fn invalid_device_date_falls_through() {
        let derived =
            NameDeriver::derive("20231399_250000.jpg", None, at(2024, 5, 6, 7, 8, 9, 1)).unwrap();
        assert_eq!(derived.name, "20240506070809001.jpg");
    }

    #[test]
    fn derived_names_are_valid_asset_names() {
        let derived =
            NameDeriver::derive("20230704_182233.png", None, at(2024, 1, 1, 0, 0, 0, 5)).unwrap();
        let parsed = AssetName::parse_exact(&derived.name).unwrap();
        assert_eq!(parsed.kind(), AssetKind::Image);
        assert!(NaiveDateTime::parse_from_str(&parsed.prefix()[..14], "%Y%m%d%H%M%S").is_ok());
    }

    #[test]
    fn rejects_unsupported_extension() {
        assert_eq!(
            NameDeriver::derive("notes.txt", None, at(2024, 1, 1, 0, 0, 0, 0)).unwrap_err(),
            ValidationError::UnsupportedExtension(".txt".into())
        );
    }

    #[tokio::test]
    async fn reserve_skips_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StoreLayout::new(dir.path());
        let start = Local.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap();
        let clock = Arc::new(ManualClock::ticking(start, ChronoDuration::milliseconds(1)));
        let deriver = NameDeriver::new(clock);

        let taken = dir.path().join("images/2024/03/15/20240315083000000.jpg");
        std::fs::create_dir_all(taken.parent().unwrap()).unwrap();
        std::fs::write(&taken, b"existing").unwrap();

        let reservation = deriver
            .reserve(&layout, "photo.jpg", None)
            .await
            .unwrap();
        assert_eq!(reservation.derived.name, "20240315083000001.jpg");
        assert!(reservation.path.exists());
        assert_eq!(std::fs::read(&taken).unwrap(), b"existing");
    }

    #[tokio::test(start_paused = true)]
    async fn retry_waits_a_millisecond() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StoreLayout::new(dir.path());
        let start = Local.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap();
        let clock = Arc::new(ManualClock::ticking(start, ChronoDuration::milliseconds(1)));
        let deriver = NameDeriver::new(clock);

        for millis in 0..3 {
            let taken = dir
                .path()
                .join(format!("images/2024/03/15/20240315083000{millis:03}.jpg"));
            std::fs::create_dir_all(taken.parent().unwrap()).unwrap();
            std::fs::write(&taken, b"existing").unwrap();
        }

        let before = tokio::time::Instant::now();
        let reservation = deriver
            .reserve(&layout, "photo.jpg", None)
            .await
            .unwrap();
        assert_eq!(reservation.derived.name, "20240315083000003.jpg");
        assert!(before.elapsed() >= Duration::from_millis(3));
    }

    #[tokio::test]
    async fn tight_loop_yields_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StoreLayout::new(dir.path());
        let deriver = NameDeriver::new(Arc::new(SystemClock));

        let mut paths = std::collections::HashSet::new();
        for _ in 0..20 {
            let reservation = deriver
                .reserve(&layout, "20240101_120000.jpg", None)
                .await
                .unwrap();
            assert!(reservation.derived.name.starts_with("20240101120000"));
            assert!(paths.insert(reservation.path));
        }
        assert_eq!(paths.len(), 20);
    }
}
