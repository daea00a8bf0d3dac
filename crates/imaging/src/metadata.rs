use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime};
use exif::{Exif, In, Reader, Tag, Value};

use photorepo_asset::{ExifData, ExifReader};

/// Reads EXIF capture time and orientation with the `kamadak-exif` parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct KamadakExifReader;

#[async_trait]
impl ExifReader for KamadakExifReader {
    async fn read(&self, data: Bytes) -> ExifData {
        match tokio::task::spawn_blocking(move || parse(&data)).await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "exif task failed");
                ExifData::default()
            }
        }
    }
}

/// Parse the EXIF block of a JPEG, PNG or TIFF image.
///
/// Anything unreadable yields [`ExifData::default`].
pub fn parse(data: &[u8]) -> ExifData {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        Err(e) => {
            tracing::debug!(error = %e, "no readable exif");
            return ExifData::default();
        }
    };
    ExifData {
        captured_at: capture_time(&exif),
        orientation: orientation(&exif),
    }
}

/// `DateTimeOriginal`, falling back to `DateTime`.
fn capture_time(exif: &Exif) -> Option<NaiveDateTime> {
    [Tag::DateTimeOriginal, Tag::DateTime]
        .into_iter()
        .find_map(|tag| {
            let field = exif.get_field(tag, In::PRIMARY)?;
            let Value::Ascii(ref parts) = field.value else {
                return None;
            };
            let dt = exif::DateTime::from_ascii(parts.first()?).ok()?;
            NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))?
                .and_hms_opt(
                    u32::from(dt.hour),
                    u32::from(dt.minute),
                    u32::from(dt.second),
                )
        })
}

fn orientation(exif: &Exif) -> Option<u16> {
    let value = exif
        .get_field(Tag::Orientation, In::PRIMARY)?
        .value
        .get_uint(0)?;
    u16::try_from(value).ok().filter(|v| (1..=8).contains(v))
}
