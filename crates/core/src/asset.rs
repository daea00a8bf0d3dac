use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Width of the `YYYYMMDDHHMMSSmmm` prefix every stored asset name starts with.
pub const FILENAME_LEN: usize = "20060102150405000".len();

/// Extensions accepted as images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Extensions accepted as videos (compared case-insensitively).
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mov"];

/// The two families of stored assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    /// Return a string representation of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Classify an extension (including the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lower = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&lower.as_str()) {
            Some(Self::Image)
        } else if VIDEO_EXTENSIONS.contains(&lower.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Classify a file name by its extension.
    pub fn from_file_name(name: &str) -> Result<Self, ValidationError> {
        let ext = extension(name);
        Self::from_extension(ext).ok_or_else(|| ValidationError::UnsupportedExtension(ext.to_owned()))
    }

    /// Whether assets of this kind get a downsized copy next to the original.
    #[must_use]
    pub fn has_thumbnail(self) -> bool {
        matches!(self, Self::Image)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return the extension of the final path element, dot included, or `""`.
pub fn extension(name: &str) -> &str {
    let start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let base = &name[start..];
    base.rfind('.').map_or("", |i| &base[i..])
}

/// Return the timestamp prefix of `name`, or the whole name when it is shorter.
pub fn prefix(name: &str) -> &str {
    name.get(..FILENAME_LEN).unwrap_or(name)
}

/// A validated stored-asset name: `YYYYMMDDHHMMSSmmm` followed by an allowed
/// extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetName {
    name: String,
    kind: AssetKind,
}

impl AssetName {
    /// Parse a name as accepted by lookups: at least [`FILENAME_LEN`]
    /// characters, a digit prefix, no path separators and an allowed
    /// extension.
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        if name.len() < FILENAME_LEN {
            return Err(ValidationError::NameTooShort(name.to_owned()));
        }
        if name.contains(['/', '\\']) || !prefix(name).bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::MalformedName(name.to_owned()));
        }
        let kind = AssetKind::from_file_name(name)?;
        Ok(Self {
            name: name.to_owned(),
            kind,
        })
    }

    /// Parse a name that must be exactly the prefix plus an extension, as
    /// produced by the naming engine.
    pub fn parse_exact(name: &str) -> Result<Self, ValidationError> {
        let parsed = Self::parse(name)?;
        if name.len() - parsed.extension().len() != FILENAME_LEN {
            return Err(ValidationError::MalformedName(name.to_owned()));
        }
        Ok(parsed)
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// The `YYYYMMDDHHMMSSmmm` prefix.
    pub fn prefix(&self) -> &str {
        &self.name[..FILENAME_LEN]
    }

    pub fn extension(&self) -> &str {
        extension(&self.name)
    }

    /// The `(year, month, day)` directory components encoded in the prefix.
    pub fn date_partition(&self) -> (&str, &str, &str) {
        (&self.name[0..4], &self.name[4..6], &self.name[6..8])
    }

    pub fn into_string(self) -> String {
        self.name
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for AssetName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
