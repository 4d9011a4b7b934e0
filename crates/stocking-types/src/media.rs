use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Fallback type for payloads whose content type is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extension → content type table for uploaded files.
const EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("m4a", "audio/mp4"),
];

/// Content type of a stored payload (e.g. `image/png`).
///
/// An empty media type is allowed: it mirrors an untyped blob and is
/// exported as [`OCTET_STREAM`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaType(String);

impl MediaType {
    /// Wrap a content type string without validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn octet_stream() -> Self {
        Self(OCTET_STREAM.to_string())
    }

    /// Guess the content type from a filename extension.
    pub fn from_filename(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        ext.and_then(|ext| {
            EXTENSIONS
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| Self::new(*mime))
        })
        .unwrap_or_else(Self::octet_stream)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_image(&self) -> bool {
        self.0.starts_with("image/")
    }

    pub fn is_audio(&self) -> bool {
        self.0.starts_with("audio/")
    }

    /// Check that this type can be embedded in a data URL header.
    ///
    /// The header ends at the first `,` and parameters are split on `;`
    /// so a comma, whitespace or non-ASCII byte would corrupt the encoding.
    /// A non-empty type must also name an essence before its first `;`;
    /// a header that starts with `;` reads back as the data URL default.
    pub fn validate(&self) -> Result<(), TypeError> {
        let bad = self
            .0
            .chars()
            .any(|c| !c.is_ascii() || c.is_ascii_control() || c == ',' || c == ' ');
        let no_essence = self.0.starts_with(';');
        if bad || no_essence {
            return Err(TypeError::InvalidMediaType(self.0.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
