//! Where the conformal vector field table comes from.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;

use flate2::read::GzDecoder;
use geo_common::{GeoError, GeoResult};
use serde::{Deserialize, Serialize};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A provider of conformal field text.
///
/// Files ending in `.gz` and byte buffers starting with the gzip magic are
/// decompressed transparently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Path(PathBuf),
    Text(String),
    /// In-memory bytes, e.g. from `include_bytes!`.
    #[serde(skip)]
    Bytes(Arc<[u8]>),
}

impl FieldSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        FieldSource::Path(path.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        FieldSource::Text(text.into())
    }

    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        FieldSource::Bytes(bytes.into())
    }

    /// Open a reader over the (decompressed) field text.
    pub fn open(&self) -> GeoResult<Box<dyn Read + '_>> {
        match self {
            FieldSource::Path(path) => {
                let file = File::open(path).map_err(|e| {
                    GeoError::DataLoadFailure(format!("{}: {}", path.display(), e))
                })?;
                let reader = BufReader::new(file);
                if path.extension().is_some_and(|ext| ext == "gz") {
                    Ok(Box::new(GzDecoder::new(reader)))
                } else {
                    Ok(Box::new(reader))
                }
            }
            FieldSource::Text(text) => Ok(Box::new(Cursor::new(text.as_bytes()))),
            FieldSource::Bytes(bytes) => {
                if bytes.starts_with(&GZIP_MAGIC) {
                    Ok(Box::new(GzDecoder::new(&bytes[..])))
                } else {
                    Ok(Box::new(&bytes[..]))
                }
            }
        }
    }
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSource::Path(path) => write!(f, "{}", path.display()),
            FieldSource::Text(text) => write!(f, "<inline text, {} bytes>", text.len()),
            FieldSource::Bytes(bytes) => write!(f, "<memory, {} bytes>", bytes.len()),
        }
    }
}
