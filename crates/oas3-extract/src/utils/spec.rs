use std::{ffi::OsStr, path::Path};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use oas3::OpenApiV3Spec;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext.to_ascii_lowercase().as_str() {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }
}

#[derive(Debug, Error)]
pub enum SpecLoadError {
  #[error("failed to read '{path}': {message}")]
  Io { path: String, message: String },
  #[error("invalid JSON document: {0}")]
  Json(#[from] serde_json::Error),
  #[error("YAML document is not valid UTF-8: {0}")]
  Utf8(#[from] std::str::Utf8Error),
  #[error("invalid YAML document: {0}")]
  Yaml(String),
}

/// Memory-mapped OpenAPI document, parsed on demand.
pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> Result<Self, SpecLoadError> {
    let file = AsyncMmapFile::open(path).await.map_err(|err| SpecLoadError::Io {
      path: path.display().to_string(),
      message: err.to_string(),
    })?;

    Ok(Self {
      file,
      format: SpecFormat::from_path(path),
    })
  }

  #[must_use]
  pub const fn format(&self) -> SpecFormat {
    self.format
  }

  pub fn parse(&self) -> Result<oas3::Spec, SpecLoadError> {
    parse_bytes(self.file.as_slice(), self.format)
  }
}

pub fn parse_bytes(bytes: &[u8], format: SpecFormat) -> Result<oas3::Spec, SpecLoadError> {
  match format {
    SpecFormat::Json => Ok(serde_json::from_slice::<OpenApiV3Spec>(bytes)?),
    SpecFormat::Yaml => {
      let content = std::str::from_utf8(bytes)?;
      oas3::from_yaml(content).map_err(|err| SpecLoadError::Yaml(err.to_string()))
    }
  }
}
