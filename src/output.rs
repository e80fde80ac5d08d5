//! Sample files, preview images, and output file naming.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::sampler::Batch;

/// On-disk record of a sampled batch of model inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Human-readable name of the run.
    pub name: String,
    /// When the samples were drawn.
    pub recorded_at: DateTime<Utc>,
    /// Noise type the samples were drawn from.
    pub z_type: String,
    /// Noise dimensionality.
    pub z_size: usize,
    /// Class count of the sampled model.
    pub num_classes: usize,
    /// Number of samples.
    pub count: usize,
    /// Seed of the random source, if one was fixed.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Row-major noise values.
    #[serde(with = "base64_f32")]
    pub z: Vec<f32>,
    /// Class labels for conditional models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<usize>>,
}

impl SampleRecord {
    /// Build a record from a sampled batch.
    #[must_use]
    pub fn from_batch(
        name: impl Into<String>,
        z_type: impl Into<String>,
        num_classes: usize,
        seed: Option<u64>,
        batch: &Batch,
    ) -> Self {
        Self {
            name: name.into(),
            recorded_at: Utc::now(),
            z_type: z_type.into(),
            z_size: batch.z.ncols(),
            num_classes,
            count: batch.z.nrows(),
            seed,
            z: batch.z.iter().copied().collect(),
            labels: batch.labels.as_ref().map(Array1::to_vec),
        }
    }

    /// Rebuild the `(count, z_size)` noise matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored values do not match `count * z_size`.
    pub fn noise(&self) -> Result<Array2<f32>, GenError> {
        Array2::from_shape_vec((self.count, self.z_size), self.z.clone())
            .map_err(|e| GenError::Serialization(format!("Noise does not match shape: {e}")))
    }
}

/// Serde helper storing `Vec<f32>` as base64 of little-endian bytes.
mod base64_f32 {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize floats as a base64 string.
    pub fn serialize<S: Serializer>(data: &[f32], serializer: S) -> Result<S::Ok, S::Error> {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    /// Deserialize a base64 string to floats.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f32>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes =
            base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)?;
        if bytes.len() % 4 != 0 {
            return Err(serde::de::Error::custom(format!(
                "noise payload of {} bytes is not a whole number of f32 values",
                bytes.len()
            )));
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

/// File format of a sample record, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// YAML (default).
    Yaml,
    /// JSON (`.json`).
    Json,
}

impl RecordFormat {
    /// Pick the format for `path`, defaulting to YAML.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        Self::from_extension(path).unwrap_or(Self::Yaml)
    }

    /// The format named by `path`'s extension, if it names one.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::parse(&ext).ok()
    }

    /// Parse a format name from the command line or config.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not `yaml` or `json`.
    pub fn parse(name: &str) -> Result<Self, String> {
        match name {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unsupported format '{name}'. Valid: yaml, json")),
        }
    }

    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Write `record` to `path` encoded as `format`.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written.
pub fn save_record(
    record: &SampleRecord,
    path: &Path,
    format: RecordFormat,
) -> Result<(), GenError> {
    let encoded = match format {
        RecordFormat::Json => serde_json::to_string_pretty(record)
            .map_err(|e| GenError::Serialization(e.to_string()))?,
        RecordFormat::Yaml => {
            serde_yaml::to_string(record).map_err(|e| GenError::Serialization(e.to_string()))?
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, encoded)?;
    Ok(())
}

/// Read a record written by [`save_record`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_record(path: &Path) -> Result<SampleRecord, GenError> {
    let content = std::fs::read_to_string(path)?;
    match RecordFormat::for_path(path) {
        RecordFormat::Json => serde_json::from_str(&content).map_err(|e| {
            GenError::Serialization(format!("Failed to parse {}: {e}", path.display()))
        }),
        RecordFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| {
            GenError::Serialization(format!("Failed to parse {}: {e}", path.display()))
        }),
    }
}

/// Save a grayscale preview of `z`: one pixel row per sample, values
/// min-max scaled to the full 8-bit range.
///
/// # Errors
///
/// Returns an error if the image cannot be encoded or written.
pub fn save_preview(z: &Array2<f32>, path: &Path) -> Result<(), GenError> {
    let (rows, cols) = z.dim();
    let width = u32::try_from(cols).map_err(|e| GenError::Image(e.to_string()))?;
    let height = u32::try_from(rows).map_err(|e| GenError::Image(e.to_string()))?;

    let min = z.iter().copied().fold(f32::INFINITY, f32::min);
    let max = z.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = if max > min { max - min } else { 1.0 };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let img = image::GrayImage::from_fn(width, height, |x, y| {
        let v = z[[y as usize, x as usize]];
        image::Luma([((v - min) / range * 255.0).round().clamp(0.0, 255.0) as u8])
    });

    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| GenError::Image(format!("Failed to save preview: {e}")))
}

/// Generate an output filename from the noise type and size.
///
/// Sanitizes the noise type to kebab-case, appends the size and a UTC
/// timestamp with microsecond resolution, and adds the extension for `format`.
#[must_use]
pub fn auto_filename(z_type: &str, z_size: usize, format: RecordFormat) -> String {
    let sanitized = sanitize_for_filename(z_type, 40);
    let timestamp = Utc::now().format("%Y%m%dT%H%M%S%6f");
    format!("{sanitized}-{z_size}-{timestamp}.{}", format.extension())
}

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // no leading hyphen

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "noise".to_string()
    } else {
        result
    }
}

/// Resolve the output path: use explicit path or auto-generate.
#[must_use]
pub fn resolve_output_path(
    explicit: Option<&str>,
    z_type: &str,
    z_size: usize,
    format: RecordFormat,
) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(z_type, z_size, format)),
    }
}
