//! Content classification by file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Content kind of an indexed file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
    /// GDScript source (`.gd`).
    Script,
    /// Text scene description (`.tscn`, `.escn`).
    Scene,
    /// Text resource (`.tres`).
    Resource,
    /// Documentation (`.md`, `.markdown`).
    Doc,
    /// Generic structured data (`.json`).
    Data,
    /// Translation catalog or spreadsheet (`.po`, `.pot`, `.csv`).
    I18n,
    /// Key/value configuration (`.cfg`, `.ini`, `.yml`, `.yaml`, `.toml`, `.godot`).
    Config,
    /// Anything else.
    Other,
}

impl ContentKind {
    /// Classify a path by its extension, case-insensitively.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return Self::Other;
        };

        match ext.to_ascii_lowercase().as_str() {
            "gd" => Self::Script,
            "tscn" | "escn" => Self::Scene,
            "tres" => Self::Resource,
            "md" | "markdown" => Self::Doc,
            "json" => Self::Data,
            "po" | "pot" | "csv" => Self::I18n,
            "cfg" | "ini" | "yml" | "yaml" | "toml" | "godot" => Self::Config,
            _ => Self::Other,
        }
    }
}
