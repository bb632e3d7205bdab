//! Records produced by an indexing run.
//!
//! Every record refers to files by their forward-slash path relative to the
//! indexed root. Records are created once per file and never mutated after
//! they are handed to the aggregator.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::kind::ContentKind;

/// BLAKE3 digest of a file's raw bytes.
///
/// Serialized as a lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Create a new digest from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the digest as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 64 || !hex.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<ContentDigest> for String {
    fn from(digest: ContentDigest) -> Self {
        digest.to_hex()
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid content digest: {value}"))
    }
}

/// How a file's bytes were turned into text for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DecodeStatus {
    /// Valid UTF-8.
    Utf8,
    /// UTF-16 with a byte-order mark.
    Utf16,
    /// Zero-length file.
    Empty,
    /// No supported encoding matched; extraction was skipped.
    Undecodable,
    /// Too large to decode; hashed only.
    Skipped,
}

impl DecodeStatus {
    /// Check if text is available for extraction.
    pub fn has_text(&self) -> bool {
        matches!(self, Self::Utf8 | Self::Utf16)
    }
}

/// One indexed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path relative to the indexed root.
    pub path: String,
    /// Content kind from the file extension.
    pub kind: ContentKind,
    /// Size in bytes.
    pub size: u64,
    /// Digest of the raw bytes.
    pub digest: ContentDigest,
    /// Text decoding outcome.
    pub decode: DecodeStatus,
}

/// Symbols declared by a script file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSymbols {
    pub file: String,
    /// First `class_name` statement, if any.
    pub class_name: Option<String>,
    /// First `extends` target, quotes stripped.
    pub extends: Option<String>,
    pub signals: Vec<CompactString>,
    pub exports: Vec<CompactString>,
    pub functions: Vec<CompactString>,
    /// Literals passed to `tr(...)`.
    pub tr_strings: Vec<String>,
}

impl ScriptSymbols {
    /// Create an empty symbol record for a file.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Check if the base declaration refers to another file rather than a class.
    pub fn extends_path(&self) -> Option<&str> {
        self.extends
            .as_deref()
            .filter(|ext| ext.ends_with(".gd") || ext.contains('/'))
    }
}

/// A node declared in a scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    /// Node class, empty for instanced or inherited nodes.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Parent path, empty for the scene root.
    pub parent: String,
}

/// A signal connection declared in a scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub signal: String,
    pub from: String,
    pub to: String,
    pub method: String,
}

/// Structure of one scene file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneGraph {
    pub file: String,
    pub nodes: Vec<SceneNode>,
    pub connections: Vec<Connection>,
    /// Raw right-hand sides of `script = ...` lines.
    pub scripts_raw: Vec<String>,
}

impl SceneGraph {
    /// Create an empty scene record for a file.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }
}

/// Where a localisation string was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StringOrigin {
    /// A `tr("...")` call in a script.
    Script,
    /// A `msgid` entry in a gettext catalog.
    Catalog,
    /// The key column of a translation spreadsheet.
    Spreadsheet,
}

/// A localisation string occurrence. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEntry {
    pub key: String,
    pub path: String,
    pub origin: StringOrigin,
}

impl StringEntry {
    pub fn new(key: impl Into<String>, path: impl Into<String>, origin: StringOrigin) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            origin,
        }
    }
}

/// Outgoing references of one script. Only emitted when `to` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEdge {
    pub from: String,
    pub to: Vec<String>,
}

/// Marker vocabulary recognised by the TODO scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum TodoTag {
    Todo,
    Fixme,
    Hack,
}

/// A TODO/FIXME/HACK note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoEntry {
    pub path: String,
    pub tag: TodoTag,
    /// Trimmed note text, at most [`TodoEntry::MAX_NOTE_CHARS`] characters.
    pub note: String,
}

impl TodoEntry {
    /// Maximum number of characters kept from a note.
    pub const MAX_NOTE_CHARS: usize = 200;

    /// Create an entry, trimming and truncating the note.
    pub fn new(path: impl Into<String>, tag: TodoTag, note: &str) -> Self {
        Self {
            path: path.into(),
            tag,
            note: note.trim().chars().take(Self::MAX_NOTE_CHARS).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_digest_hex_roundtrip() {
        let digest = ContentDigest::new([0xab; 32]);
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(ContentDigest::from_hex(&hex), Some(digest));
        assert_eq!(ContentDigest::from_hex("abc"), None);
        assert_eq!(ContentDigest::from_hex(&"zz".repeat(32)), None);
    }

    #[test]
    fn test_extends_path() {
        let mut symbols = ScriptSymbols::new("a.gd");
        assert_eq!(symbols.extends_path(), None);

        symbols.extends = Some("Node2D".into());
        assert_eq!(symbols.extends_path(), None);

        symbols.extends = Some("res://base.gd".into());
        assert_eq!(symbols.extends_path(), Some("res://base.gd"));

        symbols.extends = Some("res://actors/Base".into());
        assert_eq!(symbols.extends_path(), Some("res://actors/Base"));
    }

    #[test]
    fn test_decode_status_text_availability() {
        assert!(DecodeStatus::Utf8.has_text());
        assert!(DecodeStatus::Utf16.has_text());
        assert!(!DecodeStatus::Empty.has_text());
        assert!(!DecodeStatus::Undecodable.has_text());
        assert!(!DecodeStatus::Skipped.has_text());
        assert_eq!(
            serde_json::to_string(&DecodeStatus::Skipped).unwrap(),
            "\"skipped\""
        );
    }

    #[test]
    fn test_todo_tag_parsing() {
        assert_eq!(TodoTag::from_str("fixme").unwrap(), TodoTag::Fixme);
        assert_eq!(TodoTag::from_str("Hack").unwrap(), TodoTag::Hack);
        assert_eq!(TodoTag::Todo.to_string(), "TODO");
        assert!(TodoTag::from_str("NOTE").is_err());
    }

    #[test]
    fn test_todo_note_truncation() {
        let long = "x".repeat(300);
        let entry = TodoEntry::new("a.txt", TodoTag::Todo, &format!("  {long}  "));
        assert_eq!(entry.note.chars().count(), TodoEntry::MAX_NOTE_CHARS);

        let accented = "é".repeat(250);
        let entry = TodoEntry::new("a.txt", TodoTag::Todo, &accented);
        assert_eq!(entry.note, "é".repeat(200));
    }
}
