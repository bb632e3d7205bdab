//! Best-effort metadata extractors for gdindex.
//!
//! Every extractor is a line/pattern scan over decoded text rather than a
//! parser. Malformed input never fails: it yields an empty or partial
//! record. Extracted symbols are therefore hints, not a verified parse.
//!
//! - **Scripts** - `class_name`, `extends`, signals, exports, functions,
//!   `tr()` literals and `load`/`preload` dependency edges
//! - **Scenes** - nodes, signal connections and script assignments
//! - **Translations** - gettext `msgid`s and spreadsheet keys
//! - **Notes** - TODO / FIXME / HACK markers in any text file
//!
//! ```rust
//! use gdindex_core::ContentKind;
//! use gdindex_extract::{decode_text, extract_file};
//!
//! let decoded = decode_text(b"class_name Foo\nextends \"res://base.gd\"\n");
//! let extraction = extract_file("foo.gd", ContentKind::Script, &decoded.text);
//!
//! let symbols = extraction.symbols.unwrap();
//! assert_eq!(symbols.class_name.as_deref(), Some("Foo"));
//! assert_eq!(extraction.imports.unwrap().to, vec!["res://base.gd"]);
//! ```

mod i18n;
mod scene;
mod script;
mod text;
mod todo;

pub use i18n::{
    I18nFormat, extract_catalog_strings, extract_i18n_strings, extract_spreadsheet_strings,
    script_strings,
};
pub use scene::extract_scene;
pub use script::{extract_import_edge, extract_load_paths, extract_script_symbols};
pub use text::{DecodedText, decode_text};
pub use todo::scan_todos;

use gdindex_core::{ContentKind, ImportEdge, SceneGraph, ScriptSymbols, StringEntry, TodoEntry};

/// Everything extracted from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtraction {
    /// Present for script files.
    pub symbols: Option<ScriptSymbols>,
    /// Present for scene files.
    pub scene: Option<SceneGraph>,
    pub strings: Vec<StringEntry>,
    /// Present for scripts that reference at least one other file.
    pub imports: Option<ImportEdge>,
    pub todos: Vec<TodoEntry>,
}

impl FileExtraction {
    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_none()
            && self.scene.is_none()
            && self.strings.is_empty()
            && self.imports.is_none()
            && self.todos.is_empty()
    }
}

/// Run every extractor that applies to `kind` over `text`.
///
/// Empty text (an empty or undecodable file) extracts nothing.
pub fn extract_file(path: &str, kind: ContentKind, text: &str) -> FileExtraction {
    let mut extraction = FileExtraction::default();
    if text.is_empty() {
        return extraction;
    }

    extraction.todos = scan_todos(path, text);

    match kind {
        ContentKind::Script => {
            let symbols = extract_script_symbols(path, text);
            extraction.imports = extract_import_edge(&symbols, text);
            extraction.strings = script_strings(&symbols);
            extraction.symbols = Some(symbols);
        }
        ContentKind::Scene => {
            extraction.scene = Some(extract_scene(path, text));
        }
        ContentKind::I18n => {
            extraction.strings = extract_i18n_strings(path, text);
        }
        _ => {}
    }

    extraction
}
