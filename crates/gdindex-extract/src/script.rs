//! GDScript symbol and dependency extraction.
//!
//! Each declaration is matched independently with a line-anchored pattern,
//! so partial or syntactically broken scripts still yield whatever can be
//! recognised. For `class_name` and `extends` only the first match counts.

use std::sync::LazyLock;

use compact_str::CompactString;
use regex::Regex;

use gdindex_core::{ImportEdge, ScriptSymbols};

static CLASS_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*class_name[ \t]+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid class_name regex")
});
static EXTENDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*(?:class_name[ \t]+[A-Za-z_][A-Za-z0-9_]*[ \t]+)?extends[ \t]+("[^"\r\n]*"|'[^'\r\n]*'|[^\s#]+)"#,
    )
    .expect("valid extends regex")
});
static SIGNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*signal[ \t]+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid signal regex")
});
static EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:@export(_[A-Za-z0-9_]+)?\b(?:\([^)]*\))?\s*(?:var\s+)?|export(?:\([^)]*\))?[ \t]+var[ \t]+)([A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("valid export regex")
});
static FUNC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:static[ \t]+)?func[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*\(")
        .expect("valid func regex")
});
static TR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\btr\(\s*"((?:[^"\\]|\\.)*)"\s*[,)]"#)
        .expect("valid tr regex")
});
static LOAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:pre)?load\(\s*"([^"]+)"\s*\)"#)
        .expect("valid load regex")
});

/// Annotations in the `@export_*` family that group fields rather than export one.
const LAYOUT_ANNOTATIONS: &[&str] = &["_group", "_subgroup", "_category"];

/// Extract declared symbols from script text.
pub fn extract_script_symbols(file: &str, text: &str) -> ScriptSymbols {
    let mut symbols = ScriptSymbols::new(file);

    symbols.class_name = CLASS_NAME_RE
        .captures(text)
        .map(|caps| caps[1].to_string());

    symbols.extends = EXTENDS_RE
        .captures(text)
        .map(|caps| unquote(&caps[1]).to_string())
        .filter(|ext| !ext.is_empty());

    symbols.signals = capture_names(&SIGNAL_RE, text);
    symbols.functions = capture_names(&FUNC_RE, text);

    symbols.exports = EXPORT_RE
        .captures_iter(text)
        .filter(|caps| {
            caps.get(1)
                .is_none_or(|suffix| !LAYOUT_ANNOTATIONS.contains(&suffix.as_str()))
        })
        .map(|caps| CompactString::new(&caps[2]))
        .collect();

    symbols.tr_strings = TR_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect();

    symbols
}

/// Paths passed to `load("...")` and `preload("...")`, in order of appearance.
pub fn extract_load_paths(text: &str) -> Vec<String> {
    LOAD_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Build the dependency edge for a script.
///
/// Targets are every load path followed by the base declaration when it
/// names a file. Returns `None` when the script references nothing.
pub fn extract_import_edge(symbols: &ScriptSymbols, text: &str) -> Option<ImportEdge> {
    let mut targets = extract_load_paths(text);
    if let Some(base) = symbols.extends_path() {
        targets.push(base.to_string());
    }

    (!targets.is_empty()).then(|| ImportEdge {
        from: symbols.file.clone(),
        to: targets,
    })
}

fn capture_names(re: &Regex, text: &str) -> Vec<CompactString> {
    re.captures_iter(text)
        .map(|caps| CompactString::new(&caps[1]))
        .collect()
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: &str = r#"class_name Player
extends CharacterBody2D

signal died
signal health_changed(old_value, new_value)

@export var speed := 200.0
@export_range(0, 100) var max_health: int = 100
@export_group("Combat")
@export
var damage := 5

var _hp := 100

func _ready() -> void:
    var scene = preload("res://scenes/bullet.tscn")
    $Label.text = tr("PLAYER_READY")

static func create() -> Player:
    return load("res://actors/player.tscn").instantiate()

func _on_hit(amount):
    print(tr( "HIT_TAKEN" , "combat"))
"#;

    #[test]
    fn test_extract_player_symbols() {
        let symbols = extract_script_symbols("actors/player.gd", PLAYER);

        assert_eq!(symbols.file, "actors/player.gd");
        assert_eq!(symbols.class_name.as_deref(), Some("Player"));
        assert_eq!(symbols.extends.as_deref(), Some("CharacterBody2D"));
        assert_eq!(symbols.signals, vec!["died", "health_changed"]);
        assert_eq!(symbols.exports, vec!["speed", "max_health", "damage"]);
        assert_eq!(symbols.functions, vec!["_ready", "create", "_on_hit"]);
        assert_eq!(symbols.tr_strings, vec!["PLAYER_READY", "HIT_TAKEN"]);
    }

    #[test]
    fn test_first_class_name_wins() {
        let symbols = extract_script_symbols("a.gd", "class_name First\nclass_name Second\n");
        assert_eq!(symbols.class_name.as_deref(), Some("First"));
    }

    #[test]
    fn test_missing_declarations_stay_empty() {
        let symbols = extract_script_symbols("empty.gd", "# just a comment\n");
        assert_eq!(symbols.class_name, None);
        assert_eq!(symbols.extends, None);
        assert!(symbols.signals.is_empty());
        assert!(symbols.exports.is_empty());
        assert!(symbols.functions.is_empty());
        assert!(symbols.tr_strings.is_empty());
    }

    #[test]
    fn test_quoted_extends_and_preload_edge() {
        let text =
            "class_name Foo\nextends \"res://base.gd\"\nconst D = preload(\"res://data.tres\")\n";
        let symbols = extract_script_symbols("foo.gd", text);
        assert_eq!(symbols.class_name.as_deref(), Some("Foo"));
        assert_eq!(symbols.extends.as_deref(), Some("res://base.gd"));

        let edge = extract_import_edge(&symbols, text).unwrap();
        assert_eq!(edge.from, "foo.gd");
        assert_eq!(edge.to, vec!["res://data.tres", "res://base.gd"]);
    }

    #[test]
    fn test_inline_class_name_extends() {
        let symbols = extract_script_symbols("a.gd", "class_name Enemy extends 'res://actor.gd'\n");
        assert_eq!(symbols.class_name.as_deref(), Some("Enemy"));
        assert_eq!(symbols.extends.as_deref(), Some("res://actor.gd"));
    }

    #[test]
    fn test_class_base_is_not_an_edge() {
        let text = "extends Node2D\n";
        let symbols = extract_script_symbols("a.gd", text);
        assert_eq!(extract_import_edge(&symbols, text), None);
    }

    #[test]
    fn test_godot3_export_syntax() {
        let symbols =
            extract_script_symbols("a.gd", "export(int) var lives = 3\nexport var name = \"x\"\n");
        assert_eq!(symbols.exports, vec!["lives", "name"]);
    }

    #[test]
    fn test_load_paths_in_order() {
        let text = r#"var a = load("res://a.tres")
var b = preload( "res://b.tscn" )
var c = ResourceLoader.load("res://c.gd")
"#;
        assert_eq!(
            extract_load_paths(text),
            vec!["res://a.tres", "res://b.tscn", "res://c.gd"]
        );
    }

    #[test]
    fn test_non_ascii_tr_literal() {
        let symbols = extract_script_symbols("a.gd", "func f():\n    tr(\"Démarrer\")\n");
        assert_eq!(symbols.tr_strings, vec!["Démarrer"]);
    }
}
