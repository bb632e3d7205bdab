//! Markdown digest of an indexing run.

use chrono::{DateTime, SecondsFormat, Utc};
use itertools::Itertools;

use gdindex_core::{ContentKind, DEFAULT_IGNORES_VERSION, IndexWarning};

use crate::aggregate::IndexCollections;

/// Named classes listed in the report.
pub const MAX_CLASS_ENTRIES: usize = 50;

/// TODO entries listed in the report.
pub const MAX_TODO_ENTRIES: usize = 20;

/// Render the run digest.
pub fn render_report(
    collections: &IndexCollections,
    generated_at: DateTime<Utc>,
    warnings: &[IndexWarning],
) -> String {
    let counts = collections.manifest.iter().counts_by(|m| m.kind);
    let count = |kind: ContentKind| counts.get(&kind).copied().unwrap_or(0);

    let mut lines = vec![
        format!(
            "# Index Report - {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        String::new(),
        format!("- Files indexed: {}", collections.file_count()),
        format!(
            "- GDScript files: {}, Scenes: {}, Docs/MD: {}",
            count(ContentKind::Script),
            count(ContentKind::Scene),
            count(ContentKind::Doc)
        ),
        format!(
            "- Total size: {}",
            humansize::format_size(collections.total_bytes(), humansize::BINARY)
        ),
        format!("- Undecodable files: {}", collections.undecodable_count()),
        format!("- Warnings: {}", warnings.len()),
        format!("- Default ignores: v{DEFAULT_IGNORES_VERSION}"),
        String::new(),
        "## Top-level symbols (class_name)".to_string(),
    ];

    lines.extend(
        collections
            .named_classes()
            .take(MAX_CLASS_ENTRIES)
            .map(|symbols| {
                format!(
                    "- `{}` (extends: {}) - file: {}",
                    symbols.class_name.as_deref().unwrap_or_default(),
                    symbols.extends.as_deref().unwrap_or("none"),
                    symbols.file
                )
            }),
    );
    lines.push(String::new());

    lines.push("## TODO/FIXME samples".to_string());
    lines.extend(
        collections
            .todos
            .iter()
            .take(MAX_TODO_ENTRIES)
            .map(|todo| format!("- {}: {} {}", todo.path, todo.tag, todo.note)),
    );

    let mut report = lines.join("\n");
    report.push('\n');
    report
}
