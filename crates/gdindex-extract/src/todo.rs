//! TODO / FIXME / HACK note scanning.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use gdindex_core::{TodoEntry, TodoTag};

static TODO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(todo|fixme|hack)\b[:\t -]+([^\r\n]*)")
        .expect("valid todo regex")
});

/// Every tagged note in `text`, in order of appearance.
pub fn scan_todos(path: &str, text: &str) -> Vec<TodoEntry> {
    TODO_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let tag = TodoTag::from_str(&caps[1]).ok()?;
            Some(TodoEntry::new(path, tag, &caps[2]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_tags_case_insensitively() {
        let text = "# TODO: spawn more enemies\n# fixme - clamp velocity\n// Hack  skip intro\n";
        let todos = scan_todos("enemy.gd", text);

        assert_eq!(todos.len(), 3);
        assert_eq!(todos[0].tag, TodoTag::Todo);
        assert_eq!(todos[0].note, "spawn more enemies");
        assert_eq!(todos[1].tag, TodoTag::Fixme);
        assert_eq!(todos[1].note, "clamp velocity");
        assert_eq!(todos[2].tag, TodoTag::Hack);
        assert_eq!(todos[2].note, "skip intro");
    }

    #[test]
    fn test_note_capped_at_200_chars() {
        let note: String = ('a'..='z').cycle().take(300).collect();
        let todos = scan_todos("notes.txt", &format!("TODO: {note}\n"));

        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].note, &note[..200]);
    }

    #[test]
    fn test_requires_separator_and_word_boundary() {
        let todos = scan_todos("a.md", "TODOs are tracked elsewhere\nmytodo: nope\nTODO\n");
        assert!(todos.is_empty());
    }

    #[test]
    fn test_note_does_not_span_lines() {
        let todos = scan_todos("a.md", "FIXME:\nnext line\n");
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].note, "");
    }
}
