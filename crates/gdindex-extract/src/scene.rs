//! Scene graph extraction from text scene files.
//!
//! Section headers are read attribute by attribute, so attribute order and
//! extra attributes such as `instance=` or `flags=` don't matter.

use std::sync::LazyLock;

use regex::Regex;

use gdindex_core::{Connection, SceneGraph, SceneNode};

static NODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\[node\b([^\r\n]*)").expect("valid node regex")
});
static CONNECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\[connection\b([^\r\n]*)")
        .expect("valid connection regex")
});
static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^script[ \t]*=[ \t]*([^\r\n]*?)[ \t]*\r?$")
        .expect("valid script regex")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_]*)="((?:[^"\\]|\\.)*)""#)
        .expect("valid attribute regex")
});

/// Extract nodes, connections and script assignments, in file order.
pub fn extract_scene(file: &str, text: &str) -> SceneGraph {
    let mut scene = SceneGraph::new(file);

    scene.nodes = NODE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let attrs = HeaderAttrs::parse(caps.get(1).map_or("", |m| m.as_str()));
            Some(SceneNode {
                name: attrs.get("name")?.to_string(),
                node_type: attrs.get("type").unwrap_or_default().to_string(),
                parent: attrs.get("parent").unwrap_or_default().to_string(),
            })
        })
        .collect();

    scene.connections = CONNECTION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let attrs = HeaderAttrs::parse(caps.get(1).map_or("", |m| m.as_str()));
            Some(Connection {
                signal: attrs.get("signal")?.to_string(),
                from: attrs.get("from")?.to_string(),
                to: attrs.get("to")?.to_string(),
                method: attrs.get("method")?.to_string(),
            })
        })
        .collect();

    scene.scripts_raw = SCRIPT_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|raw| !raw.is_empty())
        .collect();

    scene
}

/// Quoted `key="value"` pairs of one section header.
struct HeaderAttrs<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> HeaderAttrs<'a> {
    fn parse(header: &'a str) -> Self {
        let pairs = ATTR_RE
            .captures_iter(header)
            .filter_map(|caps| {
                let key = caps.get(1)?.as_str();
                let value = caps.get(2)?.as_str();
                Some((key, value))
            })
            .collect();
        Self { pairs }
    }

    /// First value for `key`.
    fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN_SCENE: &str = r#"[gd_scene load_steps=3 format=3 uid="uid://c8x"]

[ext_resource type="Script" path="res://main.gd" id="1_main"]
[ext_resource type="PackedScene" uid="uid://b2" path="res://player.tscn" id="2_player"]

[node name="Root" type="Node2D"]
script = ExtResource("1_main")

[node name="Button" type="Button" parent="."]
offset_right = 8.0

[node name="Player" parent="." groups=["actors"] instance=ExtResource("2_player")]

[node type="Label" parent="Button" name="Caption"]

[connection signal="pressed" from="Root/Button" to="Root" method="_on_pressed"]
[connection signal="died" from="Player" to="." method="_on_player_died" flags=3]
"#;

    #[test]
    fn test_extract_nodes() {
        let scene = extract_scene("main.tscn", MAIN_SCENE);
        let names: Vec<&str> = scene.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Button", "Player", "Caption"]);

        assert_eq!(
            scene.nodes[0],
            SceneNode {
                name: "Root".to_string(),
                node_type: "Node2D".to_string(),
                parent: String::new(),
            }
        );
        assert_eq!(scene.nodes[2].node_type, "");
        assert_eq!(scene.nodes[2].parent, ".");
        assert_eq!(scene.nodes[3].node_type, "Label");
        assert_eq!(scene.nodes[3].parent, "Button");
    }

    #[test]
    fn test_extract_connections() {
        let scene = extract_scene("main.tscn", MAIN_SCENE);
        assert_eq!(scene.connections.len(), 2);
        assert_eq!(
            scene.connections[0],
            Connection {
                signal: "pressed".to_string(),
                from: "Root/Button".to_string(),
                to: "Root".to_string(),
                method: "_on_pressed".to_string(),
            }
        );
        assert_eq!(scene.connections[1].method, "_on_player_died");
    }

    #[test]
    fn test_extract_script_refs() {
        let scene = extract_scene("main.tscn", MAIN_SCENE);
        assert_eq!(scene.scripts_raw, vec![r#"ExtResource("1_main")"#]);
    }

    #[test]
    fn test_incomplete_headers_are_skipped() {
        let text = "[node type=\"Node\"]\n[connection signal=\"x\" from=\"A\"]\n";
        let scene = extract_scene("broken.tscn", text);
        assert!(scene.nodes.is_empty());
        assert!(scene.connections.is_empty());
    }

    #[test]
    fn test_crlf_scene() {
        let text = "[node name=\"Root\" type=\"Control\"]\r\nscript = ExtResource(\"1\")\r\n";
        let scene = extract_scene("win.tscn", text);
        assert_eq!(scene.nodes[0].node_type, "Control");
        assert_eq!(scene.scripts_raw, vec!["ExtResource(\"1\")"]);
    }
}
