// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order-preserving JSON emission for the settings tree.
//!
//! Keys are written in declaration order, which keeps the persisted document stable
//! across saves and diffable. The tree is first rendered into an explicit ordered
//! [`JsonNode`] and then written by a dedicated writer; leaf values are produced by
//! a caller-supplied rendering function, which lets the same traversal export
//! either full descriptors or bare values.

use crate::domain::form::FormElement;
use crate::domain::tree::{FormNode, SchemaTree};
use serde_json::Value;

/// Indentation used by [`pretty`].
const INDENT: &str = "  ";

/// An ordered JSON document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JsonNode {
    /// An object whose members are written in sequence order
    Object(Vec<(String, JsonNode)>),
    /// Pre-rendered JSON text, written verbatim
    Raw(String),
}

impl JsonNode {
    /// Appends a member to an object node. Has no effect on raw nodes.
    pub fn push(&mut self, key: impl Into<String>, value: JsonNode) {
        if let JsonNode::Object(members) = self {
            members.push((key.into(), value));
        }
    }

    /// Writes the node as compact JSON text.
    pub fn write(&self, out: &mut String) {
        match self {
            JsonNode::Raw(text) => out.push_str(text),
            JsonNode::Object(members) => {
                out.push('{');
                for (i, (key, value)) in members.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&quote(key));
                    out.push(':');
                    value.write(out);
                }
                out.push('}');
            }
        }
    }

    /// Returns the node as compact JSON text.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }
}

/// Formats a title or leaf name as a document key.
pub fn format_key(name: &str) -> String {
    name.replace(' ', "_")
}

fn quote(key: &str) -> String {
    Value::String(key.to_string()).to_string()
}

/// Renders one container and everything below it.
///
/// Declared forms may repeat a key within one object; only the first member with a
/// given key is written.
pub fn render_form<F>(tree: &SchemaTree, node: &FormNode, render: &F) -> JsonNode
where
    F: Fn(&FormElement) -> String,
{
    let mut members = Vec::with_capacity(node.elements().len() + node.forms().len());
    for id in node.elements() {
        if let Some(el) = tree.leaf(*id) {
            push_unique(&mut members, format_key(&el.name), || JsonNode::Raw(render(el)));
        }
    }
    for child in node.forms() {
        push_unique(&mut members, format_key(child.title()), || {
            render_form(tree, child, render)
        });
    }
    JsonNode::Object(members)
}

/// Renders the given top-level containers as a single object.
pub fn render_forms<'a, I, F>(tree: &SchemaTree, nodes: I, render: &F) -> JsonNode
where
    I: IntoIterator<Item = &'a FormNode>,
    F: Fn(&FormElement) -> String,
{
    let mut members = Vec::new();
    for node in nodes {
        push_unique(&mut members, format_key(node.title()), || {
            render_form(tree, node, render)
        });
    }
    JsonNode::Object(members)
}

fn push_unique<F>(members: &mut Vec<(String, JsonNode)>, key: String, node: F)
where
    F: FnOnce() -> JsonNode,
{
    if members.iter().any(|(k, _)| *k == key) {
        tracing::warn!("Skipping repeated key '{}' in settings document", key);
        return;
    }
    members.push((key, node()));
}

/// Renders the whole tree as a single object.
pub fn render_tree<F>(tree: &SchemaTree, render: &F) -> JsonNode
where
    F: Fn(&FormElement) -> String,
{
    render_forms(tree, tree.roots(), render)
}

/// Value renderer exporting the full leaf descriptor.
pub fn render_descriptor(el: &FormElement) -> String {
    match serde_json::to_string(el) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to render descriptor for '{}': {}", el.name, e);
            "null".to_string()
        }
    }
}

/// Value renderer exporting only the stored `value` (`null` when unset).
pub fn render_value(el: &FormElement) -> String {
    match &el.value {
        Some(value) => value.to_string(),
        None => "null".to_string(),
    }
}

/// Re-indents compact JSON text, keeping member order and string contents intact.
///
/// # Examples
///
/// ```
/// use formcfg::domain::serializer::pretty;
///
/// assert_eq!(pretty(r#"{"a":{"b":1},"c":[]}"#), "{\n  \"a\": {\n    \"b\": 1\n  },\n  \"c\": []\n}");
/// ```
pub fn pretty(compact: &str) -> String {
    let mut out = String::with_capacity(compact.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = compact.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                while chars.peek().is_some_and(|n| n.is_whitespace()) {
                    chars.next();
                }
                let close = if c == '{' { '}' } else { ']' };
                if chars.peek() == Some(&close) {
                    chars.next();
                    out.push(close);
                } else {
                    depth += 1;
                    newline(&mut out, depth);
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config_path::ConfigPath;
    use crate::domain::form::Form;

    fn sample() -> SchemaTree {
        SchemaTree::new(vec![
            Form::new("general")
                .element(FormElement::new("port", "number").with_default(8334))
                .element(FormElement::new("name", "text").with_value("demo")),
            Form::new("features").form(
                Form::new("share").element(FormElement::new("enable", "boolean").with_value(true)),
            ),
        ])
    }

    #[test]
    fn test_value_projection_keeps_declaration_order() {
        let tree = sample();
        let text = render_tree(&tree, &render_value).to_json();
        assert_eq!(
            text,
            r#"{"general":{"port":null,"name":"demo"},"features":{"share":{"enable":true}}}"#
        );
    }

    #[test]
    fn test_order_is_not_alphabetical() {
        let tree = SchemaTree::new(vec![
            Form::new("zeta").element(FormElement::bare("b")).element(FormElement::bare("a")),
            Form::new("alpha").element(FormElement::bare("z")),
        ]);
        let text = render_tree(&tree, &render_value).to_json();
        assert_eq!(text, r#"{"zeta":{"b":null,"a":null},"alpha":{"z":null}}"#);
    }

    #[test]
    fn test_leaves_before_children() {
        let tree = SchemaTree::new(vec![Form::new("mixed")
            .form(Form::new("child").element(FormElement::bare("inner")))
            .element(FormElement::bare("outer"))]);
        let text = render_tree(&tree, &render_value).to_json();
        assert_eq!(text, r#"{"mixed":{"outer":null,"child":{"inner":null}}}"#);
    }

    #[test]
    fn test_repeated_keys_keep_first() {
        let tree = SchemaTree::new(vec![
            Form::new("dup")
                .element(FormElement::bare("k"))
                .form(Form::new("k").element(FormElement::bare("inner"))),
            Form::new("dup").element(FormElement::bare("other")),
        ]);
        assert_eq!(
            render_tree(&tree, &render_value).to_json(),
            r#"{"dup":{"k":null}}"#
        );
    }

    #[test]
    fn test_empty_container_renders_empty_object() {
        let tree = SchemaTree::new(vec![Form::new("empty")]);
        assert_eq!(render_tree(&tree, &render_value).to_json(), r#"{"empty":{}}"#);
        assert_eq!(render_tree(&SchemaTree::default(), &render_value).to_json(), "{}");
    }

    #[test]
    fn test_spaces_become_underscores() {
        let tree = SchemaTree::new(vec![
            Form::new("my section").element(FormElement::bare("fork button"))
        ]);
        let text = render_tree(&tree, &render_value).to_json();
        assert_eq!(text, r#"{"my_section":{"fork_button":null}}"#);
    }

    #[test]
    fn test_keys_are_escaped() {
        let mut tree = SchemaTree::default();
        tree.resolve(&ConfigPath::from("quo\"te.back\\slash"));
        let text = render_tree(&tree, &render_value).to_json();
        assert_eq!(text, r#"{"quo\"te":{"back\\slash":null}}"#);
        assert!(serde_json::from_str::<Value>(&text).is_ok());
    }

    #[test]
    fn test_descriptor_projection() {
        let tree = SchemaTree::new(vec![
            Form::new("general").element(FormElement::new("port", "number").with_default(8334))
        ]);
        let text = render_tree(&tree, &render_descriptor).to_json();
        assert_eq!(
            text,
            r#"{"general":{"port":{"label":"port","type":"number","readonly":false,"default":8334,"value":null,"required":false}}}"#
        );
    }

    #[test]
    fn test_raw_splice() {
        let tree = sample();
        let mut doc = render_tree(&tree, &render_value);
        doc.push("connections", JsonNode::Raw(r#"[{"type":"ftp"}]"#.to_string()));
        let text = doc.to_json();
        assert!(text.ends_with(r#","connections":[{"type":"ftp"}]}"#));
    }

    #[test]
    fn test_pretty_round_trips_through_parser() {
        let compact = r#"{"a":{"b":[1,2,{"c":"x, y: {z}"}],"d":{}},"e":"\"q\""}"#;
        let pretty_text = pretty(compact);
        let a: Value = serde_json::from_str(compact).unwrap();
        let b: Value = serde_json::from_str(&pretty_text).unwrap();
        assert_eq!(a, b);
        assert!(pretty_text.contains("\"x, y: {z}\""));
        assert!(pretty_text.contains("\"d\": {}"));
    }

    #[test]
    fn test_pretty_layout() {
        assert_eq!(pretty("{}"), "{}");
        assert_eq!(pretty(r#"{"a":1,"b":[true]}"#), "{\n  \"a\": 1,\n  \"b\": [\n    true\n  ]\n}");
    }
}
