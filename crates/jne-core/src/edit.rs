// Editable snippets for a single node.
// - `normalize` projects a node's primitive fields to pretty JSON text.
// - `apply_edit` merges an edited snippet back into the full document text.
// Array/object fields never appear in a snippet and are never touched by a
// merge; keys outside the node's original primitive set are ignored.
use crate::error::{Error, Result};
use crate::node::{NodeField, NodeSnapshot};
use crate::path::{read_at_mut, write_at};
use serde_json::{Map, Value};

/// Pretty JSON with 2-space indentation.
pub fn to_pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Serialize(e.to_string()))
}

/// True when edits merge key by key rather than replacing a bare value.
pub fn is_object_shaped(fields: &[NodeField]) -> bool {
    fields.iter().any(|f| f.is_primitive() && f.key.is_some())
}

pub fn normalize(fields: &[NodeField]) -> Result<String> {
    let primitives: Vec<&NodeField> = fields.iter().filter(|f| f.is_primitive()).collect();
    match primitives.as_slice() {
        [] => Ok("{}".to_string()),
        [only] if only.key.is_none() => to_pretty(only.value.as_ref().unwrap_or(&Value::Null)),
        _ => {
            let mut map = Map::new();
            for f in primitives {
                if let Some(key) = &f.key {
                    map.insert(key.clone(), f.value.clone().unwrap_or(Value::Null));
                }
            }
            to_pretty(&Value::Object(map))
        }
    }
}

/// Merges `edited` into `document_text` at the node's path and returns the new
/// document text. Nothing is produced unless every step succeeds.
pub fn apply_edit(document_text: &str, node: &NodeSnapshot, edited: &str) -> Result<String> {
    let mut doc: Value = serde_json::from_str(document_text)
        .map_err(|e| Error::InvalidDocument(e.to_string()))?;
    let object_shaped = is_object_shaped(&node.fields);
    let edited_value = if edited.trim().is_empty() {
        if object_shaped {
            Value::Object(Map::new())
        } else {
            Value::Null
        }
    } else {
        serde_json::from_str(edited).map_err(|e| Error::InvalidSnippet(e.to_string()))?
    };
    let path = node.path.as_deref().ok_or(Error::PathResolution)?;

    if object_shaped {
        let Value::Object(edited_map) = edited_value else {
            return Err(Error::TargetNotObject(
                "Edited value must be a JSON object".into(),
            ));
        };
        let target = read_at_mut(&mut doc, path)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| Error::TargetNotObject("Selected node is not a JSON object".into()))?;
        for key in node.primitive_fields().filter_map(|f| f.key.as_deref()) {
            if let Some(v) = edited_map.get(key) {
                target.insert(key.to_string(), v.clone());
            }
        }
    } else {
        doc = write_at(doc, path, edited_value)?;
    }
    to_pretty(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::FieldKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn keyed(k: &str, v: Value) -> NodeField {
        NodeField::primitive(Some(k), v)
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn to_pretty_indents_nested_values() {
        let text = to_pretty(&json!({"a": [1, {"b": null}]})).unwrap();
        assert_eq!(text, "{\n  \"a\": [\n    1,\n    {\n      \"b\": null\n    }\n  ]\n}");
        assert_eq!(to_pretty(&json!("s")).unwrap(), "\"s\"");
    }

    #[test]
    fn normalize_empty_is_empty_object() {
        assert_eq!(normalize(&[]).unwrap(), "{}");
        assert_eq!(
            normalize(&[NodeField::structural("list", FieldKind::Array)]).unwrap(),
            "{}"
        );
    }

    #[test]
    fn normalize_bare_value() {
        assert_eq!(normalize(&[NodeField::primitive(None, json!("x"))]).unwrap(), "\"x\"");
        assert_eq!(normalize(&[NodeField::primitive(None, json!(1.5))]).unwrap(), "1.5");
    }

    #[test]
    fn normalize_object_uses_two_space_indent() {
        let text = normalize(&[
            keyed("a", json!(1)),
            NodeField::structural("c", FieldKind::Object),
            keyed("b", json!(2)),
        ])
        .unwrap();
        assert_eq!(text, "{\n  \"a\": 1,\n  \"b\": 2\n}");
    }

    #[test]
    fn normalize_single_keyed_field_stays_object() {
        assert_eq!(normalize(&[keyed("a", json!(null))]).unwrap(), "{\n  \"a\": null\n}");
    }

    #[test]
    fn normalize_later_duplicate_wins() {
        let text = normalize(&[keyed("a", json!(1)), keyed("a", json!(2))]).unwrap();
        assert_eq!(parse(&text), json!({"a": 2}));
    }

    #[test]
    fn object_shape_detection() {
        assert!(!is_object_shaped(&[]));
        assert!(!is_object_shaped(&[NodeField::primitive(None, json!(1))]));
        assert!(!is_object_shaped(&[NodeField::structural("a", FieldKind::Array)]));
        assert!(is_object_shaped(&[keyed("a", json!(1))]));
    }

    fn object_node(path: Vec<crate::path::PathSegment>) -> NodeSnapshot {
        NodeSnapshot::new(
            path,
            vec![
                keyed("a", json!(1)),
                keyed("b", json!(2)),
                NodeField::structural("c", FieldKind::Array),
            ],
        )
    }

    #[test]
    fn partial_object_edit_leaves_other_fields() {
        let out = apply_edit(r#"{"a":1,"b":2,"c":[1,2]}"#, &object_node(vec![]), r#"{"a":9}"#)
            .unwrap();
        assert_eq!(parse(&out), json!({"a": 9, "b": 2, "c": [1, 2]}));
        assert_eq!(out, "{\n  \"a\": 9,\n  \"b\": 2,\n  \"c\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn object_edit_ignores_unknown_and_structural_keys() {
        let out = apply_edit(
            r#"{"a":1,"b":2,"c":[1,2]}"#,
            &object_node(vec![]),
            r#"{"b":"two","c":"gone","z":true}"#,
        )
        .unwrap();
        assert_eq!(parse(&out), json!({"a": 1, "b": "two", "c": [1, 2]}));
    }

    #[test]
    fn object_edit_at_nested_path() {
        let doc = r#"{"users":[{"a":1,"b":2,"c":[]},{"a":5}]}"#;
        let node = object_node(vec!["users".into(), 0usize.into()]);
        let out = apply_edit(doc, &node, r#"{"a":null,"b":false}"#).unwrap();
        assert_eq!(
            parse(&out),
            json!({"users": [{"a": null, "b": false, "c": []}, {"a": 5}]})
        );
    }

    #[test]
    fn bare_edit_replaces_array_element() {
        let node = NodeSnapshot::new(
            vec!["items".into(), 0usize.into()],
            vec![NodeField::primitive(None, json!("old"))],
        );
        let out = apply_edit(r#"{"items":["old",2]}"#, &node, "\"new\"").unwrap();
        assert_eq!(parse(&out), json!({"items": ["new", 2]}));
        let out = apply_edit(r#"{"items":["old",2]}"#, &node, "42").unwrap();
        assert_eq!(parse(&out), json!({"items": [42, 2]}));
    }

    #[test]
    fn blank_snippet_defaults_by_shape() {
        let bare = NodeSnapshot::new(
            vec![0usize.into()],
            vec![NodeField::primitive(None, json!("x"))],
        );
        let out = apply_edit(r#"["x"]"#, &bare, "  ").unwrap();
        assert_eq!(parse(&out), json!([null]));
        let out = apply_edit(r#"{"a":1,"b":2,"c":[]}"#, &object_node(vec![]), "").unwrap();
        assert_eq!(parse(&out), json!({"a": 1, "b": 2, "c": []}));
    }

    #[test]
    fn malformed_snippet_is_user_error() {
        let err = apply_edit(r#"{"a":1}"#, &object_node(vec![]), "{a:").unwrap_err();
        assert!(matches!(err, Error::InvalidSnippet(_)));
        assert!(err.is_user_error());
    }

    #[test]
    fn malformed_document_is_not_user_error() {
        let err = apply_edit("{oops", &object_node(vec![]), "{}").unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
        assert!(!err.is_user_error());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let err = apply_edit(r#"{"a":1}"#, &object_node(vec![]), "[1]").unwrap_err();
        assert!(matches!(err, Error::TargetNotObject(_)));
        let err = apply_edit(r#"[1,2]"#, &object_node(vec![]), r#"{"a":2}"#).unwrap_err();
        assert!(matches!(err, Error::TargetNotObject(_)));
        let err = apply_edit(r#"{"x":1}"#, &object_node(vec!["gone".into()]), r#"{"a":2}"#)
            .unwrap_err();
        assert!(matches!(err, Error::TargetNotObject(_)));
    }

    #[test]
    fn bare_edit_under_vanished_parent_fails() {
        let node = NodeSnapshot::new(
            vec!["items".into(), 0usize.into()],
            vec![NodeField::primitive(None, json!("old"))],
        );
        let err = apply_edit(r#"{"items":null}"#, &node, "1").unwrap_err();
        assert!(matches!(err, Error::PathResolution));
    }

    #[test]
    fn node_without_path_fails() {
        let mut node = object_node(vec![]);
        node.path = None;
        let err = apply_edit(r#"{"a":1}"#, &node, r#"{"a":2}"#).unwrap_err();
        assert!(matches!(err, Error::PathResolution));
    }
}
