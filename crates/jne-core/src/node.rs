use crate::path::{Path, to_pointer};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Primitive,
    Array,
    Object,
}

impl FieldKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => FieldKind::Array,
            Value::Object(_) => FieldKind::Object,
            _ => FieldKind::Primitive,
        }
    }
}

/// One displayed row of a node. `key` is `None` for a bare value such as an
/// array element; `value` is only carried for primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeField {
    pub key: Option<String>,
    pub kind: FieldKind,
    pub value: Option<Value>,
}

impl NodeField {
    pub fn primitive(key: Option<&str>, value: Value) -> Self {
        Self {
            key: key.map(str::to_string),
            kind: FieldKind::Primitive,
            value: Some(value),
        }
    }

    pub fn structural(key: &str, kind: FieldKind) -> Self {
        Self {
            key: Some(key.to_string()),
            kind,
            value: None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.kind == FieldKind::Primitive
    }
}

/// A node as the graph presents it. Read-only input to edit sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub id: String,
    pub fields: Vec<NodeField>,
    pub path: Option<Path>,
}

impl NodeSnapshot {
    pub fn new(path: Path, fields: Vec<NodeField>) -> Self {
        Self {
            id: to_pointer(&path),
            fields,
            path: Some(path),
        }
    }

    pub fn primitive_fields(&self) -> impl Iterator<Item = &NodeField> {
        self.fields.iter().filter(|f| f.is_primitive())
    }

    pub fn has_primitive_fields(&self) -> bool {
        self.primitive_fields().next().is_some()
    }
}

/// Rows for a value: members of an object, or a single unkeyed row for a
/// primitive. Arrays have no rows of their own.
pub fn fields_of(value: &Value) -> Vec<NodeField> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| match FieldKind::of(v) {
                FieldKind::Primitive => NodeField::primitive(Some(k.as_str()), v.clone()),
                kind => NodeField::structural(k, kind),
            })
            .collect(),
        Value::Array(_) => Vec::new(),
        v => vec![NodeField::primitive(None, v.clone())],
    }
}
