// Path-addressed access over serde_json::Value.
// - `read_at` walks a path and reports absence as `None`, never as an error.
// - `write_at` places a value at a path and fails when any step cannot be
//   resolved; intermediates are never created.
// - Segments index structurally: an index works on objects ("0") and a numeric
//   key works on arrays, so pointer-parsed paths address either container.
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

/// Location inside a document; the root is the empty path.
pub type Path = Vec<PathSegment>;

impl PathSegment {
    fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Key(k) => is_index_token(k).then(|| k.parse().ok()).flatten(),
        }
    }

    fn to_key(&self) -> String {
        match self {
            PathSegment::Index(i) => i.to_string(),
            PathSegment::Key(k) => k.clone(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Key(k) => f.write_str(k),
        }
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

impl From<&str> for PathSegment {
    fn from(k: &str) -> Self {
        PathSegment::Key(k.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(k: String) -> Self {
        PathSegment::Key(k)
    }
}

fn child<'a>(value: &'a Value, seg: &PathSegment) -> Option<&'a Value> {
    match value {
        Value::Array(items) => seg.as_index().and_then(|i| items.get(i)),
        Value::Object(map) => match seg {
            PathSegment::Key(k) => map.get(k),
            PathSegment::Index(i) => map.get(&i.to_string()),
        },
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, seg: &PathSegment) -> Option<&'a mut Value> {
    match value {
        Value::Array(items) => seg.as_index().and_then(move |i| items.get_mut(i)),
        Value::Object(map) => map.get_mut(&seg.to_key()),
        _ => None,
    }
}

/// Value at `path`, or `None` when traversal runs into a missing entry, a null
/// or a primitive before the path ends.
pub fn read_at<'a>(root: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    let mut cur = root;
    for seg in path {
        cur = child(cur, seg)?;
    }
    Some(cur)
}

/// Mutable counterpart of [`read_at`].
pub fn read_at_mut<'a>(root: &'a mut Value, path: &[PathSegment]) -> Option<&'a mut Value> {
    let mut cur = root;
    for seg in path {
        cur = child_mut(cur, seg)?;
    }
    Some(cur)
}

/// Places `value` at `path` inside `root` and returns the mutated root.
///
/// An empty path replaces the whole document. Every intermediate must exist and
/// be non-null, and the final container must be an object or array; otherwise
/// [`Error::PathResolution`] is returned. Array writes replace an existing
/// element or append at exactly `len`.
pub fn write_at(mut root: Value, path: &[PathSegment], value: Value) -> Result<Value> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(value);
    };
    let mut cur = &mut root;
    for seg in parents {
        cur = match child_mut(cur, seg) {
            Some(next) if !next.is_null() => next,
            _ => return Err(Error::PathResolution),
        };
    }
    assign(cur, last, value)?;
    log::debug!("wrote value at {}", to_pointer(path));
    Ok(root)
}

fn assign(container: &mut Value, seg: &PathSegment, value: Value) -> Result<()> {
    match container {
        Value::Object(map) => {
            map.insert(seg.to_key(), value);
            Ok(())
        }
        Value::Array(items) => {
            let idx = seg.as_index().ok_or(Error::PathResolution)?;
            if idx < items.len() {
                items[idx] = value;
            } else if idx == items.len() {
                items.push(value);
            } else {
                return Err(Error::PathResolution);
            }
            Ok(())
        }
        _ => Err(Error::PathResolution),
    }
}

fn escape_token(tok: &str) -> String {
    tok.replace('~', "~0").replace('/', "~1")
}

fn unescape_token(tok: &str) -> String {
    let s = tok.replace("~1", "/");
    s.replace("~0", "~")
}

fn is_index_token(tok: &str) -> bool {
    !tok.is_empty()
        && tok.bytes().all(|b| b.is_ascii_digit())
        && (tok == "0" || !tok.starts_with('0'))
}

/// RFC 6901 pointer for `path`; the root is `""`.
pub fn to_pointer(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for seg in path {
        out.push('/');
        out.push_str(&escape_token(&seg.to_key()));
    }
    out
}

/// Parses an RFC 6901 pointer. Canonical decimal tokens become indices.
pub fn parse_pointer(pointer: &str) -> Result<Path> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let rest = pointer
        .strip_prefix('/')
        .ok_or_else(|| Error::InvalidPointer(pointer.to_string()))?;
    Ok(rest
        .split('/')
        .map(|tok| match tok.parse::<usize>() {
            Ok(i) if is_index_token(tok) => PathSegment::Index(i),
            _ => PathSegment::Key(unescape_token(tok)),
        })
        .collect())
}
