//! jne-core: path-addressed JSON access and single-node edit sessions
//!
//! This crate focuses on a small, well-factored surface:
//! - `read_at` / `write_at` over `serde_json::Value` by index/key paths
//! - Snippet projection of a node's primitive fields and merge-back
//! - Edit session state machine driving document, parsed-JSON and graph stores
//! - File-backed document store with optional zip backup, JSON file discovery
//!
pub mod backup;
pub mod documents;
pub mod edit;
pub mod error;
pub mod graph;
pub mod node;
pub mod path;
pub mod session;
pub mod store;
pub mod workbench;

pub use edit::{apply_edit, is_object_shaped, normalize, to_pretty};
pub use error::{Error, Result};
pub use graph::JsonGraph;
pub use node::{FieldKind, NodeField, NodeSnapshot, fields_of};
pub use path::{Path, PathSegment, parse_pointer, read_at, read_at_mut, to_pointer, write_at};
pub use session::{EditSession, EditState};
pub use store::{
    Collaborators, DocumentStore, FileDocumentStore, GraphStore, MemoryDocumentStore,
    MemoryParsedJsonStore, ParsedJsonStore, StoreOptions,
};
pub use workbench::Workbench;
