//! Edit session for the node shown in the edit modal.
//!
//! ```text
//! Viewing --start_editing--> Editing --save--> Saving --ok--> Viewing
//!    ^                          |   ^             |
//!    +---------cancel-----------+   +----err------+
//! ```
//!
//! Opening a node (new selection or modal reopen) always lands in `Viewing`
//! with a fresh draft.
use crate::edit::{apply_edit, normalize};
use crate::error::{Error, Result};
use crate::node::{NodeSnapshot, fields_of};
use crate::path::read_at;
use crate::store::Collaborators;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Viewing,
    Editing,
    Saving,
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    node: Option<NodeSnapshot>,
    normalized: String,
    draft: String,
    state: EditState,
    error: Option<String>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `node`, discarding any draft or error from a previous node.
    /// The session is left untouched when the node's fields cannot be
    /// rendered.
    pub fn open(&mut self, node: NodeSnapshot) -> Result<()> {
        self.normalized = normalize(&node.fields)?;
        self.draft = self.normalized.clone();
        self.node = Some(node);
        self.state = EditState::Viewing;
        self.error = None;
        Ok(())
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn node(&self) -> Option<&NodeSnapshot> {
        self.node.as_ref()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn is_saving(&self) -> bool {
        self.state == EditState::Saving
    }

    /// Snippet text of the node as currently stored.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Editable draft buffer; only meaningful while `Editing`.
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A node is editable when it has a primitive field and a known path.
    pub fn can_edit(&self) -> bool {
        self.node
            .as_ref()
            .is_some_and(|n| n.path.is_some() && n.has_primitive_fields())
    }

    pub fn start_editing(&mut self) -> bool {
        if self.state != EditState::Viewing || !self.can_edit() {
            return false;
        }
        self.draft = self.normalized.clone();
        self.error = None;
        self.state = EditState::Editing;
        true
    }

    pub fn cancel(&mut self) {
        if self.state == EditState::Editing {
            self.draft = self.normalized.clone();
            self.error = None;
            self.state = EditState::Viewing;
        }
    }

    /// Marks the session as saving and hands out what the save needs.
    /// Re-entrant calls fail until [`EditSession::finish_save`] runs.
    pub fn begin_save(&mut self) -> Result<(NodeSnapshot, String)> {
        match self.state {
            EditState::Saving => return Err(Error::SaveInProgress),
            EditState::Viewing => return Err(Error::NotEditing),
            EditState::Editing => {}
        }
        let node = self.node.clone().ok_or(Error::NotEditing)?;
        self.state = EditState::Saving;
        Ok((node, self.draft.clone()))
    }

    /// Ends a save started with [`EditSession::begin_save`]. Success shows the
    /// refreshed node; failure returns to `Editing` with the draft kept.
    pub fn finish_save(&mut self, outcome: Result<NodeSnapshot>) -> Result<()> {
        match outcome.and_then(|node| self.open(node)) {
            Ok(()) => Ok(()),
            Err(e) => {
                if e.is_user_error() {
                    log::warn!("edit rejected: {}", e);
                } else {
                    log::error!("save failed: {}", e);
                }
                self.error = Some(e.to_string());
                self.state = EditState::Editing;
                Err(e)
            }
        }
    }

    /// Runs the whole save pipeline against `stores`.
    pub fn save(&mut self, stores: &mut Collaborators<'_>) -> Result<()> {
        let (node, draft) = self.begin_save()?;
        let outcome = commit(&node, &draft, stores);
        self.finish_save(outcome)
    }
}

/// Applies `draft` to the freshly read document and propagates the result.
/// Returns the node as the rebuilt graph presents it, or, when the edit turned
/// it into an array, a snapshot of the new value with no editable fields.
pub fn commit(node: &NodeSnapshot, draft: &str, stores: &mut Collaborators<'_>) -> Result<NodeSnapshot> {
    let current = stores.document.current_text()?;
    let text = apply_edit(&current, node, draft)?;
    stores.document.set_text(&text)?;
    stores.parsed.set_text(&text);
    stores.graph.rebuild_from(&text)?;
    let refreshed = stores
        .graph
        .list_nodes()
        .into_iter()
        .find(|n| n.path == node.path);
    match refreshed {
        Some(n) => {
            stores.graph.select_node(&n);
            log::info!("saved node {}", n.id);
            Ok(n)
        }
        None => {
            log::warn!("node {} has no graph node after rebuild", node.id);
            let value: Value =
                serde_json::from_str(&text).map_err(|e| Error::InvalidDocument(e.to_string()))?;
            let fields = node
                .path
                .as_deref()
                .and_then(|p| read_at(&value, p))
                .map(fields_of)
                .unwrap_or_default();
            Ok(NodeSnapshot {
                id: node.id.clone(),
                fields,
                path: node.path.clone(),
            })
        }
    }
}
