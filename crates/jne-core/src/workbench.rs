use crate::error::{Error, Result};
use crate::graph::JsonGraph;
use crate::node::NodeSnapshot;
use crate::session::EditSession;
use crate::store::{Collaborators, DocumentStore, GraphStore, MemoryParsedJsonStore, ParsedJsonStore};

/// A loaded document with its viewer state: parsed text, node graph and the
/// edit session for the selected node.
#[derive(Debug)]
pub struct Workbench<D> {
    document: D,
    parsed: MemoryParsedJsonStore,
    graph: JsonGraph,
    session: EditSession,
}

impl<D: DocumentStore> Workbench<D> {
    pub fn open(document: D) -> Result<Self> {
        let text = document.current_text()?;
        let graph = JsonGraph::from_text(&text)?;
        Ok(Self {
            document,
            parsed: MemoryParsedJsonStore::new(text),
            graph,
            session: EditSession::new(),
        })
    }

    /// Re-reads the document and reopens the selected node, if it still exists.
    pub fn reload(&mut self) -> Result<()> {
        let text = self.document.current_text()?;
        self.graph.rebuild_from(&text)?;
        self.parsed.set_text(&text);
        match self.graph.selected().cloned() {
            Some(node) => self.session.open(node),
            None => {
                self.session.close();
                Ok(())
            }
        }
    }

    /// Selects the node with pointer id `id` and shows it in the session.
    pub fn select(&mut self, id: &str) -> Result<&NodeSnapshot> {
        let node = self
            .graph
            .node(id)
            .cloned()
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))?;
        self.session.open(node.clone())?;
        self.graph.select_node(&node);
        self.session.node().ok_or(Error::NodeNotFound(node.id))
    }

    pub fn save(&mut self) -> Result<()> {
        let mut stores = Collaborators {
            document: &mut self.document,
            parsed: &mut self.parsed,
            graph: &mut self.graph,
        };
        self.session.save(&mut stores)
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn parsed_text(&self) -> &str {
        self.parsed.text()
    }

    pub fn graph(&self) -> &JsonGraph {
        &self.graph
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }
}
