use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::artwork::GraphArtwork;
use crate::context::AjaxContext;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(String);

impl GraphId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `self` is a subgraph of `parent` when it extends the parent id with
    /// something other than further digits (`graph_1` never owns `graph_10`).
    pub fn is_subgraph_of(&self, parent: &GraphId) -> bool {
        match self.0.strip_prefix(parent.as_str()) {
            Some(rest) => !rest.is_empty() && !rest.starts_with(|c: char| c.is_ascii_digit()),
            None => false,
        }
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GraphId {
    fn from(value: &str) -> Self {
        GraphId(value.to_string())
    }
}

impl From<String> for GraphId {
    fn from(value: String) -> Self {
        GraphId(value)
    }
}

/// Every artwork currently known on the page, keyed by graph id.
#[derive(Debug, Default)]
pub struct Registry {
    graphs: FxHashMap<GraphId, GraphArtwork>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of an already registered graph with the same identity, or a fresh one.
    pub fn resolve_id(&mut self, context: &AjaxContext) -> GraphId {
        if let Some(id) = self.find_by_key(context) {
            return id.clone();
        }

        let id = GraphId(format!("graph_{}", self.next_id));
        self.next_id += 1;
        id
    }

    pub fn find_by_key(&self, context: &AjaxContext) -> Option<&GraphId> {
        self.graphs.iter().find_map(|(id, artwork)| {
            artwork
                .ajax_context
                .as_ref()
                .filter(|existing| existing.same_graph(context))
                .map(|_| id)
        })
    }

    /// Inserts or fully replaces the artwork stored under its id.
    pub fn replace(&mut self, artwork: GraphArtwork) -> Option<GraphArtwork> {
        self.graphs.insert(artwork.id.clone(), artwork)
    }

    pub fn remove(&mut self, id: &GraphId) -> Option<GraphArtwork> {
        self.graphs.remove(id)
    }

    pub fn get(&self, id: &GraphId) -> Option<&GraphArtwork> {
        self.graphs.get(id)
    }

    /// Only meant for render-derived caches such as the plot layout.
    pub fn get_mut(&mut self, id: &GraphId) -> Option<&mut GraphArtwork> {
        self.graphs.get_mut(id)
    }

    pub fn contains(&self, id: &GraphId) -> bool {
        self.graphs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Ids in a stable order, so fan-out work is deterministic.
    pub fn ids(&self) -> Vec<GraphId> {
        let mut ids: Vec<GraphId> = self.graphs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn subgraphs_of(&self, parent: &GraphId) -> Vec<GraphId> {
        let mut ids: Vec<GraphId> = self
            .graphs
            .keys()
            .filter(|id| id.is_subgraph_of(parent))
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
