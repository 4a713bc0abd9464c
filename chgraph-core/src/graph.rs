// Incrementally grown officer/company graph

use crate::error::MergeError;
use chgraph_scanner::{EntityKind, PageRecords, Record, RelationStatus, SearchState};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A company, officer or person in the graph. `name` is the join key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    pub search_state: SearchState,
    pub primary_url: Option<String>,
    pub secondary_url: Option<String>,
    /// Status of the relationship this entity was last seen through.
    pub status: RelationStatus,
    pub attributes: Vec<String>,
}

impl Entity {
    fn from_record(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            kind: record.kind,
            search_state: record.search_state,
            primary_url: record.primary_url.clone(),
            secondary_url: record.secondary_url.clone(),
            status: record.status,
            attributes: record.attributes.clone(),
        }
    }

    /// Fold in the head record of a page fetched for this entity.
    fn absorb_head(&mut self, record: &Record) {
        self.kind = self.kind.refine(record.kind);
        self.search_state = self.search_state.advance(record.search_state);
        self.fill_from(record);
    }

    /// Fold in a listing of this entity on some other entity's page.
    /// The search state is left alone.
    fn absorb_related(&mut self, record: &Record) {
        self.kind = self.kind.refine(record.kind);
        if record.status != RelationStatus::Unknown {
            self.status = record.status;
        }
        self.fill_from(record);
    }

    fn fill_from(&mut self, record: &Record) {
        if self.primary_url.is_none() {
            self.primary_url = record.primary_url.clone();
        }
        if self.secondary_url.is_none() {
            self.secondary_url = record.secondary_url.clone();
        }
        for attribute in &record.attributes {
            if !self.attributes.contains(attribute) {
                self.attributes.push(attribute.clone());
            }
        }
    }
}

/// Edge weight: head entity -> entity listed on the head's page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub status: RelationStatus,
}

/// An edge with its endpoints resolved to entity names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub status: RelationStatus,
}

/// Full node and edge lists, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Entity>,
    pub edges: Vec<EdgeView>,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    graph: DiGraph<Entity, Relationship>,
    index: HashMap<String, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.index.get(name).map(|&idx| &self.graph[idx])
    }

    /// Merge one page's records.
    ///
    /// All records are validated before anything is written, so a failed
    /// merge leaves the graph untouched. Merging the same page twice leaves
    /// the graph as merging it once: relationships from the head to a target
    /// with a given status are kept at the largest count any single merge
    /// has reported.
    pub fn merge(&mut self, page: &PageRecords) -> Result<GraphSnapshot, MergeError> {
        validate(&page.head, "head record")?;
        for (i, record) in page.related.iter().enumerate() {
            validate(record, &format!("related record {}", i + 1))?;
        }

        let head = self.upsert_head(&page.head);

        let mut existing: HashMap<(NodeIndex, RelationStatus), usize> = HashMap::new();
        for edge in self.graph.edges_directed(head, Direction::Outgoing) {
            *existing.entry((edge.target(), edge.weight().status)).or_default() += 1;
        }

        let mut listed: HashMap<(NodeIndex, RelationStatus), usize> = HashMap::new();
        let mut added = 0;
        for record in &page.related {
            let target = self.upsert_related(record);
            let key = (target, record.status);
            let count = listed.entry(key).or_default();
            *count += 1;
            if *count > existing.get(&key).copied().unwrap_or(0) {
                self.graph.add_edge(head, target, Relationship { status: record.status });
                added += 1;
            }
        }

        debug!(
            "Merged {} with {} related records ({} new relationships); graph has {} entities, {} relationships",
            page.head.name,
            page.related.len(),
            added,
            self.node_count(),
            self.edge_count()
        );

        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes = self.graph.node_weights().cloned().collect();
        let edges = self
            .graph
            .edge_references()
            .map(|edge| EdgeView {
                source: self.graph[edge.source()].name.clone(),
                target: self.graph[edge.target()].name.clone(),
                status: edge.weight().status,
            })
            .collect();

        GraphSnapshot { nodes, edges }
    }

    fn upsert_head(&mut self, record: &Record) -> NodeIndex {
        match self.index.get(&record.name) {
            Some(&idx) => {
                self.graph[idx].absorb_head(record);
                idx
            }
            None => self.insert(record),
        }
    }

    fn upsert_related(&mut self, record: &Record) -> NodeIndex {
        match self.index.get(&record.name) {
            Some(&idx) => {
                self.graph[idx].absorb_related(record);
                idx
            }
            None => self.insert(record),
        }
    }

    fn insert(&mut self, record: &Record) -> NodeIndex {
        let idx = self.graph.add_node(Entity::from_record(record));
        self.index.insert(record.name.clone(), idx);
        idx
    }
}

fn validate(record: &Record, which: &str) -> Result<(), MergeError> {
    if record.name.trim().is_empty() {
        return Err(MergeError::MalformedRecord(format!("{} has no name", which)));
    }
    Ok(())
}
