// Report generation from a graph snapshot

use crate::graph::{Entity, GraphSnapshot};
use chgraph_scanner::{EntityKind, RelationStatus};
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Dot,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "dot" | "graphviz" => Some(ReportFormat::Dot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphCounts {
    pub companies: usize,
    pub officers: usize,
    pub persons: usize,
    pub active: usize,
    pub resigned: usize,
    pub dissolved: usize,
    pub unknown: usize,
}

impl GraphCounts {
    pub fn of(snapshot: &GraphSnapshot) -> Self {
        let mut counts = GraphCounts::default();
        for node in &snapshot.nodes {
            match node.kind {
                EntityKind::Company => counts.companies += 1,
                EntityKind::Officer => counts.officers += 1,
                EntityKind::Person => counts.persons += 1,
            }
        }
        for edge in &snapshot.edges {
            match edge.status {
                RelationStatus::Active => counts.active += 1,
                RelationStatus::Resigned => counts.resigned += 1,
                RelationStatus::Dissolved => counts.dissolved += 1,
                RelationStatus::Unknown => counts.unknown += 1,
            }
        }
        counts
    }
}

pub fn generate_graph_report(
    snapshot: &GraphSnapshot,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(snapshot)),
        ReportFormat::Json => generate_json_report(snapshot),
        ReportFormat::Dot => Ok(generate_dot_report(snapshot)),
    }
}

pub fn generate_text_report(snapshot: &GraphSnapshot) -> String {
    let counts = GraphCounts::of(snapshot);
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                          COMPANIES HOUSE GRAPH\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!(
        "Entities:       {} ({} companies, {} officers, {} persons)\n",
        snapshot.nodes.len(),
        counts.companies,
        counts.officers,
        counts.persons
    ));
    report.push_str(&format!(
        "Relationships:  {} ({} active, {} resigned, {} dissolved, {} unknown)\n\n",
        snapshot.edges.len(),
        counts.active,
        counts.resigned,
        counts.dissolved,
        counts.unknown
    ));

    if snapshot.nodes.is_empty() {
        report.push_str("Graph is empty.\n");
        return report;
    }

    report.push_str(RULE);
    report.push_str("ENTITIES\n");
    report.push_str(RULE);

    let mut outgoing: HashMap<&str, Vec<(&str, RelationStatus)>> = HashMap::new();
    for edge in &snapshot.edges {
        outgoing
            .entry(edge.source.as_str())
            .or_default()
            .push((edge.target.as_str(), edge.status));
    }

    for node in &snapshot.nodes {
        report.push('\n');
        report.push_str(&format!(
            "{} [{}, {}]\n",
            node.name, node.kind, node.search_state
        ));
        for url in [&node.primary_url, &node.secondary_url].into_iter().flatten() {
            report.push_str(&format!("  {}\n", url));
        }
        for attribute in &node.attributes {
            report.push_str(&format!("  {}\n", attribute));
        }
        if let Some(targets) = outgoing.get(node.name.as_str()) {
            for (target, status) in targets {
                report.push_str(&format!("  -> {} ({})\n", target, status));
            }
        }
    }

    report
}

pub fn generate_json_report(snapshot: &GraphSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(snapshot)
}

/// Graphviz rendering; nodes are labelled `name (kind)`, edges by status.
pub fn generate_dot_report(snapshot: &GraphSnapshot) -> String {
    let mut graph: DiGraph<String, RelationStatus> = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();

    for node in &snapshot.nodes {
        index.insert(node.name.as_str(), graph.add_node(dot_label(node)));
    }
    for edge in &snapshot.edges {
        if let (Some(&source), Some(&target)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) {
            graph.add_edge(source, target, edge.status);
        }
    }

    format!("{}", Dot::new(&graph))
}

fn dot_label(node: &Entity) -> String {
    format!("{} ({})", node.name, node.kind)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
