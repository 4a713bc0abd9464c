pub mod error;
pub mod expand;
pub mod explorer;
pub mod graph;
pub mod report;

pub use error::{Error, ExpansionError, MergeError, Result};
pub use expand::next_action;
pub use explorer::{Explorer, PageFetcher};
pub use graph::{EdgeView, Entity, Graph, GraphSnapshot, Relationship};

// Record types are part of this crate's API surface.
pub use chgraph_scanner::{EntityKind, PageRecords, Record, RelationStatus, SearchState};
