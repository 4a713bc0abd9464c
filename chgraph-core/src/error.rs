use chgraph_scanner::{EntityKind, ScanError, SearchState};
use thiserror::Error;

/// A record could not be merged into the graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}

/// A clicked entity cannot be expanded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    #[error("{name} has already been fully searched")]
    AlreadySearched { name: String },

    #[error("{name} is a person and cannot be searched")]
    NotSearchable { name: String },

    #[error("{name} is a {kind} in state {state}, which should not occur")]
    InvalidState {
        name: String,
        kind: EntityKind,
        state: SearchState,
    },

    #[error("{name} has no URL for its next page")]
    MissingUrl { name: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("No entity named {0:?} in the graph")]
    UnknownEntity(String),
}

impl Error {
    /// Stable identifier for the error kind, used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Scan(ScanError::UnrecognizedUrl(_)) => "unrecognized-url",
            Error::Scan(ScanError::HttpError(_)) => "fetch-error",
            Error::Scan(ScanError::ParseError(_)) => "parse-error",
            Error::Expansion(ExpansionError::AlreadySearched { .. }) => "already-searched",
            Error::Expansion(ExpansionError::NotSearchable { .. }) => "not-searchable",
            Error::Expansion(ExpansionError::InvalidState { .. }) => "invalid-state",
            Error::Expansion(ExpansionError::MissingUrl { .. }) => "missing-url",
            Error::Merge(MergeError::MalformedRecord(_)) => "malformed-record",
            Error::UnknownEntity(_) => "unknown-entity",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
