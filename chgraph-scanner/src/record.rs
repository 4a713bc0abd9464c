use serde::{Deserialize, Serialize};
use std::fmt;

/// What an entity on the register is.
///
/// `Officer` is the unresolved form: an appointment listing does not say
/// whether the officer is a natural person or a corporate body. Fetching the
/// officer's own page resolves it to `Person` or `Company`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Company,
    Officer,
    Person,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Company => "company",
            EntityKind::Officer => "officer",
            EntityKind::Person => "person",
        }
    }

    /// Narrow an unresolved officer to the kind a later page reports.
    /// Resolved kinds never change.
    pub fn refine(self, reported: EntityKind) -> EntityKind {
        match self {
            EntityKind::Officer => reported,
            resolved => resolved,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of an entity's own data has been fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchState {
    Unsearched,
    PrimaryOnly,
    SecondaryOnly,
    Complete,
}

impl SearchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchState::Unsearched => "unsearched",
            SearchState::PrimaryOnly => "primary-only",
            SearchState::SecondaryOnly => "secondary-only",
            SearchState::Complete => "complete",
        }
    }

    /// Join of two observations. Never returns a state less searched than
    /// either input; having seen both the primary and the secondary page
    /// means the entity is complete.
    pub fn advance(self, other: SearchState) -> SearchState {
        match (self, other) {
            (a, b) if a == b => a,
            (SearchState::Unsearched, s) | (s, SearchState::Unsearched) => s,
            _ => SearchState::Complete,
        }
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of the relationship that introduced an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelationStatus {
    Active,
    Resigned,
    Dissolved,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl RelationStatus {
    /// Parse the status tag text shown on a listing page.
    pub fn from_text(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "active" => RelationStatus::Active,
            "resigned" => RelationStatus::Resigned,
            "dissolved" => RelationStatus::Dissolved,
            _ => RelationStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationStatus::Active => "Active",
            RelationStatus::Resigned => "Resigned",
            RelationStatus::Dissolved => "Dissolved",
            RelationStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RelationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entity as extracted from a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub name: String,
    pub kind: EntityKind,
    pub search_state: SearchState,
    pub primary_url: Option<String>,
    pub secondary_url: Option<String>,
    pub status: RelationStatus,
    pub attributes: Vec<String>,
}

impl Record {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            search_state: SearchState::Unsearched,
            primary_url: None,
            secondary_url: None,
            status: RelationStatus::Unknown,
            attributes: Vec::new(),
        }
    }

    pub fn with_search_state(mut self, state: SearchState) -> Self {
        self.search_state = state;
        self
    }

    pub fn with_primary_url(mut self, url: impl Into<String>) -> Self {
        self.primary_url = Some(url.into());
        self
    }

    pub fn with_secondary_url(mut self, url: impl Into<String>) -> Self {
        self.secondary_url = Some(url.into());
        self
    }

    pub fn with_status(mut self, status: RelationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }
}

/// Everything extracted from one fetch: the entity whose page was fetched and
/// the entities listed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecords {
    pub head: Record,
    pub related: Vec<Record>,
}
