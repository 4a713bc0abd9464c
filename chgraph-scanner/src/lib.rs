pub mod classify;
pub mod error;
pub mod fetcher;
pub mod page;
pub mod record;

pub use classify::{COMPANIES_HOUSE_ORIGIN, PageUrl, classify_url, company_url};
pub use error::ScanError;
pub use fetcher::Fetcher;
pub use record::{EntityKind, PageRecords, Record, RelationStatus, SearchState};
