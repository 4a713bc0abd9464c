use crate::error::{Result, ScanError};
use regex::Regex;
use std::sync::LazyLock;

pub const COMPANIES_HOUSE_ORIGIN: &str = "https://beta.companieshouse.gov.uk";

/// Company numbers are 8 characters: all digits, or a 2 letter prefix
/// (SC, NI, OC, ...) followed by 6 digits.
pub(crate) const COMPANY_NUMBER_PATTERN: &str = r"(?:[0-9]{2}|[A-Za-z]{2})[0-9]{6}";

/// Optional scheme, then the register's host and nothing else.
const HOST_PATTERN: &str = r"^(?:https?://)?beta\.companieshouse\.gov\.uk";

static COMPANY_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{}/company/({})(?:[/?#]|$)",
        HOST_PATTERN, COMPANY_NUMBER_PATTERN
    ))
    .expect("company url pattern is valid")
});

static OFFICER_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{}(/officers/[^/?#\s]+[^#\s]*)", HOST_PATTERN))
        .expect("officer url pattern is valid")
});

/// A URL the fetcher knows how to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageUrl {
    /// Company detail page, canonicalised to `<origin>/company/<number>`.
    Company { number: String, url: String },
    /// Officer appointments page on the canonical origin, path and query kept.
    Officer { url: String },
}

impl PageUrl {
    pub fn url(&self) -> &str {
        match self {
            PageUrl::Company { url, .. } | PageUrl::Officer { url } => url,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PageUrl::Company { .. } => "company",
            PageUrl::Officer { .. } => "officer",
        }
    }
}

/// Canonical company detail URL for a company number.
pub fn company_url(number: &str) -> String {
    format!("{}/company/{}", COMPANIES_HOUSE_ORIGIN, number)
}

/// Classify a submitted or derived URL as a company or officer page.
///
/// Pure: no request is made. Anything that is not on the Companies House
/// host with a `/company/<number>` or `/officers/` path is rejected.
pub fn classify_url(input: &str) -> Result<PageUrl> {
    let trimmed = input.trim();

    if let Some(captures) = COMPANY_URL.captures(trimmed) {
        let number = captures[1].to_uppercase();
        let url = company_url(&number);
        return Ok(PageUrl::Company { number, url });
    }

    if let Some(captures) = OFFICER_URL.captures(trimmed) {
        return Ok(PageUrl::Officer {
            url: format!("{}{}", COMPANIES_HOUSE_ORIGIN, &captures[1]),
        });
    }

    Err(ScanError::UnrecognizedUrl(trimmed.to_string()))
}
