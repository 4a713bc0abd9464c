use crate::classify::{COMPANIES_HOUSE_ORIGIN, PageUrl, classify_url};
use crate::error::Result;
use crate::page::{
    DEFAULT_MAX_LISTED, parse_company_head, parse_company_officers, parse_officer_appointments,
};
use crate::record::{PageRecords, SearchState};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetches Companies House pages and turns them into records.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    upstream: String,
    max_listed: usize,
    timeout_secs: u64,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("chgraph/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            upstream: COMPANIES_HOUSE_ORIGIN.to_string(),
            max_listed: DEFAULT_MAX_LISTED,
            timeout_secs,
        })
    }

    /// Send requests to `origin` instead of the Companies House host.
    /// Extracted URLs still use the canonical origin.
    pub fn with_upstream(mut self, origin: impl Into<String>) -> Self {
        self.upstream = origin.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_listed(mut self, max_listed: usize) -> Self {
        self.max_listed = max_listed;
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Classify `url`, fetch the page(s) behind it and extract records.
    pub async fn fetch(&self, url: &str) -> Result<PageRecords> {
        let page = classify_url(url)?;
        info!("Fetching {} page {}", page.kind(), page.url());

        match page {
            PageUrl::Company { url, .. } => self.fetch_company(&url).await,
            PageUrl::Officer { url } => self.fetch_officer(&url).await,
        }
    }

    /// The head data and the officer listing live on different pages;
    /// fetch both at once. With both read, the company is fully searched.
    async fn fetch_company(&self, url: &str) -> Result<PageRecords> {
        let officers_url = format!("{}/officers", url);

        let (head_html, officers_html) =
            futures::try_join!(self.get_html(url), self.get_html(&officers_url))?;

        let head = parse_company_head(&head_html, url)?
            .with_secondary_url(officers_url.as_str())
            .with_search_state(SearchState::Complete);
        let related = parse_company_officers(&officers_html, &officers_url, self.max_listed)?;

        info!("{}: {} officers", head.name, related.len());
        Ok(PageRecords { head, related })
    }

    async fn fetch_officer(&self, url: &str) -> Result<PageRecords> {
        let html = self.get_html(url).await?;
        let page = parse_officer_appointments(&html, url, self.max_listed)?;

        info!("{}: {} appointments", page.head.name, page.related.len());
        Ok(page)
    }

    async fn get_html(&self, canonical_url: &str) -> Result<String> {
        let request_url = self.request_url(canonical_url);
        debug!("GET {}", request_url);

        let start = Instant::now();
        let response = self
            .client
            .get(&request_url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        debug!("GET {} took {:?}", request_url, start.elapsed());

        Ok(body)
    }

    fn request_url(&self, canonical_url: &str) -> String {
        match canonical_url.strip_prefix(COMPANIES_HOUSE_ORIGIN) {
            Some(path) => format!("{}{}", self.upstream, path),
            None => canonical_url.to_string(),
        }
    }
}
