use crate::error::{Error, Result};
use crate::expand::next_action;
use crate::graph::{Graph, GraphSnapshot};
use chgraph_scanner::{Fetcher, PageRecords, ScanError, classify_url};
use std::future::Future;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Source of page records. Implemented by the HTTP [`Fetcher`]; tests supply
/// canned pages.
pub trait PageFetcher: Send + Sync {
    fn fetch(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<PageRecords, ScanError>> + Send;
}

impl PageFetcher for Fetcher {
    fn fetch(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<PageRecords, ScanError>> + Send {
        Fetcher::fetch(self, url)
    }
}

/// One exploration session: a graph that grows with every submitted URL and
/// every expanded entity.
///
/// The graph lock is only taken to read an entity or to merge a finished
/// fetch, never across the fetch itself, so several fetches can be in flight
/// and their merges apply one at a time.
pub struct Explorer<F> {
    fetcher: F,
    graph: RwLock<Graph>,
}

impl<F: PageFetcher> Explorer<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_graph(fetcher, Graph::new())
    }

    pub fn with_graph(fetcher: F, graph: Graph) -> Self {
        Self {
            fetcher,
            graph: RwLock::new(graph),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch a user-submitted URL and merge what it lists.
    pub async fn submit(&self, url: &str) -> Result<GraphSnapshot> {
        let page = classify_url(url)?;
        info!("Submitted {} URL {}", page.kind(), page.url());
        self.fetch_and_merge(page.url(), None).await
    }

    /// Fetch the next page for the entity called `name`.
    ///
    /// The fetched page is about the clicked entity, so its head record is
    /// merged under `name` even when the page spells the name differently
    /// (listings show "SMITH, Jane" where the appointments page shows
    /// "Jane SMITH"). The page's own spelling is kept as an attribute.
    pub async fn expand(&self, name: &str) -> Result<GraphSnapshot> {
        let entity = self
            .graph
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownEntity(name.to_string()))?;

        let url = next_action(&entity)?;
        let page = classify_url(&url)?;
        info!(
            "Expanding {} ({}, {}) via {}",
            entity.name,
            entity.kind,
            entity.search_state,
            page.url()
        );
        self.fetch_and_merge(page.url(), Some(entity.name.as_str())).await
    }

    pub async fn snapshot(&self) -> GraphSnapshot {
        self.graph.read().await.snapshot()
    }

    async fn fetch_and_merge(&self, url: &str, head_name: Option<&str>) -> Result<GraphSnapshot> {
        let mut records = self
            .fetcher
            .fetch(url)
            .await
            .inspect_err(|e| warn!("Fetch of {} failed: {}", url, e))?;

        if let Some(name) = head_name {
            rename_head(&mut records, name);
        }

        let mut graph = self.graph.write().await;
        let snapshot = graph
            .merge(&records)
            .inspect_err(|e| warn!("Merge of {} failed: {}", url, e))?;
        Ok(snapshot)
    }
}

fn rename_head(records: &mut PageRecords, name: &str) {
    if records.head.name == name {
        return;
    }
    debug!("Page names {:?} as {:?}", name, records.head.name);
    let listed_as = format!("Name on page: {}", records.head.name);
    if !records.head.attributes.contains(&listed_as) {
        records.head.attributes.push(listed_as);
    }
    records.head.name = name.to_string();
}
