use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::Catalog;
use crate::error::{Error, Result};
use crate::model::{CatalogEntry, CreatureDetail};
use crate::normalize::normalize;

use super::{BatchShaping, WindowBatch, WINDOW_BATCH};

/// Fetch + normalize `entries` concurrently, keeping their order.
///
/// Items that fail are dropped. The batch only fails when it was cancelled
/// or when every item failed.
pub async fn fetch_details(
    catalog: &dyn Catalog,
    entries: &[CatalogEntry],
    cancel: &CancellationToken,
) -> Result<Vec<CreatureDetail>> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let requests = entries.iter().map(|entry| async move {
        let raw = catalog.fetch_detail(&entry.detail_url, cancel).await?;
        normalize(&raw)
    });
    let results = tokio::select! {
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        results = join_all(requests) => results,
    };

    let mut details = Vec::with_capacity(results.len());
    let mut first_error = None;
    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(detail) => details.push(detail),
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(err) => {
                warn!(name = %entry.name, error = %err, "dropping creature from batch");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) if details.is_empty() => Err(err),
        _ => Ok(details),
    }
}

/// One `/pokemon?limit&offset` page, shaped locally.
pub async fn default_window(
    catalog: &dyn Catalog,
    offset: usize,
    shaping: &BatchShaping,
    cancel: &CancellationToken,
) -> Result<WindowBatch> {
    let page = catalog.list_page(WINDOW_BATCH, offset, cancel).await?;
    let has_more = page.has_next && page.entries.len() >= WINDOW_BATCH;
    let details = fetch_details(catalog, &page.entries, cancel).await?;
    debug!(offset, fetched = details.len(), has_more, "default window");
    Ok(WindowBatch {
        items: shaping.apply(details),
        consumed: WINDOW_BATCH,
        has_more,
    })
}

/// Details for one slice of search candidates, shaped locally.
pub async fn search_window(
    catalog: &dyn Catalog,
    candidates: &[CatalogEntry],
    remaining: bool,
    shaping: &BatchShaping,
    cancel: &CancellationToken,
) -> Result<WindowBatch> {
    let details = fetch_details(catalog, candidates, cancel).await?;
    debug!(candidates = candidates.len(), fetched = details.len(), "search window");
    Ok(WindowBatch {
        items: shaping.apply(details),
        consumed: candidates.len(),
        has_more: remaining,
    })
}
