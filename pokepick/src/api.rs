use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use crate::model::CatalogEntry;

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
pub const UNIVERSE_LIMIT: usize = 1300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    pub has_next: bool,
    pub count: Option<usize>,
}

/// Read access to the remote creature catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_page(
        &self,
        limit: usize,
        offset: usize,
        cancel: &CancellationToken,
    ) -> Result<CatalogPage>;

    async fn fetch_detail(&self, url: &str, cancel: &CancellationToken)
        -> Result<serde_json::Value>;

    /// The whole catalog listing. Implementations memoise the first success.
    async fn list_all_entries(&self, cancel: &CancellationToken) -> Result<Vec<CatalogEntry>>;

    async fn fetch_types(&self, cancel: &CancellationToken) -> Result<Vec<String>>;

    /// Generation name (`generation-i`) of a species record.
    async fn fetch_species_generation(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>>;

    fn detail_url(&self, id: u32) -> String;
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    count: Option<usize>,
    next: Option<String>,
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    generation: Option<NamedResource>,
}

pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
    universe_limit: usize,
    cache: Option<HttpCache>,
    entries: OnceCell<Vec<CatalogEntry>>,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            universe_limit: UNIVERSE_LIMIT,
            cache: None,
            entries: OnceCell::new(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        let mut catalog = Self::new(config.api_base.clone());
        catalog.universe_limit = config.universe_limit;
        if let Some(dir) = &config.cache_dir {
            catalog.cache = Some(HttpCache::new(dir.join("http")));
        }
        catalog
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let bytes = self.fetch_bytes(url, cancel).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(err) => {
                if let Some(cache) = &self.cache {
                    cache.remove(url).await;
                }
                Err(err.into())
            }
        }
    }

    async fn fetch_bytes(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(cache) = &self.cache {
            if let Some(bytes) = cache.read(url).await {
                return Ok(bytes);
            }
        }

        debug!(url, "catalog request");
        let request = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            Ok::<_, Error>(response.bytes().await?.to_vec())
        };
        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = request => result,
        };
        let bytes = bytes.inspect_err(|err| warn!(url, error = %err, "catalog request failed"))?;

        if let Some(cache) = &self.cache {
            cache.write(url, &bytes).await;
        }
        Ok(bytes)
    }

    async fn fetch_listing(
        &self,
        limit: usize,
        offset: usize,
        cancel: &CancellationToken,
    ) -> Result<CatalogPage> {
        let url = format!("{}/pokemon?limit={limit}&offset={offset}", self.base_url);
        let response: ListResponse = self.fetch_json(&url, cancel).await?;
        Ok(CatalogPage {
            has_next: response.next.is_some(),
            count: response.count,
            entries: response
                .results
                .into_iter()
                .map(|entry| CatalogEntry {
                    name: entry.name,
                    detail_url: entry.url,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn list_page(
        &self,
        limit: usize,
        offset: usize,
        cancel: &CancellationToken,
    ) -> Result<CatalogPage> {
        self.fetch_listing(limit, offset, cancel).await
    }

    async fn fetch_detail(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value> {
        self.fetch_json(url, cancel).await
    }

    async fn list_all_entries(&self, cancel: &CancellationToken) -> Result<Vec<CatalogEntry>> {
        let entries = self
            .entries
            .get_or_try_init(|| async {
                let page = self.fetch_listing(self.universe_limit, 0, cancel).await?;
                debug!(count = page.entries.len(), "catalog universe listed");
                Ok::<_, Error>(page.entries)
            })
            .await?;
        Ok(entries.clone())
    }

    async fn fetch_types(&self, cancel: &CancellationToken) -> Result<Vec<String>> {
        let url = format!("{}/type?limit=999", self.base_url);
        let response: ListResponse = self.fetch_json(&url, cancel).await?;
        let mut types: Vec<String> = response
            .results
            .into_iter()
            .map(|entry| entry.name)
            .filter(|name| name != "unknown" && name != "shadow")
            .collect();
        types.sort();
        Ok(types)
    }

    async fn fetch_species_generation(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let response: SpeciesResponse = self.fetch_json(url, cancel).await?;
        Ok(response.generation.map(|generation| generation.name))
    }

    fn detail_url(&self, id: u32) -> String {
        format!("{}/pokemon/{id}", self.base_url)
    }
}

pub fn catalog_for(config: &RuntimeConfig) -> Arc<dyn Catalog> {
    Arc::new(HttpCatalog::from_config(config))
}

/// Response bodies on disk, keyed by the sha256 of the request url.
#[derive(Clone, Debug)]
pub struct HttpCache {
    root: PathBuf,
}

impl HttpCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        self.root.join(hex::encode(hasher.finalize()))
    }

    pub async fn read(&self, url: &str) -> Option<Vec<u8>> {
        fs::read(self.path_for(url)).await.ok()
    }

    pub async fn write(&self, url: &str, bytes: &[u8]) {
        let path = self.path_for(url);
        if let Err(err) = write_file(&path, bytes).await {
            warn!(path = %path.display(), error = %err, "cache write failed");
        }
    }

    pub async fn remove(&self, url: &str) {
        let _ = fs::remove_file(self.path_for(url)).await;
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_paths_are_stable_per_url() {
        let cache = HttpCache::new(PathBuf::from("/tmp/pokepick-test"));
        let a = cache.path_for("https://pokeapi.co/api/v2/pokemon/1");
        let b = cache.path_for("https://pokeapi.co/api/v2/pokemon/1");
        let c = cache.path_for("https://pokeapi.co/api/v2/pokemon/2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.file_name().map(|name| name.len()), Some(64));
    }

    #[test]
    fn detail_url_uses_base() {
        let catalog = HttpCatalog::new("http://localhost:9000/api/v2/");
        assert_eq!(
            catalog.detail_url(25),
            "http://localhost:9000/api/v2/pokemon/25"
        );
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let catalog = HttpCatalog::new("http://127.0.0.1:9");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = catalog.list_page(20, 0, &cancel).await;
        assert_eq!(result, Err(Error::Cancelled));
    }

    #[tokio::test]
    async fn cache_round_trips_bytes() {
        let root = std::env::temp_dir().join(format!("pokepick-cache-{}", std::process::id()));
        let cache = HttpCache::new(root.clone());
        cache.write("http://example/x", b"{}").await;
        assert_eq!(cache.read("http://example/x").await, Some(b"{}".to_vec()));
        cache.remove("http://example/x").await;
        assert_eq!(cache.read("http://example/x").await, None);
        let _ = fs::remove_dir_all(root).await;
    }
}
