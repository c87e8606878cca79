use crate::archive::error::ArchiveError;
use crate::config::RetryPolicy;
use crate::utils::ensure_cache_dir_exists;
use log::{debug, info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;

/// HTTP GET client with an on-disk response cache and bounded retries.
///
/// Successful response bodies are stored under `cache_dir`, keyed by the URL and its
/// query parameters. A stored body younger than `expire_after` is returned without
/// touching the network.
pub struct CachedClient {
    http: Client,
    cache_dir: PathBuf,
    expire_after: Duration,
    retry: RetryPolicy,
}

impl CachedClient {
    pub async fn new(
        cache_dir: &Path,
        expire_after: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, ArchiveError> {
        ensure_cache_dir_exists(cache_dir)
            .await
            .map_err(|e| ArchiveError::CacheDirCreation(cache_dir.to_path_buf(), e))?;
        let http = Client::builder()
            .gzip(true)
            .build()
            .map_err(ArchiveError::ClientBuild)?;
        Ok(Self {
            http,
            cache_dir: cache_dir.to_path_buf(),
            expire_after,
            retry,
        })
    }

    /// Returns the body of `GET url?query`, from the cache when it is fresh.
    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, ArchiveError> {
        let cache_path = self.cache_path(url, query);

        if self.is_fresh(&cache_path).await? {
            debug!("Cache hit for {} at {:?}", url, cache_path);
            return fs::read(&cache_path)
                .await
                .map_err(|e| ArchiveError::CacheRead(cache_path.clone(), e));
        }

        info!("Cache miss for {}, downloading", url);
        let body = self.get_with_retry(url, query).await?;
        fs::write(&cache_path, &body)
            .await
            .map_err(|e| ArchiveError::CacheWrite(cache_path.clone(), e))?;
        Ok(body)
    }

    /// File that holds the cached body of `GET url?query`.
    pub fn cache_path(&self, url: &str, query: &[(&str, String)]) -> PathBuf {
        self.cache_dir.join(cache_key(url, query))
    }

    async fn is_fresh(&self, cache_path: &Path) -> Result<bool, ArchiveError> {
        let metadata = match fs::metadata(cache_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(ArchiveError::CacheMetadataRead(cache_path.to_path_buf(), e)),
        };
        let modified = metadata
            .modified()
            .map_err(|e| ArchiveError::CacheMetadataRead(cache_path.to_path_buf(), e))?;
        let age = SystemTime::now()
            .duration_since(modified)
            .map_err(|e| ArchiveError::SystemTimeCalculation(cache_path.to_path_buf(), e))?;
        Ok(age < self.expire_after)
    }

    async fn get_with_retry(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, ArchiveError> {
        let mut retry = 0;
        loop {
            match self.download(url, query).await {
                Ok(body) => return Ok(body),
                Err(e) if retry < self.retry.retries && e.is_transient() => {
                    retry += 1;
                    let delay = self.retry.backoff(retry);
                    warn!(
                        "Request to {} failed ({}), retry {}/{} in {:?}",
                        url, e, retry, self.retry.retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn download(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, ArchiveError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ArchiveError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => ArchiveError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    },
                    None => ArchiveError::NetworkRequest(url.to_string(), e),
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| ArchiveError::NetworkRequest(url.to_string(), e))?;
        Ok(body.to_vec())
    }
}

/// File name for a request: the URL and its `key=value` pairs with every character
/// outside `[A-Za-z0-9.-]` replaced by `_`.
pub(crate) fn cache_key(url: &str, query: &[(&str, String)]) -> String {
    let url = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let mut key = String::from(url);
    for (name, value) in query {
        key.push('_');
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    let mut sanitized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    sanitized.push_str(".json");
    sanitized
}
