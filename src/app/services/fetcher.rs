//! Remote acquisition of regulator data
//!
//! The regulator publishes quarterly statement archives under a static
//! per-year directory listing, and the active-operator registry as a single
//! CSV. The fetcher scrapes the listing, walks year directories newest
//! first until it has collected the configured number of archives, and
//! downloads them with bounded concurrency and per-request retries. Files
//! already present locally are skipped, so fetches are resumable.

use crate::config::FetchConfig;
use crate::constants::{REGISTRY_FILENAME, network};
use crate::{Error, Result};
use futures::StreamExt;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Fetch metrics for the summary line
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FetchStats {
    pub year_dirs_found: u64,
    pub archives_listed: u64,
    pub archives_downloaded: u64,
    pub archives_skipped: u64,
    pub registry_downloaded: bool,
    pub bytes_downloaded: u64,
}

/// Downloads statement archives and the operator registry
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                Error::network(&config.base_url, "Failed to build HTTP client", Some(e))
            })?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Download the newest statement archives, and optionally the registry
    pub async fn fetch_latest(&self, dest: &Path, include_registry: bool) -> Result<FetchStats> {
        tokio::fs::create_dir_all(dest).await?;
        let mut stats = FetchStats::default();

        let base = Url::parse(&self.config.base_url).map_err(|e| {
            Error::network(&self.config.base_url, format!("Invalid base URL: {e}"), None)
        })?;
        let listing = self.fetch_text(base.as_str()).await?;
        let years = parse_year_dirs(&listing);
        stats.year_dirs_found = years.len() as u64;
        if years.is_empty() {
            return Err(Error::network(
                base.as_str(),
                "Listing contains no year directories",
                None,
            ));
        }

        // Newest year first, newest archive first within a year
        let mut pending: Vec<(String, Url)> = Vec::new();
        for year in &years {
            if pending.len() >= self.config.max_archives {
                break;
            }
            let year_url = base.join(&format!("{year}/")).map_err(|e| {
                Error::network(base.as_str(), format!("Invalid year directory: {e}"), None)
            })?;
            let year_listing = self.fetch_text(year_url.as_str()).await?;
            let mut links = parse_zip_links(&year_listing, &year_url);
            links.sort_by(|a, b| b.0.cmp(&a.0));
            stats.archives_listed += links.len() as u64;
            for link in links {
                if pending.len() >= self.config.max_archives {
                    break;
                }
                pending.push(link);
            }
        }

        let mut downloads = futures::stream::iter(pending.into_iter().map(|(name, url)| {
            let target = dest.join(&name);
            async move { self.download_file(&url, &target).await }
        }))
        .buffer_unordered(network::DOWNLOAD_CONCURRENCY);

        while let Some(result) = downloads.next().await {
            match result? {
                Some(bytes) => {
                    stats.archives_downloaded += 1;
                    stats.bytes_downloaded += bytes;
                }
                None => stats.archives_skipped += 1,
            }
        }

        if include_registry {
            let target = dest.join(REGISTRY_FILENAME);
            let url = Url::parse(&self.config.registry_url).map_err(|e| {
                Error::network(
                    &self.config.registry_url,
                    format!("Invalid registry URL: {e}"),
                    None,
                )
            })?;
            if let Some(bytes) = self.download_file(&url, &target).await? {
                stats.registry_downloaded = true;
                stats.bytes_downloaded += bytes;
            }
        }

        info!(
            "Fetch complete: {} downloaded, {} already present",
            stats.archives_downloaded, stats.archives_skipped
        );
        Ok(stats)
    }

    /// Download one file unless it already exists; returns bytes written
    async fn download_file(&self, url: &Url, target: &PathBuf) -> Result<Option<u64>> {
        if tokio::fs::try_exists(target).await? {
            debug!("Skipping existing file {}", target.display());
            return Ok(None);
        }
        let body = self.fetch_bytes(url.as_str()).await?;
        let len = body.len() as u64;
        tokio::fs::write(target, &body).await?;
        info!("Downloaded {} ({} bytes)", target.display(), len);
        Ok(Some(len))
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let body = self.fetch_bytes(url).await?;
        String::from_utf8(body)
            .map_err(|_| Error::network(url, "Listing is not valid UTF-8", None))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let mut last_error = None;
        for attempt in 1..=network::MAX_RETRIES {
            match self.try_fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    warn!("Attempt {attempt}/{} failed for {url}: {e}", network::MAX_RETRIES);
                    last_error = Some(e);
                    if attempt < network::MAX_RETRIES {
                        let delay = network::RETRY_DELAY_MS * attempt as u64;
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| Error::network(url, "Download failed with no attempts made", None)))
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::network(url, "Request failed", Some(e)))?;
        let response = response
            .error_for_status()
            .map_err(|e| Error::network(url, "Server returned an error status", Some(e)))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::network(url, "Failed to read response body", Some(e)))?;
        Ok(body.to_vec())
    }
}

/// Extract four-digit year directories from a listing page, newest first
fn parse_year_dirs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("static selector");
    let mut years: Vec<String> = document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| {
            let trimmed = href.trim_end_matches('/');
            (trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()))
                .then(|| trimmed.to_string())
        })
        .collect();
    years.sort();
    years.dedup();
    years.reverse();
    years
}

/// Extract ZIP archive links from a year directory listing
fn parse_zip_links(html: &str, base: &Url) -> Vec<(String, Url)> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("static selector");
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.to_ascii_lowercase().ends_with(".zip"))
        .filter_map(|href| {
            let url = base.join(href).ok()?;
            let name = url.path_segments()?.next_back()?.to_string();
            Some((name, url))
        })
        .collect()
}
