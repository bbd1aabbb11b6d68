//! Resale-marketplace scraper client and the cached listings lookup.
//!
//! The scraper pages through a catalog entry's listings. A full fetch walks
//! every page and concatenates the items. A failure on any page aborts the
//! fetch and nothing is cached.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::ApiError;
use crate::models::marketplace::{CatalogListings, ListingPage};
use crate::services::cache::TtlCache;
use crate::services::upstream::{ensure_success, UpstreamError};

pub const SERVICE: &str = "marketplace";

/// Items requested per page
pub const PAGE_SIZE: u32 = 50;

/// Upper bound on pages per fetch, in case the scraper never clears `has_more`
pub const MAX_PAGES: u32 = 100;

/// Trimmed catalog id, rejected when it cannot stand as a single URL path
/// segment.
pub fn validate_catalog_id(raw: &str) -> Result<&str, ApiError> {
    let catalog_id = raw.trim();
    if catalog_id.is_empty() {
        return Err(ApiError::Validation("catalog_id is required".to_string()));
    }
    if matches!(catalog_id, "." | "..") || catalog_id.contains(['/', '\\']) {
        return Err(ApiError::Validation(format!(
            "Invalid catalog_id '{}'",
            catalog_id
        )));
    }
    Ok(catalog_id)
}

#[derive(Clone)]
pub struct MarketplaceClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl MarketplaceClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// `{base}/v1/catalog/{catalog_id}/listings` with the id percent-encoded as
    /// one segment.
    pub fn listings_url(&self, catalog_id: &str) -> Result<Url, UpstreamError> {
        let invalid = |message: String| UpstreamError::InvalidUrl {
            service: SERVICE,
            message,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["v1", "catalog", catalog_id, "listings"]);
        Ok(url)
    }

    pub async fn fetch_page(&self, catalog_id: &str, page: u32) -> Result<ListingPage, UpstreamError> {
        let url = self.listings_url(catalog_id)?;

        let mut request = self
            .client
            .get(url)
            .header("accept", "application/json")
            .query(&[("page", page), ("per_page", PAGE_SIZE)]);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(UpstreamError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        response
            .json::<ListingPage>()
            .await
            .map_err(|e| UpstreamError::decode(SERVICE, e.to_string()))
    }

    /// Walk pages from 1 until the scraper reports no more. Usage metadata is
    /// taken from the final page.
    pub async fn fetch_all_pages(&self, catalog_id: &str) -> Result<CatalogListings, UpstreamError> {
        let mut listings = Vec::new();
        let mut page = 1;

        loop {
            let response = self.fetch_page(catalog_id, page).await?;
            debug!(
                catalog_id = %catalog_id,
                page,
                items = response.items.len(),
                has_more = response.has_more,
                "Fetched marketplace page"
            );
            listings.extend(response.items);

            if !response.has_more {
                return Ok(CatalogListings {
                    catalog_id: catalog_id.to_string(),
                    listings,
                    usage: response.usage.unwrap_or_default(),
                    pages: page,
                });
            }

            if page >= MAX_PAGES {
                warn!(catalog_id = %catalog_id, pages = page, "Marketplace pagination limit reached");
                return Err(UpstreamError::PageLimit {
                    service: SERVICE,
                    pages: page,
                });
            }

            page += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingsLookup {
    pub listings: CatalogListings,
    pub cached: bool,
    pub fetched_at: DateTime<Utc>,
}

/// Scraper client behind a per-catalog-id TTL cache.
#[derive(Clone)]
pub struct MarketplaceService {
    client: MarketplaceClient,
    cache: Arc<TtlCache<CatalogListings>>,
}

impl MarketplaceService {
    pub fn new(client: MarketplaceClient, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            cache: Arc::new(TtlCache::new(ttl, clock)),
        }
    }

    pub async fn listings(&self, catalog_id: &str) -> Result<ListingsLookup, UpstreamError> {
        if let Some(page) = self.cache.get(catalog_id) {
            debug!(catalog_id = %catalog_id, "Marketplace cache hit");
            return Ok(ListingsLookup {
                listings: page.payload,
                cached: true,
                fetched_at: page.fetched_at,
            });
        }

        info!(catalog_id = %catalog_id, "Marketplace cache miss, fetching all pages");
        let fetched = self.client.fetch_all_pages(catalog_id).await?;
        info!(
            catalog_id = %catalog_id,
            pages = fetched.pages,
            listings = fetched.listings.len(),
            requests_used = fetched.usage.requests_used,
            "Marketplace listings fetched"
        );

        let page = self.cache.insert(catalog_id, fetched);
        Ok(ListingsLookup {
            listings: page.payload,
            cached: false,
            fetched_at: page.fetched_at,
        })
    }
}
