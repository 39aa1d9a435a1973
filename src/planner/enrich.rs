use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::ItineraryDocument;

/// Concurrency cap for per-item image lookups within one request.
const IMAGE_LOOKUP_CONCURRENCY: usize = 6;

const SERPER_IMAGES_URL: &str = "https://google.serper.dev/images";

/// Image results whose URL contains one of these are site chrome, not
/// photos of the place.
const SKIPPED_IMAGE_MARKERS: [&str; 4] = ["favicon", "logo", "icon", "placeholder"];

/// Seam to the image-search service. Absence of results is a normal
/// outcome, not an error.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn find_image(&self, query: &str) -> anyhow::Result<Option<String>>;
}

/// Image lookup backed by the Serper Google Images endpoint.
pub struct SerperImageSearch {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerperImageSearch {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, SERPER_IMAGES_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageSearchResponse {
    #[serde(default)]
    images: Vec<ImageResult>,
}

#[derive(Debug, Deserialize)]
struct ImageResult {
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
}

#[async_trait]
impl ImageSearch for SerperImageSearch {
    async fn find_image(&self, query: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .http
            .post(&self.base_url)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({ "q": query, "num": 5 }))
            .send()
            .await?
            .error_for_status()?;

        let body: ImageSearchResponse = response.json().await?;
        Ok(body
            .images
            .into_iter()
            .filter_map(|img| img.image_url)
            .find(|url| {
                let lower = url.to_lowercase();
                !url.is_empty()
                    && !SKIPPED_IMAGE_MARKERS
                        .iter()
                        .any(|marker| lower.contains(marker))
            }))
    }
}

/// Deterministic fallback used whenever real lookup fails: a placeholder
/// image carrying the item's name as display text.
pub fn placeholder_image(name: &str) -> String {
    format!(
        "https://placehold.co/600x400?text={}",
        urlencoding::encode(name)
    )
}

/// Image URLs for every activity (in day order) and hotel in the document,
/// positionally aligned with the document's own ordering.
#[derive(Debug)]
pub struct EnrichedImages {
    pub activity_urls: Vec<String>,
    pub hotel_urls: Vec<String>,
}

/// Resolves an image for every activity and hotel. Lookups fan out with a
/// fixed concurrency cap; completions arrive out of order, so each result
/// is slotted back by index before the assembler consumes them. A failed
/// or empty lookup degrades to a placeholder for that item alone, so this
/// stage can never fail the request.
pub async fn resolve_images(
    document: &ItineraryDocument,
    images: &dyn ImageSearch,
    destination: &str,
) -> EnrichedImages {
    let activity_count: usize = document.days.iter().map(|d| d.activities.len()).sum();

    let mut lookups: Vec<(String, String)> =
        Vec::with_capacity(activity_count + document.suggested_hotels.len());
    for day in &document.days {
        for activity in &day.activities {
            lookups.push((
                activity.name.clone(),
                format!("{} {} tourism", activity.name, destination),
            ));
        }
    }
    for hotel in &document.suggested_hotels {
        lookups.push((
            hotel.name.clone(),
            format!("{} {} hotel", hotel.name, destination),
        ));
    }

    let mut urls: Vec<String> = vec![String::new(); lookups.len()];
    let mut results = stream::iter(lookups.into_iter().enumerate().map(|(idx, (name, query))| {
        async move { (idx, resolve_one(images, &name, &query).await) }
    }))
    .buffer_unordered(IMAGE_LOOKUP_CONCURRENCY);

    while let Some((idx, url)) = results.next().await {
        urls[idx] = url;
    }

    let hotel_urls = urls.split_off(activity_count);
    EnrichedImages {
        activity_urls: urls,
        hotel_urls,
    }
}

async fn resolve_one(images: &dyn ImageSearch, name: &str, query: &str) -> String {
    match images.find_image(query).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            debug!("No image found for '{}', using placeholder", name);
            placeholder_image(name)
        }
        Err(err) => {
            warn!("Image lookup failed for '{}': {}", name, err);
            placeholder_image(name)
        }
    }
}
