//! Bulk URL classification
//!
//! Splits a URL list into batches the lookup endpoint accepts, submits them
//! one after another through the gateway, and stitches the per-batch results
//! back together in submission order.

use crate::client::Gateway;
use crate::config::MAX_LOOKUP_BATCH_SIZE;
use crate::ZiaError;
use serde::Deserialize;

/// Path of the bulk lookup endpoint
pub const URL_LOOKUP_PATH: &str = "/urlLookup";

/// Number of batches above which the remaining wait is logged
const LONG_RUN_BATCHES: usize = 5;

/// Vendor classification of a single URL
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Classification {
    pub url: String,

    /// Vendor labels, empty when the URL is not categorized
    #[serde(rename = "urlClassifications", default)]
    pub labels: Vec<String>,
}

impl Classification {
    pub fn new<I, S>(url: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_categorized(&self) -> bool {
        !self.labels.is_empty()
    }
}

/// Number of lookup requests needed for `url_count` URLs
pub fn batch_count(url_count: usize, batch_size: usize) -> usize {
    url_count.div_ceil(batch_size.max(1))
}

/// Classifies every URL, one lookup request per batch
///
/// # Arguments
///
/// * `gateway` - The API session
/// * `urls` - URLs to classify
/// * `batch_size` - URLs per request, clamped to 1..=100
///
/// # Returns
///
/// * `Ok(Vec<Classification>)` - One result per input URL, in input order
/// * `Err(ZiaError)` - A batch failed or its response did not match its size
pub async fn classify(
    gateway: &mut Gateway,
    urls: &[String],
    batch_size: usize,
) -> Result<Vec<Classification>, ZiaError> {
    let batch_size = batch_size.clamp(1, MAX_LOOKUP_BATCH_SIZE);
    let total_batches = batch_count(urls.len(), batch_size);
    let mut results = Vec::with_capacity(urls.len());

    for (index, chunk) in urls.chunks(batch_size).enumerate() {
        let batch_number = index + 1;
        let first = index * batch_size + 1;
        tracing::info!(
            "Looking up URLs {}-{} of {} (chunk {}/{})",
            first,
            first + chunk.len() - 1,
            urls.len(),
            batch_number,
            total_batches
        );

        if total_batches > LONG_RUN_BATCHES && batch_number < total_batches {
            let remaining = gateway.min_request_interval() * (total_batches - batch_number) as u32;
            tracing::info!(
                "Rate limited to one request per {:?}, about {}s remaining",
                gateway.min_request_interval(),
                remaining.as_secs()
            );
        }

        let value = gateway.post(URL_LOOKUP_PATH, chunk).await?;
        let batch: Vec<Classification> =
            serde_json::from_value(value).map_err(|e| ZiaError::UnexpectedResponse {
                endpoint: gateway.endpoint(URL_LOOKUP_PATH),
                message: format!("lookup response: {}", e),
            })?;

        if batch.len() != chunk.len() {
            return Err(ZiaError::UnexpectedResponse {
                endpoint: gateway.endpoint(URL_LOOKUP_PATH),
                message: format!(
                    "submitted {} URLs but received {} results",
                    chunk.len(),
                    batch.len()
                ),
            });
        }

        results.extend(batch);
    }

    Ok(results)
}
