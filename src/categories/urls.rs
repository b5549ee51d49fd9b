use crate::client::Gateway;
use crate::ZiaError;
use serde::Deserialize;
use std::collections::HashSet;

/// Name used when the detail response carries no `configuredName`
pub const UNKNOWN_CATEGORY_NAME: &str = "UNKNOWN";

/// Detail view of a single category
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryDetail {
    #[serde(default)]
    urls: Vec<String>,
    #[serde(default)]
    db_categorized_urls: Vec<String>,
    #[serde(default)]
    configured_name: Option<String>,
}

/// The URL set of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUrls {
    /// Display name of the category
    pub name: String,

    /// Unique URLs in first-seen order
    pub urls: Vec<String>,
}

/// Removes duplicates, keeping the first occurrence of each URL in place
pub fn dedup_preserving_order<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Fetches a category's URLs
///
/// The `urls` list comes first, then `dbCategorizedUrls`; the concatenation is
/// deduplicated by first occurrence.
///
/// # Arguments
///
/// * `gateway` - The API session
/// * `category_id` - Identifier of the category to fetch
pub async fn collect_urls(
    gateway: &mut Gateway,
    category_id: &str,
) -> Result<CategoryUrls, ZiaError> {
    let path = format!("/urlCategories/{}", category_id);
    let value = gateway.get(&path).await?;
    let detail: CategoryDetail =
        serde_json::from_value(value).map_err(|e| ZiaError::UnexpectedResponse {
            endpoint: gateway.endpoint(&path),
            message: format!("category detail: {}", e),
        })?;

    let raw_count = detail.urls.len() + detail.db_categorized_urls.len();
    let urls = dedup_preserving_order(detail.urls.into_iter().chain(detail.db_categorized_urls));
    tracing::debug!(
        "Category {}: {} URLs ({} before deduplication)",
        category_id,
        urls.len(),
        raw_count
    );

    Ok(CategoryUrls {
        name: detail
            .configured_name
            .unwrap_or_else(|| UNKNOWN_CATEGORY_NAME.to_string()),
        urls,
    })
}
