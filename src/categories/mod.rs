//! URL category handling
//!
//! This module provides:
//! - The `Category` model returned by the category listing
//! - Listing of user-defined (custom) categories
//! - Collection of a category's URL set with order-preserving deduplication
//! - Parsing of the user's category selection

mod selection;
mod urls;

pub use selection::{parse_selection, Selection};
pub use urls::{collect_urls, dedup_preserving_order, CategoryUrls, UNKNOWN_CATEGORY_NAME};

use crate::client::Gateway;
use crate::ZiaError;
use serde::Deserialize;
use std::fmt;

/// Path of the lightweight category listing
pub const CATEGORY_LIST_PATH: &str = "/urlCategories/lite";

/// A URL category as returned by the listing call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category identifier (e.g. `CUSTOM_01`)
    pub id: String,

    /// Display name
    #[serde(default)]
    pub configured_name: Option<String>,

    /// True for user-defined categories
    #[serde(default)]
    pub custom_category: bool,

    /// Category type (e.g. `URL_CATEGORY`)
    #[serde(default, rename = "type")]
    pub category_type: Option<String>,

    #[serde(default)]
    pub super_category: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Category {
    /// Name shown to the user, falling back to the id
    pub fn display_name(&self) -> &str {
        self.configured_name.as_deref().unwrap_or(&self.id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.display_name())?;
        writeln!(
            f,
            "     Type: {}",
            self.category_type.as_deref().unwrap_or("N/A")
        )?;
        write!(
            f,
            "     Super Category: {}",
            self.super_category.as_deref().unwrap_or("N/A")
        )?;
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            write!(f, "\n     Description: {}", description)?;
        }
        Ok(())
    }
}

/// Keeps only user-defined categories, preserving listing order
pub fn filter_custom(categories: Vec<Category>) -> Vec<Category> {
    categories.into_iter().filter(|c| c.custom_category).collect()
}

/// Lists the custom URL categories of the tenant
///
/// # Arguments
///
/// * `gateway` - The API session
///
/// # Returns
///
/// * `Ok(Vec<Category>)` - Custom categories in the API's response order
/// * `Err(ZiaError)` - The listing call failed or returned an unexpected shape
pub async fn list_custom_categories(gateway: &mut Gateway) -> Result<Vec<Category>, ZiaError> {
    let value = gateway.get(CATEGORY_LIST_PATH).await?;
    let categories: Vec<Category> =
        serde_json::from_value(value).map_err(|e| ZiaError::UnexpectedResponse {
            endpoint: gateway.endpoint(CATEGORY_LIST_PATH),
            message: format!("category listing: {}", e),
        })?;

    let total = categories.len();
    let custom = filter_custom(categories);
    tracing::info!(
        "Found {} custom URL categories ({} total)",
        custom.len(),
        total
    );
    Ok(custom)
}
