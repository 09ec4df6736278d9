// src/utils/listing.rs

//! Search and paging over an already-fetched list.

use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive substring to search for.
    pub q: Option<String>,
    /// 1-based page number. The full list is returned when omitted.
    pub page: Option<usize>,
    /// Page size, clamped to 1..=100. Defaults to 20.
    pub per_page: Option<usize>,
}

impl ListParams {
    /// Normalized search term; empty when no filtering applies.
    pub fn filter(&self) -> String {
        normalize_filter(self.q.as_deref())
    }
}

pub fn normalize_filter(q: Option<&str>) -> String {
    q.map(|term| term.trim().to_lowercase()).unwrap_or_default()
}

/// Keeps the items whose `field` contains `filter`, ignoring case.
/// `filter` must already be normalized.
pub fn filter_by<T, F>(items: Vec<T>, filter: &str, field: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if filter.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| field(item).to_lowercase().contains(filter))
        .collect()
}

/// Returns the requested page, or everything when `page` is `None`.
pub fn paginate<T: Clone>(items: &[T], page: Option<usize>, per_page: Option<usize>) -> Vec<T> {
    let Some(page) = page else {
        return items.to_vec();
    };
    let per_page = per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let start = page.saturating_sub(1).saturating_mul(per_page);

    items.iter().skip(start).take(per_page).cloned().collect()
}
