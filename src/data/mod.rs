//! Core data models for venuefinder
//!
//! This module contains the types shared by the cache, the upstream client,
//! the filters and the search orchestrator: raw venues as the provider returns
//! them, assembled result pages, continuation tokens and detail records.

pub mod area;
pub mod places;
pub mod request;

pub use area::{all_areas, Area};
pub use places::{PlacesClient, PlacesError, PlacesProvider, TextSearch, UpstreamPage};
pub use request::{
    Amenities, AreaFilter, Language, SearchFilters, SearchRequest, StyleFilter, VenueTypeFilter,
};

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A venue as returned by one upstream search page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    /// Provider-assigned identifier
    pub place_id: String,
    pub name: String,
    /// Formatted street address
    pub address: String,
    pub location: GeoPoint,
    /// Provider category tags (e.g. `lodging`, `restaurant`)
    pub categories: Vec<String>,
    /// Provider price level, 0 (free) to 4 (very expensive)
    pub price_level: Option<u8>,
    pub rating: Option<f32>,
    /// Number of ratings the provider holds for the venue
    pub rating_count: u32,
    /// Opaque photo references, resolved into `photo_urls` by the orchestrator
    #[serde(default, skip_serializing)]
    pub photo_refs: Vec<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

impl Venue {
    /// Lowercased name and address, used by the keyword heuristics
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.name, self.address).to_lowercase()
    }

    /// Whether the provider tagged the venue with any of `tags`
    pub fn has_category(&self, tags: &[&str]) -> bool {
        self.categories
            .iter()
            .any(|category| tags.iter().any(|tag| category.eq_ignore_ascii_case(tag)))
    }
}

/// Full record for a single venue, served by the details lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueDetails {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Link to the provider's own page for the venue
    pub maps_url: Option<String>,
    pub location: GeoPoint,
    pub categories: Vec<String>,
    pub price_level: Option<u8>,
    pub rating: Option<f32>,
    pub rating_count: u32,
    /// Human-readable opening hours, one line per weekday
    pub opening_hours: Vec<String>,
    pub photo_urls: Vec<String>,
}

/// An assembled page of filtered venues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub venues: Vec<Venue>,
    pub has_more: bool,
    pub requested_page: u32,
}

/// Opaque provider handle for the next upstream page of a query
///
/// Cached for the full cache TTL, but the provider only honours it for a few
/// minutes after issuing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationToken(pub String);

impl ContinuationToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything the search cache can hold under one key
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Page(ResultPage),
    Token(ContinuationToken),
    Details(VenueDetails),
}

/// Response of the inbound search operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<Venue>,
    pub has_more: bool,
    pub current_page: u32,
    pub total_results: usize,
}

impl From<ResultPage> for SearchResponse {
    fn from(page: ResultPage) -> Self {
        Self {
            total_results: page.venues.len(),
            results: page.venues,
            has_more: page.has_more,
            current_page: page.requested_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_venue() -> Venue {
        Venue {
            place_id: "abc".to_string(),
            name: "Rosewood Hotel Georgia".to_string(),
            address: "801 W Georgia St, Vancouver".to_string(),
            location: GeoPoint::new(49.2834, -123.1185),
            categories: vec!["lodging".to_string(), "point_of_interest".to_string()],
            price_level: Some(4),
            rating: Some(4.6),
            rating_count: 2100,
            photo_refs: vec!["ref-1".to_string()],
            photo_urls: Vec::new(),
        }
    }

    #[test]
    fn test_searchable_text_is_lowercase_name_and_address() {
        let venue = create_test_venue();
        assert_eq!(
            venue.searchable_text(),
            "rosewood hotel georgia 801 w georgia st, vancouver"
        );
    }

    #[test]
    fn test_has_category_ignores_case() {
        let venue = create_test_venue();
        assert!(venue.has_category(&["LODGING"]));
        assert!(!venue.has_category(&["museum", "park"]));
    }

    #[test]
    fn test_search_response_from_result_page() {
        let page = ResultPage {
            venues: vec![create_test_venue(), create_test_venue()],
            has_more: true,
            requested_page: 3,
        };

        let response = SearchResponse::from(page);

        assert_eq!(response.total_results, 2);
        assert_eq!(response.current_page, 3);
        assert!(response.has_more);
    }

    #[test]
    fn test_search_response_uses_camel_case_fields() {
        let response = SearchResponse {
            results: vec![create_test_venue()],
            has_more: false,
            current_page: 1,
            total_results: 1,
        };

        let json = serde_json::to_string(&response).expect("Should serialize");

        assert!(json.contains("\"hasMore\":false"));
        assert!(json.contains("\"currentPage\":1"));
        assert!(json.contains("\"totalResults\":1"));
        assert!(json.contains("\"placeId\":\"abc\""));
        assert!(!json.contains("photoRefs"), "photo refs stay internal");
    }
}
