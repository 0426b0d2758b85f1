//! Cache key construction
//!
//! A logical search (query, filters, language) plus a page slot maps to one
//! key. Result pages and continuation tokens share the keyspace: token slots
//! use the `token_page{N}` sentinel, which is never a valid page number.

use std::fmt;

use crate::data::{Amenities, Language, SearchFilters, SearchRequest};

/// Which slot of a logical search a key addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    /// The assembled result page with this number
    Page(u32),
    /// The continuation token returned by this upstream page
    Token(u32),
}

impl fmt::Display for PageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSlot::Page(page) => write!(f, "{}", page),
            PageSlot::Token(page) => write!(f, "token_page{}", page),
        }
    }
}

/// Trims, collapses inner whitespace and lowercases a free-text query
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn amenity_list(amenities: &Amenities) -> String {
    let flags = [
        ("parking", amenities.parking),
        ("accessibility", amenities.accessibility),
        ("outdoor_space", amenities.outdoor_space),
        ("catering", amenities.catering),
        ("accommodation", amenities.accommodation),
    ];
    flags
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(",")
}

/// Builds the key for one slot of a logical search
///
/// The free-text query goes last: every earlier field comes from a closed
/// set without `|`, so no query text can make two searches share a key.
pub fn search_key(query: &str, filters: &SearchFilters, language: Language, slot: PageSlot) -> String {
    let capacity = filters
        .min_capacity
        .map(|capacity| capacity.to_string())
        .unwrap_or_default();

    format!(
        "search|page={}|lang={}|area={}|type={}|style={}|cap={}|amenities={}|q={}",
        slot,
        language.as_str(),
        filters.area.as_str(),
        filters.venue_type.as_str(),
        filters.style.as_str(),
        capacity,
        amenity_list(&filters.amenities),
        normalize_query(query),
    )
}

/// Key of the assembled result page for a request
pub fn page_key(request: &SearchRequest) -> String {
    search_key(
        &request.query,
        &request.filters,
        request.language,
        PageSlot::Page(request.page),
    )
}

/// Key of the continuation token produced by `upstream_page` of a request's search
pub fn token_key(request: &SearchRequest, upstream_page: u32) -> String {
    search_key(
        &request.query,
        &request.filters,
        request.language,
        PageSlot::Token(upstream_page),
    )
}

/// Key of a single-venue details record
pub fn details_key(place_id: &str, language: Language) -> String {
    format!("details_{}_{}", place_id, language.as_str())
}
