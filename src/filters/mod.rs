//! Local venue filters
//!
//! Criteria the provider cannot apply natively. Each filter is a pure
//! function of a venue; a venue survives only if it passes every active one.

pub mod geo;
pub mod heuristics;
pub mod keywords;

use crate::data::{Language, SearchFilters, StyleFilter, Venue, VenueTypeFilter};
use heuristics::{estimated_capacity, has_amenity, style_tags, Amenity};
use keywords::{type_keywords, type_tags};

/// Whether the venue passes every active filter
pub fn passes(venue: &Venue, filters: &SearchFilters, language: Language) -> bool {
    matches_area(venue, filters)
        && matches_type(venue, filters.venue_type, language)
        && matches_style(venue, filters.style, language)
        && matches_capacity(venue, filters.min_capacity)
        && matches_amenities(venue, filters, language)
}

/// Keeps the venues that pass every active filter, preserving order
pub fn apply(venues: Vec<Venue>, filters: &SearchFilters, language: Language) -> Vec<Venue> {
    if !filters.is_active() {
        return venues;
    }
    venues
        .into_iter()
        .filter(|venue| passes(venue, filters, language))
        .collect()
}

fn matches_area(venue: &Venue, filters: &SearchFilters) -> bool {
    match filters.area.area() {
        Some(area) => geo::within_area(venue, area),
        None => true,
    }
}

fn matches_type(venue: &Venue, venue_type: VenueTypeFilter, language: Language) -> bool {
    let Some(table) = type_keywords(venue_type) else {
        return true;
    };
    table.matches(&venue.searchable_text(), language) || venue.has_category(type_tags(venue_type))
}

fn matches_style(venue: &Venue, style: StyleFilter, language: Language) -> bool {
    style == StyleFilter::All || style_tags(venue, language).contains(&style)
}

fn matches_capacity(venue: &Venue, min_capacity: Option<u32>) -> bool {
    min_capacity.map_or(true, |floor| estimated_capacity(venue) >= floor)
}

fn matches_amenities(venue: &Venue, filters: &SearchFilters, language: Language) -> bool {
    let amenities = &filters.amenities;
    let required = [
        (amenities.parking, Amenity::Parking),
        (amenities.accessibility, Amenity::Accessibility),
        (amenities.outdoor_space, Amenity::OutdoorSpace),
        (amenities.catering, Amenity::Catering),
        (amenities.accommodation, Amenity::Accommodation),
    ];
    required
        .iter()
        .filter(|(wanted, _)| *wanted)
        .all(|(_, amenity)| has_amenity(venue, *amenity, language))
}
