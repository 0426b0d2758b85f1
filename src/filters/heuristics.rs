//! Attribute heuristics for venues
//!
//! The provider exposes no style, capacity or amenity data, so these are
//! inferred from names, addresses, category tags, price level and ratings.
//! None of the results are ground truth. Absence of evidence for an amenity
//! is treated as absence of the amenity.

use std::collections::HashSet;

use super::keywords::{contains_word, style_keywords, KeywordTable};
use crate::data::{Language, StyleFilter, Venue};

/// Price level from which a venue counts as upscale
const UPSCALE_PRICE_LEVEL: u8 = 3;

/// Rating from which a venue counts as luxury
const LUXURY_RATING: f32 = 4.5;

/// Capacity assumed for any venue, however few reviews it has
const MIN_ESTIMATED_CAPACITY: f64 = 30.0;

/// Guests assumed per provider review
const GUESTS_PER_REVIEW: f64 = 1.5;

/// Amenities a search can require
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amenity {
    Parking,
    Accessibility,
    OutdoorSpace,
    Catering,
    Accommodation,
}

fn is_hotel(venue: &Venue, text: &str) -> bool {
    venue.has_category(&["lodging"]) || contains_word(text, "hotel") || contains_word(text, "hôtel")
}

fn is_upscale(venue: &Venue) -> bool {
    venue.price_level.is_some_and(|level| level >= UPSCALE_PRICE_LEVEL)
}

/// Derives the set of styles a venue plausibly has
///
/// Keyword matches per style, plus:
/// - high price level or rating adds luxury
/// - hotels are modern and luxury
/// - museums are classic
/// - parks and gardens are urban
pub fn style_tags(venue: &Venue, language: Language) -> HashSet<StyleFilter> {
    let text = venue.searchable_text();
    let mut tags: HashSet<StyleFilter> = StyleFilter::VARIANTS
        .iter()
        .copied()
        .filter(|style| style_keywords(*style).is_some_and(|table| table.matches(&text, language)))
        .collect();

    if is_upscale(venue) || venue.rating.is_some_and(|rating| rating >= LUXURY_RATING) {
        tags.insert(StyleFilter::Luxury);
    }
    if is_hotel(venue, &text) {
        tags.insert(StyleFilter::Modern);
        tags.insert(StyleFilter::Luxury);
    }
    if venue.has_category(&["museum"]) || contains_word(&text, "museum") || contains_word(&text, "musée") {
        tags.insert(StyleFilter::Classic);
    }
    if venue.has_category(&["park"])
        || ["park", "garden", "parc", "jardin"]
            .iter()
            .any(|word| contains_word(&text, word))
    {
        tags.insert(StyleFilter::Urban);
    }

    tags
}

/// Estimates how many guests a venue can hold
///
/// `max(reviews * 1.5, 30)`, doubled for hotels and conference centres.
pub fn estimated_capacity(venue: &Venue) -> u32 {
    let text = venue.searchable_text();
    let mut estimate = (f64::from(venue.rating_count) * GUESTS_PER_REVIEW).max(MIN_ESTIMATED_CAPACITY);

    let name = venue.name.to_lowercase();
    if is_hotel(venue, &text) || contains_word(&name, "center") || contains_word(&name, "centre") {
        estimate *= 2.0;
    }

    estimate.min(f64::from(u32::MAX)) as u32
}

static PARKING: KeywordTable = KeywordTable {
    en: &["parking", "garage", "valet"],
    fr: &["stationnement", "parking", "garage", "voiturier"],
};

static ACCESSIBILITY: KeywordTable = KeywordTable {
    en: &["accessible", "wheelchair", "barrier-free"],
    fr: &["accessible", "fauteuil roulant", "sans obstacle"],
};

static OUTDOOR: KeywordTable = KeywordTable {
    en: &["garden", "gardens", "park", "terrace", "patio", "rooftop", "beach", "courtyard", "lawn"],
    fr: &["jardin", "jardins", "parc", "terrasse", "patio", "toit", "plage", "cour"],
};

static CATERING: KeywordTable = KeywordTable {
    en: &["catering", "restaurant", "bistro", "kitchen", "dining", "banquet"],
    fr: &["traiteur", "restaurant", "bistro", "cuisine", "banquet"],
};

static ACCOMMODATION: KeywordTable = KeywordTable {
    en: &["hotel", "inn", "resort", "lodge", "suites", "b&b"],
    fr: &["hôtel", "hotel", "auberge", "gîte", "suites"],
};

/// Whether the venue shows evidence of an amenity
pub fn has_amenity(venue: &Venue, amenity: Amenity, language: Language) -> bool {
    let text = venue.searchable_text();
    match amenity {
        Amenity::Parking => {
            PARKING.matches(&text, language)
                || is_upscale(venue)
                || venue.has_category(&["lodging", "parking", "shopping_mall", "stadium"])
        }
        Amenity::Accessibility => {
            ACCESSIBILITY.matches(&text, language)
                || is_upscale(venue)
                || venue.has_category(&["lodging", "museum", "shopping_mall", "library"])
        }
        Amenity::OutdoorSpace => {
            OUTDOOR.matches(&text, language)
                || venue.has_category(&["park", "campground", "natural_feature", "zoo"])
        }
        Amenity::Catering => {
            CATERING.matches(&text, language)
                || venue.has_category(&["restaurant", "food", "meal_delivery", "bar", "cafe", "lodging"])
        }
        Amenity::Accommodation => {
            ACCOMMODATION.matches(&text, language) || venue.has_category(&["lodging"])
        }
    }
}
