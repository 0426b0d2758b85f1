//! Search request and filter types
//!
//! Every filter field has a canonical "no filter" default, so a request built
//! from partial input (missing JSON fields, unset CLI flags) is always complete.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::area::{get_area_by_id, Area, METRO_VANCOUVER};

/// Language used for keyword matching and forwarded to the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub const VARIANTS: [Language; 2] = [Language::En, Language::Fr];

    /// Provider language code
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

/// Area filter; `All` disables the distance check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaFilter {
    #[default]
    All,
    Downtown,
    NorthShore,
    Richmond,
    Burnaby,
}

impl AreaFilter {
    pub const VARIANTS: [AreaFilter; 5] = [
        AreaFilter::All,
        AreaFilter::Downtown,
        AreaFilter::NorthShore,
        AreaFilter::Richmond,
        AreaFilter::Burnaby,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AreaFilter::All => "all",
            AreaFilter::Downtown => "downtown",
            AreaFilter::NorthShore => "north_shore",
            AreaFilter::Richmond => "richmond",
            AreaFilter::Burnaby => "burnaby",
        }
    }

    /// The named area this filter restricts to, `None` for `All`
    pub fn area(&self) -> Option<&'static Area> {
        match self {
            AreaFilter::All => None,
            other => get_area_by_id(other.as_str()),
        }
    }

    /// Region used to bias the upstream search
    pub fn search_region(&self) -> &'static Area {
        self.area().unwrap_or(&METRO_VANCOUVER)
    }
}

/// Venue category filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueTypeFilter {
    #[default]
    All,
    Hotel,
    Restaurant,
    EventHall,
    Garden,
    Museum,
}

impl VenueTypeFilter {
    pub const VARIANTS: [VenueTypeFilter; 6] = [
        VenueTypeFilter::All,
        VenueTypeFilter::Hotel,
        VenueTypeFilter::Restaurant,
        VenueTypeFilter::EventHall,
        VenueTypeFilter::Garden,
        VenueTypeFilter::Museum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VenueTypeFilter::All => "all",
            VenueTypeFilter::Hotel => "hotel",
            VenueTypeFilter::Restaurant => "restaurant",
            VenueTypeFilter::EventHall => "event_hall",
            VenueTypeFilter::Garden => "garden",
            VenueTypeFilter::Museum => "museum",
        }
    }

    /// Provider category used to narrow the upstream search, where one exists
    pub fn provider_category(&self) -> Option<&'static str> {
        match self {
            VenueTypeFilter::Hotel => Some("lodging"),
            VenueTypeFilter::Restaurant => Some("restaurant"),
            VenueTypeFilter::Garden => Some("park"),
            VenueTypeFilter::Museum => Some("museum"),
            VenueTypeFilter::All | VenueTypeFilter::EventHall => None,
        }
    }
}

/// Venue style filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleFilter {
    #[default]
    All,
    Modern,
    Classic,
    Luxury,
    Urban,
}

impl StyleFilter {
    pub const VARIANTS: [StyleFilter; 5] = [
        StyleFilter::All,
        StyleFilter::Modern,
        StyleFilter::Classic,
        StyleFilter::Luxury,
        StyleFilter::Urban,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleFilter::All => "all",
            StyleFilter::Modern => "modern",
            StyleFilter::Classic => "classic",
            StyleFilter::Luxury => "luxury",
            StyleFilter::Urban => "urban",
        }
    }
}

macro_rules! impl_filter_parsing {
    ($($ty:ident => $what:literal),+ $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let wanted = s.trim().to_lowercase().replace('-', "_");
                    Self::VARIANTS
                        .iter()
                        .copied()
                        .find(|variant| variant.as_str() == wanted)
                        .ok_or_else(|| {
                            let valid: Vec<&str> =
                                Self::VARIANTS.iter().map(|v| v.as_str()).collect();
                            format!("invalid {} '{}'. Valid values: {}", $what, s, valid.join(", "))
                        })
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

impl_filter_parsing! {
    Language => "language",
    AreaFilter => "area",
    VenueTypeFilter => "venue type",
    StyleFilter => "style",
}

/// Amenity requirements; `false` means "not required"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Amenities {
    pub parking: bool,
    pub accessibility: bool,
    pub outdoor_space: bool,
    pub catering: bool,
    pub accommodation: bool,
}

impl Amenities {
    /// Whether any amenity is required
    pub fn any(&self) -> bool {
        self.parking || self.accessibility || self.outdoor_space || self.catering || self.accommodation
    }
}

/// The full set of local filters for a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilters {
    pub area: AreaFilter,
    #[serde(alias = "type")]
    pub venue_type: VenueTypeFilter,
    pub style: StyleFilter,
    /// Minimum estimated guest capacity
    pub min_capacity: Option<u32>,
    pub amenities: Amenities,
}

impl SearchFilters {
    /// Whether any filter differs from its "no filter" default
    pub fn is_active(&self) -> bool {
        self.area != AreaFilter::All
            || self.venue_type != VenueTypeFilter::All
            || self.style != StyleFilter::All
            || self.min_capacity.is_some()
            || self.amenities.any()
    }
}

/// One logical search: query, filters, page and language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub filters: SearchFilters,
    /// 1-based page number
    pub page: u32,
    pub language: Language,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            filters: SearchFilters::default(),
            page: 1,
            language: Language::default(),
        }
    }
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}
