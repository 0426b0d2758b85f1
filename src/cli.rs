//! Command-line interface parsing for venuefinder
//!
//! This module handles parsing of CLI arguments using clap. Filter flags map
//! one-to-one onto `SearchFilters`; anything left unset takes its "no filter"
//! default.

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::data::{
    Amenities, AreaFilter, Language, SearchFilters, SearchRequest, StyleFilter, VenueTypeFilter,
};

/// Error types for CLI and line-protocol input
#[derive(Debug, Error)]
pub enum CliError {
    /// A request line could not be understood
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// venuefinder - search event venues through a place-search provider
#[derive(Parser, Debug)]
#[command(name = "venuefinder")]
#[command(about = "Venue discovery search with cached, resumable pagination")]
#[command(version)]
pub struct Cli {
    /// Provider API key
    #[arg(long, env = "PLACES_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Language for keyword matching and provider results (en, fr)
    #[arg(long, global = true, value_name = "LANG")]
    pub language: Option<Language>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one search and print the result page as JSON
    Search(SearchArgs),

    /// Print the full record for one venue as JSON
    Details {
        /// Provider place identifier
        place_id: String,
    },

    /// Answer newline-delimited JSON requests on stdin until EOF
    ///
    /// Each line is one of:
    ///   {"op":"search","query":"...","filters":{...},"page":1}
    ///   {"op":"details","placeId":"..."}
    ///   {"op":"stats"}
    Serve,
}

/// Search flags
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    #[arg(default_value = "")]
    pub query: String,

    /// Area: all, downtown, north_shore, richmond, burnaby
    #[arg(long, default_value_t = AreaFilter::All)]
    pub area: AreaFilter,

    /// Venue type: all, hotel, restaurant, event_hall, garden, museum
    #[arg(long = "type", value_name = "TYPE", default_value_t = VenueTypeFilter::All)]
    pub venue_type: VenueTypeFilter,

    /// Style: all, modern, classic, luxury, urban
    #[arg(long, default_value_t = StyleFilter::All)]
    pub style: StyleFilter,

    /// Minimum estimated guest capacity
    #[arg(long, value_name = "GUESTS")]
    pub min_capacity: Option<u32>,

    #[arg(long)]
    pub parking: bool,

    #[arg(long)]
    pub accessibility: bool,

    #[arg(long)]
    pub outdoor_space: bool,

    #[arg(long)]
    pub catering: bool,

    #[arg(long)]
    pub accommodation: bool,

    /// Result page, starting at 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

impl SearchArgs {
    /// Builds the search request these flags describe
    pub fn to_request(&self, language: Language) -> SearchRequest {
        let filters = SearchFilters {
            area: self.area,
            venue_type: self.venue_type,
            style: self.style,
            min_capacity: self.min_capacity,
            amenities: Amenities {
                parking: self.parking,
                accessibility: self.accessibility,
                outdoor_space: self.outdoor_space,
                catering: self.catering,
                accommodation: self.accommodation,
            },
        };

        SearchRequest::new(self.query.clone())
            .with_filters(filters)
            .with_page(self.page)
            .with_language(language)
    }
}
