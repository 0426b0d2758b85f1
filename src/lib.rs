//! venuefinder library
//!
//! Venue discovery over a paginated place-search provider: a TTL cache for
//! result pages and continuation tokens, local geo/attribute filters, and the
//! search orchestrator that ties them together.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod filters;
pub mod search;
pub mod serve;

pub use search::{SearchError, VenueSearch};
