//! Cache module for result pages, continuation tokens and venue details
//!
//! This module provides an in-memory TTL cache behind the `CacheStore` trait,
//! the key builder that normalizes logical searches into cache keys, and a
//! background task that sweeps expired entries on a fixed interval.

pub mod keys;
mod manager;
mod sweeper;

pub use keys::PageSlot;
pub use manager::{
    CacheStats, CacheStore, Clock, ManualClock, SystemClock, TtlCache, DEFAULT_TTL_HOURS,
};
pub use sweeper::SweepHandle;
