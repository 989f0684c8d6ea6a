//! Cache module for storing raw API responses in memory
//!
//! This module provides an expiring key/value cache keyed by request URL. Entries
//! are stamped when they are added and removed by a periodic background sweep;
//! lookups never look at entry age. Nothing is persisted across runs.

mod expiring;

pub use expiring::{ExpiringCache, ReaperHandle};
