//! Data models for the catalog API
//!
//! This module defines the types decoded from catalog JSON responses.

pub mod catalog;

// Re-export commonly used types
pub use catalog::{
    Creature, Encounter, LocationArea, LocationPage, NamedResource, StatEntry, TypeEntry,
};
