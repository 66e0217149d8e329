//! API Module
//!
//! Client for the remote catalog API.
//!
//! # Endpoints
//! - `GET location-area/` - Paginated listing of location areas
//! - `GET location-area/{name}/` - One area and its encounters
//! - `GET pokemon/{name}/` - One creature

pub mod client;

pub use client::CatalogClient;
