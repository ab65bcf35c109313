#![deny(missing_debug_implementations)]

//! # reqmap-entities
//!
//! Plain domain entities for turning service requests into map points.
//!
//! The entities only contain generic functionality (coordinates, distances,
//! address keys, cached geocodes) without any knowledge about how requests
//! are fetched, geocoded or rendered.

pub mod address;
pub mod geo;
pub mod geocode;
pub mod region;
pub mod request;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
