//! Domain types for Drift

mod catalog;
mod ids;

pub use catalog::{Catalog, TrackListing};
pub use ids::TrackId;
