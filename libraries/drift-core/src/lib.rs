//! Drift Core
//!
//! Platform-agnostic types and traits shared across the Drift workspace.
//!
//! This crate provides:
//! - **Domain Types**: `TrackId`, `Catalog`, `TrackListing`
//! - **Core Traits**: `CatalogSource`
//! - **Error Handling**: `CatalogError` and its `Result` alias
//!
//! # Example
//!
//! ```rust
//! use drift_core::{Catalog, TrackId};
//!
//! let catalog = Catalog::from_names(["b.mp3", "a.mp3", "a.mp3"]);
//!
//! assert_eq!(catalog.len(), 2);
//! assert!(catalog.contains(&TrackId::new("a.mp3")));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CatalogError, Result};
pub use traits::CatalogSource;
pub use types::{Catalog, TrackId, TrackListing};
