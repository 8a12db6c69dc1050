//! Drift Catalog Client
//!
//! HTTP client for the Drift catalog service. Implements
//! [`drift_core::CatalogSource`] so the playback driver can load its catalog
//! from a running server.
//!
//! # Example
//!
//! ```ignore
//! use drift_catalog_client::HttpCatalogClient;
//! use drift_core::CatalogSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpCatalogClient::new("http://localhost:8080")?;
//!
//!     let catalog = client.list_tracks().await?;
//!     if catalog.is_empty() {
//!         println!("No tracks yet, add files to the music directory");
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::{HttpCatalogClient, DEFAULT_EXTENSION};
pub use error::{CatalogClientError, Result};
