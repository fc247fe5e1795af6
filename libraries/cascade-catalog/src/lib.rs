//! Cascade Catalog
//!
//! The catalog is the ordered, read-only list of playable songs for a session.
//!
//! This crate provides:
//! - CSV import (quoted fields, CRLF, optional metadata columns)
//! - JSON import (an array of `Song` values)
//! - Id lookup and catalog-order navigation (`next_after`)
//! - Recommendation resolution against the catalog
//! - Library browsing: trending songs, popular artists, search
//!
//! Malformed rows never reach the playback state machine: they are skipped and
//! reported through `tracing` and the returned [`ImportStats`].
//!
//! # Example
//!
//! ```rust
//! use cascade_catalog::Catalog;
//!
//! let csv = "track_name,artist(s)_name\nSeven Nation Army,The White Stripes\n";
//! let catalog = Catalog::from_csv_str(csv);
//!
//! assert_eq!(catalog.len(), 1);
//! assert_eq!(catalog.songs()[0].id.as_str(), "Seven Nation Army-0");
//! ```

mod browse;
mod catalog;
mod csv;

pub use browse::ArtistCount;
pub use catalog::{Catalog, CatalogFormat};
pub use csv::{parse_records, parse_songs, CsvImport, ImportStats};
