//! # catalog
//!
//! Core of an educational course catalog.
//!
//! `catalog` reads the catalog's four collections (subjects, difficulties,
//! grades and courses), filters courses the way the catalog's filter chips
//! do, prepares course cards for display and provides the admin forms used
//! to edit the taxonomy.
//!
//! ## Features
//!
//! - **Sources**: HTTP API, a directory of JSON files, or in-memory data
//! - **Resources**: fetch state with staleness and discarding of superseded responses
//! - **Lookups**: taxonomy records indexed by `type`, memoised per fetch
//! - **Filtering**: subject / difficulty / grade selection
//! - **Cards**: Russian date formatting and description enrichment
//! - **Admin forms**: subject, difficulty and course forms built on `formtree`
//!
//! ## Modules
//!
//! - [`config`] - `.catalog.toml` loading and placeholder expansion
//! - [`ctx`] - Application context and catalog state
//! - [`describe`] - Course card display strings
//! - [`filter`] - Course filter predicate
//! - [`forms`] - Admin forms for taxonomy and course records
//! - [`lookup`] - Lookup tables keyed by record `type`
//! - [`records`] - Catalog record types
//! - [`resource`] - Fetch state of a single collection
//! - [`source`] - Data sources
//!
//! ## Example
//!
//! ```rust
//! use catalog::{filter::matches, records::Course};
//!
//! let course = Course {
//!     subjects: vec!["ai".into(), "programming".into()],
//!     ..Default::default()
//! };
//! assert!(matches(&course, &["ai"], &[] as &[&str], &[]));
//! assert!(!matches(&course, &["robotics"], &[] as &[&str], &[]));
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

/// Configuration file handling.
pub mod config;

/// Application context and catalog state.
pub mod ctx;

/// Course card display strings.
pub mod describe;

/// Client-side course filtering.
pub mod filter;

/// Admin forms.
pub mod forms;

/// Lookup tables keyed by `type`.
pub mod lookup;

/// Catalog record types.
pub mod records;

/// Fetch state of a single collection.
pub mod resource;

/// Data sources.
pub mod source;

pub use formtree;
