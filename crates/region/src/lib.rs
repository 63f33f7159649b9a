//! Study-region boundaries and point filtering.
//!
//! A [`RegionBoundary`] is the union of one or more polygons given in
//! decimal degrees. It is built once, indexed with an R-tree over the
//! polygon envelopes, and then answers containment queries for both the
//! observation filter and the grid mask.
//!
//! # Edge convention
//!
//! Whether a position lying exactly on the boundary counts as inside is
//! never implicit: every query takes an [`EdgePolicy`].
//!
//! ```text
//! Inclusive  on-edge => inside   ("intersects")
//! Exclusive  on-edge => outside  ("within")
//! ```
//!
//! # Example
//!
//! ```
//! use region::{EdgePolicy, RegionBoundary};
//!
//! let boundary = RegionBoundary::from_wkt("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
//! assert!(boundary.contains(0.5, 0.5, EdgePolicy::Exclusive));
//! assert!(boundary.contains(0.0, 0.5, EdgePolicy::Inclusive));
//! assert!(!boundary.contains(0.0, 0.5, EdgePolicy::Exclusive));
//! ```

pub mod boundary;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod geojson;
pub mod polygon;
pub mod shp;
pub mod wkt;

pub use boundary::RegionBoundary;
pub use catalog::{BoundaryCatalog, BoundarySource};
pub use error::{RegionError, Result};
pub use filter::RegionFilter;
pub use polygon::{EdgePolicy, Location, Polygon, Ring};
