//! Reads Overpass API JSON documents into an in-memory OSM graph.
//!
//! A document is decoded in one streaming pass, relation members are resolved
//! once every element is known, and the result is packaged as an immutable
//! [`OsmData`](data::OsmData).

pub mod config;
pub mod data;
pub mod errors;
pub mod etl;
pub mod query;
pub mod transport;

pub use crate::data::OsmData;
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::etl::{decode_document, fetch};
