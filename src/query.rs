use std::fmt;

use regex::{NoExpand, Regex};
use serde::Deserialize;
use url::form_urlencoded;

use crate::errors::Result;

const BBOX_PLACEHOLDER: &str = r"\{\{\s*bbox\s*\}\}";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Box spanned by two opposite corners, given in any order.
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        BoundingBox {
            south: a.lat.min(b.lat),
            west: a.lon.min(b.lon),
            north: a.lat.max(b.lat),
            east: a.lon.max(b.lon),
        }
    }
}

/// Overpass QL form: `(south,west,north,east)`.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.south, self.west, self.north, self.east)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverpassQuery {
    query: String,
}

impl OverpassQuery {
    /// Substitute `bbox` for every `{{bbox}}` placeholder in `template`.
    pub fn new(template: &str, bbox: BoundingBox) -> Result<Self> {
        let placeholder = Regex::new(BBOX_PLACEHOLDER)?;
        let bbox = bbox.to_string();
        Ok(OverpassQuery {
            query: placeholder.replace_all(template, NoExpand(&bbox)).into_owned(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Request URL asking `base_url` for the query's result as JSON.
    pub fn url(&self, base_url: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(self.query.as_bytes()).collect();
        format!("{base_url}?data=[out:json];{encoded}")
    }
}
