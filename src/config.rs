use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{Error, ErrorKind, Result};
use crate::query::{BoundingBox, Coordinate};

const DEFAULT_BASE_URL: &str = "http://city.informatik.uni-bremen.de/oapi/interpreter";
const DEFAULT_QUERY: &str = "(node{{bbox}};way(bn);rel(bw););out;";
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overpass QL with `{{bbox}}` placeholders.
    #[serde(default = "default_query")]
    pub query: String,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

impl ReaderConfig {
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_corners(
            Coordinate { lat: self.top, lon: self.left },
            Coordinate { lat: self.bottom, lon: self.right },
        )
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

pub fn load_reader_config(path: &Path) -> Result<ReaderConfig> {
    let file = File::open(path).map_err(|err| {
        Error::new(ErrorKind::Config, format!("Could not open config file {}: {err}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| {
        Error::new(ErrorKind::Config, format!("Could not parse config {}: {err}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: ReaderConfig = serde_json::from_str(
            r#"{"left": -0.2, "right": 0.1, "top": 51.6, "bottom": 51.4}"#,
        ).expect("Could not parse config");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.query, DEFAULT_QUERY);
        assert_eq!(config.connect_timeout(), Duration::from_secs(15));
        assert_eq!(
            config.bounding_box(),
            BoundingBox { south: 51.4, west: -0.2, north: 51.6, east: 0.1 }
        );
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        let err = load_reader_config(Path::new("does/not/exist.json")).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Config);
    }
}
