use std::env;
use std::io;
use std::path::PathBuf;

use log::info;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use overpass_graph::config::load_reader_config;
use overpass_graph::errors::Result;
use overpass_graph::fetch;

const DEFAULT_CONFIG_PATH: &str = "config/overpass.json";

fn setup_logging() {
    Builder::with_level("info")
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    setup_logging();

    let config_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = load_reader_config(&config_path)?;

    let data = fetch(config)?;
    info!(
        bounds = data.bounds().len(),
        nodes = data.nodes().len(),
        ways = data.ways().len(),
        relations = data.relations().len();
        "Fetched map data"
    );

    Ok(())
}
