pub mod assemble;
pub mod parse_overpass;
pub mod resolve_members;

use std::io::Read;

use log::{error, info};

use crate::config::ReaderConfig;
use crate::data::OsmData;
use crate::errors::Result;
use crate::query::OverpassQuery;
use crate::transport::{HttpTransport, Transport};

use self::assemble::assemble;
use self::parse_overpass::{parse, DecodeContext};
use self::resolve_members::resolve_members;

const ETL_NAME: &str = "overpass";

pub trait Etl {
    type Input;
    type Staged;
    type Output;

    fn etl_name(&self) -> &str;

    fn extract(&mut self) -> Result<Self::Input>;
    fn transform(&mut self, input: Self::Input) -> Result<Self::Staged>;
    fn load(&mut self, staged: Self::Staged) -> Self::Output;

    fn process(&mut self) -> Result<Self::Output> {
        info!(etl_name = self.etl_name(); "Starting ETL process");

        info!(etl_name = self.etl_name(); "Extracting");
        let input = self.extract();
        let input = log_failure(self.etl_name(), "Extraction", input)?;

        info!(etl_name = self.etl_name(); "Transforming");
        let staged = self.transform(input);
        let staged = log_failure(self.etl_name(), "Transformation", staged)?;

        info!(etl_name = self.etl_name(); "Loading");
        let output = self.load(staged);

        info!(etl_name = self.etl_name(); "Process finished");
        Ok(output)
    }
}

fn log_failure<T>(etl_name: &str, phase: &str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        error!(etl_name = etl_name, phase = phase, err = err.message.as_str(); "ETL phase failed with error");
    }
    result
}

/// Fetches one bounding box from an Overpass endpoint and builds its graph.
pub struct OverpassEtl<T: Transport> {
    config: ReaderConfig,
    transport: T,
}

impl<T: Transport> OverpassEtl<T> {
    pub fn new(config: ReaderConfig, transport: T) -> Self {
        OverpassEtl { config, transport }
    }

    pub fn request_url(&self) -> Result<String> {
        let query = OverpassQuery::new(&self.config.query, self.config.bounding_box())?;
        Ok(query.url(&self.config.base_url))
    }
}

impl<T: Transport> Etl for OverpassEtl<T> {
    type Input = Box<dyn Read>;
    type Staged = DecodeContext;
    type Output = OsmData;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn extract(&mut self) -> Result<Self::Input> {
        let url = self.request_url()?;
        info!(etl_name = ETL_NAME, url = url.as_str(); "Requesting document");
        self.transport.open(&url)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Staged> {
        decode_and_resolve(input)
    }

    fn load(&mut self, staged: Self::Staged) -> Self::Output {
        assemble(staged)
    }
}

fn decode_and_resolve<R: Read>(reader: R) -> Result<DecodeContext> {
    let mut ctx = DecodeContext::new();
    parse(reader, &mut ctx)?;
    let dropped_members = resolve_members(&mut ctx);

    info!(
        nodes = ctx.node_count(),
        ways = ctx.way_count(),
        relations = ctx.relation_count(),
        dropped_way_nodes = ctx.dropped_way_nodes(),
        dropped_members = dropped_members;
        "Decoded document"
    );
    Ok(ctx)
}

/// Decode, resolve and assemble one document already available as a stream.
pub fn decode_document<R: Read>(reader: R) -> Result<OsmData> {
    Ok(assemble(decode_and_resolve(reader)?))
}

/// Fetch the configured bounding box over HTTP.
pub fn fetch(config: ReaderConfig) -> Result<OsmData> {
    let transport = HttpTransport::new(config.connect_timeout());
    OverpassEtl::new(config, transport).process()
}
