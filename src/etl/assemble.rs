use crate::data::OsmData;
use crate::etl::parse_overpass::DecodeContext;

/// Package the decoded collections. The id lookups and any leftover pending
/// members are dropped here; nothing reaches them afterwards.
pub fn assemble(ctx: DecodeContext) -> OsmData {
    let DecodeContext {
        bounds,
        nodes,
        ways,
        relations,
        ..
    } = ctx;

    OsmData::new(bounds, nodes, ways, relations)
}
