use std::collections::HashMap;
use std::fmt;
use std::io::{BufReader, Read};

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::data::osm::{
    Bound, ElementKind, Node, NodeRef, OsmId, Relation, RelationRef, TagSet, Way, WayRef,
};
use crate::errors::Result;

/// A relation member as declared in the document, before its target is looked up.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PendingMember {
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: ElementKind,
    #[serde(rename = "ref", default)]
    pub id: OsmId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

fn unknown_kind() -> ElementKind {
    ElementKind::Unknown
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scratch state of one decode invocation: the growing element collections, the
/// id lookups used to stitch references together, and the relation members
/// still waiting for resolution.
#[derive(Debug)]
pub struct DecodeContext {
    pub(crate) bounds: Vec<Bound>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) ways: Vec<Way>,
    pub(crate) relations: Vec<Relation>,
    pub(crate) nodes_by_id: HashMap<OsmId, NodeRef>,
    pub(crate) ways_by_id: HashMap<OsmId, WayRef>,
    pub(crate) relations_by_id: HashMap<OsmId, RelationRef>,
    pub(crate) pending_members: Vec<(RelationRef, Vec<PendingMember>)>,
    pub(crate) dropped_way_nodes: usize,
}

impl Default for DecodeContext {
    fn default() -> Self {
        DecodeContext::new()
    }
}

impl DecodeContext {
    pub fn new() -> Self {
        DecodeContext {
            bounds: Vec::new(),
            nodes: Vec::with_capacity(10_000),
            ways: Vec::with_capacity(1_000),
            relations: Vec::with_capacity(100),
            nodes_by_id: HashMap::new(),
            ways_by_id: HashMap::new(),
            relations_by_id: HashMap::new(),
            pending_members: Vec::new(),
            dropped_way_nodes: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Way node ids that were not known when their way was decoded.
    pub fn dropped_way_nodes(&self) -> usize {
        self.dropped_way_nodes
    }

    fn add_node(&mut self, node: Node) {
        let node_ref = NodeRef(self.nodes.len());
        self.nodes_by_id.insert(node.id, node_ref);
        self.nodes.push(node);
    }

    fn add_way(&mut self, way: Way) {
        let way_ref = WayRef(self.ways.len());
        self.ways_by_id.insert(way.id, way_ref);
        self.ways.push(way);
    }

    fn add_relation(&mut self, id: OsmId, tags: TagSet, members: Vec<PendingMember>) {
        let relation_ref = RelationRef(self.relations.len());
        self.relations.push(Relation {
            id,
            tags,
            members: Vec::with_capacity(members.len()),
        });
        self.relations_by_id.insert(id, relation_ref);
        if !members.is_empty() {
            self.pending_members.push((relation_ref, members));
        }
    }
}

/// Decode every element in `reader` into `ctx`.
///
/// The input is read through a pull tokenizer and never held in memory as a
/// whole. Several top-level values may follow each other. Ways only see nodes
/// decoded before them; relation members are left pending for
/// [`resolve_members`](super::resolve_members::resolve_members).
pub fn parse<R: Read>(reader: R, ctx: &mut DecodeContext) -> Result<()> {
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(reader));
    while deserializer.end().is_err() {
        Scan { ctx: &mut *ctx }.deserialize(&mut deserializer)?;
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum ScanField {
    Type,
    Bounds,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum NodeField {
    Id,
    Lat,
    Lon,
    Tags,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum WayField {
    Id,
    Nodes,
    Tags,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum RelationField {
    Id,
    Members,
    Tags,
    #[serde(other)]
    Other,
}

/// Walks any JSON value looking for element objects.
struct Scan<'a> {
    ctx: &'a mut DecodeContext,
}

impl<'de> DeserializeSeed<'de> for Scan<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Scan<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an Overpass JSON document")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        let ctx = self.ctx;
        while seq.next_element_seed(Scan { ctx: &mut *ctx })?.is_some() {}
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<(), A::Error> {
        let ctx = self.ctx;
        match map.next_key::<ScanField>()? {
            None => Ok(()),
            Some(ScanField::Type) => match map.next_value::<ElementKind>()? {
                ElementKind::Node => parse_node(ctx, &mut map),
                ElementKind::Way => parse_way(ctx, &mut map),
                ElementKind::Relation => parse_relation(ctx, &mut map),
                ElementKind::Unknown => {
                    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                    Ok(())
                }
            },
            Some(first) => {
                // Not an element; look for elements nested in its values.
                let mut field = Some(first);
                while let Some(current) = field {
                    match current {
                        ScanField::Bounds => map.next_value_seed(Bounds { ctx: &mut *ctx })?,
                        _ => map.next_value_seed(Scan { ctx: &mut *ctx })?,
                    }
                    field = map.next_key()?;
                }
                Ok(())
            }
        }
    }
}

fn parse_node<'de, A: MapAccess<'de>>(ctx: &mut DecodeContext, map: &mut A) -> std::result::Result<(), A::Error> {
    let mut id: OsmId = 0;
    let mut lat = 0.0;
    let mut lon = 0.0;
    let mut tags = TagSet::EMPTY;

    while let Some(field) = map.next_key::<NodeField>()? {
        match field {
            NodeField::Id => id = map.next_value()?,
            NodeField::Lat => lat = map.next_value()?,
            NodeField::Lon => lon = map.next_value()?,
            NodeField::Tags => tags = map.next_value_seed(Tags)?,
            NodeField::Other => {
                map.next_value::<IgnoredAny>()?;
            }
        }
    }

    ctx.add_node(Node { id, lat, lon, tags });
    Ok(())
}

fn parse_way<'de, A: MapAccess<'de>>(ctx: &mut DecodeContext, map: &mut A) -> std::result::Result<(), A::Error> {
    let mut id: OsmId = 0;
    let mut tags = TagSet::EMPTY;
    let mut nodes = Vec::new();

    while let Some(field) = map.next_key::<WayField>()? {
        match field {
            WayField::Id => id = map.next_value()?,
            WayField::Nodes => map.next_value_seed(WayNodes {
                nodes_by_id: &ctx.nodes_by_id,
                nodes: &mut nodes,
                dropped: &mut ctx.dropped_way_nodes,
            })?,
            WayField::Tags => tags = map.next_value_seed(Tags)?,
            WayField::Other => {
                map.next_value::<IgnoredAny>()?;
            }
        }
    }

    ctx.add_way(Way { id, tags, nodes });
    Ok(())
}

fn parse_relation<'de, A: MapAccess<'de>>(ctx: &mut DecodeContext, map: &mut A) -> std::result::Result<(), A::Error> {
    let mut id: OsmId = 0;
    let mut tags = TagSet::EMPTY;
    let mut members: Vec<PendingMember> = Vec::new();

    while let Some(field) = map.next_key::<RelationField>()? {
        match field {
            RelationField::Id => id = map.next_value()?,
            RelationField::Members => {
                members = map.next_value::<Option<Vec<PendingMember>>>()?.unwrap_or_default()
            }
            RelationField::Tags => tags = map.next_value_seed(Tags)?,
            RelationField::Other => {
                map.next_value::<IgnoredAny>()?;
            }
        }
    }

    ctx.add_relation(id, tags, members);
    Ok(())
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum BoundField {
    Minlat,
    Minlon,
    Maxlat,
    Maxlon,
    #[serde(other)]
    Other,
}

/// Value of a `bounds` field outside any element. Kept as a [`Bound`] only when
/// it is an object with all four numeric limits; anything else is scanned like
/// any other value.
struct Bounds<'a> {
    ctx: &'a mut DecodeContext,
}

impl<'de> DeserializeSeed<'de> for Bounds<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Bounds<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a bounding box")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> std::result::Result<(), A::Error> {
        Scan { ctx: self.ctx }.visit_seq(seq)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<(), A::Error> {
        let ctx = self.ctx;
        let mut limits: [Option<f64>; 4] = [None; 4];

        while let Some(field) = map.next_key::<BoundField>()? {
            let slot = match field {
                BoundField::Minlat => 0,
                BoundField::Minlon => 1,
                BoundField::Maxlat => 2,
                BoundField::Maxlon => 3,
                BoundField::Other => {
                    map.next_value_seed(Scan { ctx: &mut *ctx })?;
                    continue;
                }
            };
            limits[slot] = map.next_value::<Limit>()?.0;
        }

        if let [Some(minlat), Some(minlon), Some(maxlat), Some(maxlon)] = limits {
            ctx.bounds.push(Bound { minlat, minlon, maxlat, maxlon });
        }
        Ok(())
    }
}

/// A numeric bound limit; any other value leaves the limit unset.
struct Limit(Option<f64>);

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct LimitVisitor;

        impl<'de> Visitor<'de> for LimitVisitor {
            type Value = Limit;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a coordinate")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Limit, E> {
                Ok(Limit(Some(value as f64)))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Limit, E> {
                Ok(Limit(Some(value as f64)))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Limit, E> {
                Ok(Limit(Some(value)))
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<Limit, E> {
                Ok(Limit(None))
            }

            fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<Limit, E> {
                Ok(Limit(None))
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Limit, E> {
                Ok(Limit(None))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Limit, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Limit(None))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Limit, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(Limit(None))
            }
        }

        deserializer.deserialize_any(LimitVisitor)
    }
}

/// Looks way node ids up as they stream past; ids not seen yet are dropped.
struct WayNodes<'a> {
    nodes_by_id: &'a HashMap<OsmId, NodeRef>,
    nodes: &'a mut Vec<NodeRef>,
    dropped: &'a mut usize,
}

impl<'de> DeserializeSeed<'de> for WayNodes<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for WayNodes<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an array of node ids")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        while let Some(node_id) = seq.next_element::<OsmId>()? {
            match self.nodes_by_id.get(&node_id) {
                Some(node_ref) => self.nodes.push(*node_ref),
                None => *self.dropped += 1,
            }
        }
        Ok(())
    }
}

struct Tags;

impl<'de> DeserializeSeed<'de> for Tags {
    type Value = TagSet;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<TagSet, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Tags {
    type Value = TagSet;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a JSON object of tags")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<TagSet, E> {
        Ok(TagSet::EMPTY)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<TagSet, A::Error> {
        let mut tags = HashMap::new();
        while let Some(key) = map.next_key::<String>()? {
            if let TagValue(Some(value)) = map.next_value()? {
                tags.insert(key, value);
            }
        }
        Ok(TagSet::from(tags))
    }
}

/// A scalar tag value rendered as text. Null and nested values carry no text.
struct TagValue(Option<String>);

impl<'de> Deserialize<'de> for TagValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TagValueVisitor;

        impl<'de> Visitor<'de> for TagValueVisitor {
            type Value = TagValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a tag value")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<TagValue, E> {
                Ok(TagValue(Some(value.to_string())))
            }

            fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<TagValue, E> {
                Ok(TagValue(Some(value)))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<TagValue, E> {
                Ok(TagValue(Some(value.to_string())))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<TagValue, E> {
                Ok(TagValue(Some(value.to_string())))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<TagValue, E> {
                Ok(TagValue(Some(value.to_string())))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<TagValue, E> {
                Ok(TagValue(Some(value.to_string())))
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<TagValue, E> {
                Ok(TagValue(None))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<TagValue, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(TagValue(None))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<TagValue, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(TagValue(None))
            }
        }

        deserializer.deserialize_any(TagValueVisitor)
    }
}

impl<'de> Deserialize<'de> for ElementKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct KindVisitor;

        impl<'de> Visitor<'de> for KindVisitor {
            type Value = ElementKind;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an element type name")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<ElementKind, E> {
                Ok(ElementKind::from_name(value))
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<ElementKind, E> {
                Ok(ElementKind::Unknown)
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<ElementKind, E> {
                Ok(ElementKind::Unknown)
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<ElementKind, E> {
                Ok(ElementKind::Unknown)
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<ElementKind, E> {
                Ok(ElementKind::Unknown)
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<ElementKind, E> {
                Ok(ElementKind::Unknown)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<ElementKind, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(ElementKind::Unknown)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<ElementKind, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(ElementKind::Unknown)
            }
        }

        deserializer.deserialize_any(KindVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn parse_str(document: &str) -> Result<DecodeContext> {
        let mut ctx = DecodeContext::new();
        parse(document.as_bytes(), &mut ctx)?;
        Ok(ctx)
    }

    #[test_log::test]
    fn nodes_keep_their_source_values() {
        let ctx = parse_str(
            r#"[
                {"type": "node", "id": 1, "lat": 51.5074, "lon": -0.1278},
                {"type": "node", "id": 2, "lat": 10, "lon": 20.25, "tags": {"name": "Two"}},
                {"type": "node", "id": 9007199254740993, "lat": -33.5, "lon": 151.25}
            ]"#,
        ).expect("Could not parse nodes");

        assert_eq!(ctx.node_count(), 3);
        assert_eq!(ctx.nodes[0], Node { id: 1, lat: 51.5074, lon: -0.1278, tags: TagSet::EMPTY });
        assert_eq!(ctx.nodes[1].lat, 10.0);
        assert_eq!(ctx.nodes[1].lon, 20.25);
        assert_eq!(ctx.nodes[1].tags.get("name"), Some("Two"));
        assert_eq!(ctx.nodes[2].id, 9007199254740993);
        assert_eq!(ctx.nodes_by_id.get(&2), Some(&NodeRef(1)));
    }

    #[test_log::test]
    fn missing_coordinates_default_to_zero() {
        let ctx = parse_str(r#"[{"type": "node", "id": 4}]"#).expect("Could not parse node");

        assert_eq!(ctx.nodes[0].lat, 0.0);
        assert_eq!(ctx.nodes[0].lon, 0.0);
    }

    #[test_log::test]
    fn unknown_fields_are_skipped() {
        let ctx = parse_str(
            r#"[{"type": "node", "id": 5, "version": 3, "meta": {"user": "x", "uids": [1, 2]}, "lat": 1.5, "lon": 2.5}]"#,
        ).expect("Could not parse node");

        assert_eq!(ctx.nodes[0].id, 5);
        assert_eq!(ctx.nodes[0].lat, 1.5);
        assert_eq!(ctx.nodes[0].lon, 2.5);
    }

    #[test_log::test]
    fn way_drops_nodes_not_seen_yet() {
        let ctx = parse_str(
            r#"[
                {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
                {"type": "node", "id": 3, "lat": 1.0, "lon": 1.0},
                {"type": "way", "id": 10, "nodes": [1, 2, 3, 4]},
                {"type": "node", "id": 4, "lat": 2.0, "lon": 2.0}
            ]"#,
        ).expect("Could not parse way");

        assert_eq!(ctx.ways[0].nodes, vec![NodeRef(0), NodeRef(1)]);
        assert_eq!(ctx.dropped_way_nodes(), 2);
        assert_eq!(ctx.ways_by_id.get(&10), Some(&WayRef(0)));
    }

    #[test_log::test]
    fn relation_members_stay_pending() {
        let ctx = parse_str(
            r#"[{"type": "relation", "id": 7, "members": [
                {"type": "way", "ref": 10, "role": "outer"},
                {"type": "relation", "ref": 8, "role": ""},
                {"type": "area", "ref": 11, "role": "inner"}
            ], "tags": {"type": "multipolygon"}}]"#,
        ).expect("Could not parse relation");

        assert_eq!(ctx.relation_count(), 1);
        let relation = &ctx.relations[0];
        assert!(relation.members.is_empty());
        assert!(relation.members.capacity() >= 3);
        assert_eq!(relation.tags.get("type"), Some("multipolygon"));

        let (relation_ref, pending) = &ctx.pending_members[0];
        assert_eq!(*relation_ref, RelationRef(0));
        assert_eq!(pending[0], PendingMember { kind: ElementKind::Way, id: 10, role: "outer".to_string() });
        assert_eq!(pending[1].kind, ElementKind::Relation);
        assert_eq!(pending[2].kind, ElementKind::Unknown);
    }

    #[test_log::test]
    fn relations_without_members_have_nothing_pending() {
        let ctx = parse_str(r#"[{"type": "relation", "id": 7, "members": []}]"#).expect("Could not parse relation");

        assert_eq!(ctx.relation_count(), 1);
        assert!(ctx.pending_members.is_empty());
    }

    #[test_log::test]
    fn empty_and_missing_tags_share_the_empty_set() {
        let ctx = parse_str(
            r#"[
                {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0, "tags": {}},
                {"type": "way", "id": 2, "nodes": []},
                {"type": "relation", "id": 3, "tags": null}
            ]"#,
        ).expect("Could not parse elements");

        assert_eq!(ctx.nodes[0].tags, TagSet::EMPTY);
        assert_eq!(ctx.ways[0].tags, TagSet::EMPTY);
        assert_eq!(ctx.relations[0].tags, TagSet::EMPTY);
        assert_eq!(ctx.nodes[0].tags, ctx.ways[0].tags);
    }

    #[test_log::test]
    fn scalar_tag_values_become_text() {
        let ctx = parse_str(
            r#"[{"type": "node", "id": 1, "tags": {"name": "Bank", "levels": 3, "lit": true, "note": null, "nested": {"a": "b"}}}]"#,
        ).expect("Could not parse node");

        let tags = &ctx.nodes[0].tags;
        assert_eq!(tags.get("name"), Some("Bank"));
        assert_eq!(tags.get("levels"), Some("3"));
        assert_eq!(tags.get("lit"), Some("true"));
        assert!(!tags.contains_key("note"));
        assert!(!tags.contains_key("nested"));
    }

    #[test_log::test]
    fn unknown_element_types_are_skipped() {
        let ctx = parse_str(
            r#"[
                {"type": "node", "id": 1, "lat": 1.0, "lon": 1.0},
                {"type": "area", "id": 3600000001, "tags": {"type": "node"}},
                {"type": "count", "id": 0, "tags": {"nodes": "1"}},
                {"type": 12, "id": 5},
                {"type": "node", "id": 2, "lat": 2.0, "lon": 2.0}
            ]"#,
        ).expect("Could not parse elements");

        assert_eq!(ctx.node_count(), 2);
        assert_eq!(ctx.nodes[1].id, 2);
        assert_eq!(ctx.way_count(), 0);
        assert_eq!(ctx.relation_count(), 0);
    }

    #[test_log::test]
    fn elements_inside_an_envelope_are_found() {
        let ctx = parse_str(
            r#"{
                "version": 0.6,
                "generator": "Overpass API",
                "osm3s": {"timestamp_osm_base": "2024-01-01T00:00:00Z", "copyright": "ODbL"},
                "bounds": {"minlat": 51.0, "minlon": -0.5, "maxlat": 52.0, "maxlon": 0.5},
                "elements": [
                    {"type": "node", "id": 1, "lat": 51.5, "lon": 0.0},
                    {"type": "way", "id": 2, "nodes": [1]}
                ]
            }"#,
        ).expect("Could not parse envelope");

        assert_eq!(ctx.node_count(), 1);
        assert_eq!(ctx.way_count(), 1);
        assert_eq!(ctx.bounds, vec![Bound { minlat: 51.0, minlon: -0.5, maxlat: 52.0, maxlon: 0.5 }]);
    }

    #[test_log::test]
    fn bounds_that_are_not_boxes_are_ignored() {
        let ctx = parse_str(
            r#"{
                "generator": "x",
                "osm3s": {"bounds": "n/a"},
                "meta": {"bounds": {"minlat": 1.0, "minlon": 2.0}},
                "elements": [{"remark": "x", "bounds": null}, {"type": "node", "id": 1, "lat": 1.0, "lon": 1.0}]
            }"#,
        ).expect("Could not parse document");

        assert!(ctx.bounds.is_empty());
        assert_eq!(ctx.node_count(), 1);
        assert_eq!(ctx.nodes[0].id, 1);
    }

    #[test_log::test]
    fn elements_nested_in_bounds_are_still_found() {
        let ctx = parse_str(
            r#"{"bounds": [{"type": "node", "id": 7, "lat": 1.0, "lon": 1.0}],
                "extent": {"bounds": {"minlat": -1, "minlon": -2, "maxlat": 1, "maxlon": 2, "note": "box"}}}"#,
        ).expect("Could not parse document");

        assert_eq!(ctx.node_count(), 1);
        assert_eq!(ctx.bounds, vec![Bound { minlat: -1.0, minlon: -2.0, maxlat: 1.0, maxlon: 2.0 }]);
    }

    #[test_log::test]
    fn null_members_and_roles_are_empty() {
        let ctx = parse_str(
            r#"[
                {"type": "relation", "id": 1, "members": null},
                {"type": "relation", "id": 2, "members": [{"type": "node", "ref": 5, "role": null}]}
            ]"#,
        ).expect("Could not parse relations");

        assert_eq!(ctx.relation_count(), 2);
        assert_eq!(ctx.pending_members.len(), 1);
        let (_, pending) = &ctx.pending_members[0];
        assert_eq!(pending[0], PendingMember { kind: ElementKind::Node, id: 5, role: String::new() });
    }

    #[test_log::test]
    fn concatenated_objects_are_read_in_sequence() {
        let ctx = parse_str(
            "{\"type\": \"node\", \"id\": 1, \"lat\": 1.0, \"lon\": 1.0}\n{\"type\": \"way\", \"id\": 2, \"nodes\": [1]}\n",
        ).expect("Could not parse stream");

        assert_eq!(ctx.node_count(), 1);
        assert_eq!(ctx.ways[0].nodes, vec![NodeRef(0)]);
    }

    #[test_log::test]
    fn empty_input_decodes_to_nothing() {
        let ctx = parse_str("  \n").expect("Could not parse empty input");

        assert_eq!(ctx.node_count(), 0);
    }

    #[test_log::test]
    fn truncated_document_is_a_decode_error() {
        let err = parse_str(r#"[{"type": "node", "id": 1, "lat": 1.0"#).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[test_log::test]
    fn syntax_error_is_a_decode_error() {
        let err = parse_str(r#"[{"type": "node", "id": 1,, "lat": 1.0}]"#).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Decode);
    }
}
