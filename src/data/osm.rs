use std::collections::HashMap;

pub type OsmId = i64;

/// Immutable key/value attributes of an element.
///
/// Untagged elements all share [`TagSet::EMPTY`], which owns no allocation.
/// A populated set is never empty, so equal keys with equal values compare equal
/// regardless of how the set was built.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagSet {
    tags: Option<Box<HashMap<String, String>>>,
}

impl TagSet {
    pub const EMPTY: TagSet = TagSet { tags: None };

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.as_ref()?.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.as_ref().is_some_and(|tags| tags.contains_key(key))
    }

    pub fn len(&self) -> usize {
        self.tags.as_ref().map_or(0, |tags| tags.len())
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .iter()
            .flat_map(|tags| tags.iter())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl From<HashMap<String, String>> for TagSet {
    fn from(value: HashMap<String, String>) -> Self {
        if value.is_empty() {
            TagSet::EMPTY
        } else {
            TagSet {
                tags: Some(Box::new(value)),
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<HashMap<String, String>>()
            .into()
    }
}

/// The three element kinds an Overpass document can contain, plus everything
/// else (`area`, `count`, ...) that the reader skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Way,
    Relation,
    Unknown,
}

impl ElementKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "node" => ElementKind::Node,
            "way" => ElementKind::Way,
            "relation" => ElementKind::Relation,
            _ => ElementKind::Unknown,
        }
    }
}

/// Handle of a node inside the [`OsmData`](crate::data::OsmData) it was decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WayRef(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationRef(pub(crate) usize);

impl NodeRef {
    pub fn index(self) -> usize {
        self.0
    }
}

impl WayRef {
    pub fn index(self) -> usize {
        self.0
    }
}

impl RelationRef {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: OsmId,
    pub lat: f64,
    pub lon: f64,
    pub tags: TagSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    pub id: OsmId,
    pub tags: TagSet,
    pub nodes: Vec<NodeRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub id: OsmId,
    pub tags: TagSet,
    pub members: Vec<Member>,
}

/// Target of a relation member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberRef {
    Node(NodeRef),
    Way(WayRef),
    Relation(RelationRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub role: String,
    pub target: MemberRef,
}

/// A borrowed element, as returned by [`OsmData::element`](crate::data::OsmData::element).
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    Node(&'a Node),
    Way(&'a Way),
    Relation(&'a Relation),
}

impl Element<'_> {
    pub fn id(&self) -> OsmId {
        match self {
            Element::Node(node) => node.id,
            Element::Way(way) => way.id,
            Element::Relation(relation) => relation.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Node(_) => ElementKind::Node,
            Element::Way(_) => ElementKind::Way,
            Element::Relation(_) => ElementKind::Relation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub minlat: f64,
    pub minlon: f64,
    pub maxlat: f64,
    pub maxlon: f64,
}
