use self::osm::{Bound, Element, MemberRef, Node, NodeRef, Relation, RelationRef, Way, WayRef};

pub mod osm;

/// Map data as delivered by one Overpass document. Ways and relations point into
/// the node/way/relation collections of the same value, so the whole graph is
/// owned here and handed out by shared reference only.
#[derive(Debug, Default, Clone)]
pub struct OsmData {
    bounds: Vec<Bound>,
    nodes: Vec<Node>,
    ways: Vec<Way>,
    relations: Vec<Relation>,
}

impl OsmData {
    pub(crate) fn new(
        bounds: Vec<Bound>,
        nodes: Vec<Node>,
        ways: Vec<Way>,
        relations: Vec<Relation>,
    ) -> Self {
        OsmData {
            bounds,
            nodes,
            ways,
            relations,
        }
    }

    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn ways(&self) -> &[Way] {
        &self.ways
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// # Panics
    ///
    /// Panics if `node_ref` was issued for another `OsmData`.
    pub fn node(&self, node_ref: NodeRef) -> &Node {
        &self.nodes[node_ref.index()]
    }

    /// # Panics
    ///
    /// Panics if `way_ref` was issued for another `OsmData`.
    pub fn way(&self, way_ref: WayRef) -> &Way {
        &self.ways[way_ref.index()]
    }

    /// # Panics
    ///
    /// Panics if `relation_ref` was issued for another `OsmData`.
    pub fn relation(&self, relation_ref: RelationRef) -> &Relation {
        &self.relations[relation_ref.index()]
    }

    /// The nodes of `way` in order.
    ///
    /// # Panics
    ///
    /// Iterating panics if `way` belongs to another `OsmData` with fewer nodes.
    pub fn way_nodes<'a>(&'a self, way: &'a Way) -> impl Iterator<Item = &'a Node> + 'a {
        way.nodes.iter().map(move |node_ref| self.node(*node_ref))
    }

    /// # Panics
    ///
    /// Panics if the handle inside `member_ref` was issued for another `OsmData`.
    pub fn element(&self, member_ref: MemberRef) -> Element<'_> {
        match member_ref {
            MemberRef::Node(node_ref) => Element::Node(self.node(node_ref)),
            MemberRef::Way(way_ref) => Element::Way(self.way(way_ref)),
            MemberRef::Relation(relation_ref) => Element::Relation(self.relation(relation_ref)),
        }
    }
}
