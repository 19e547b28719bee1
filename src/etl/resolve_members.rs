use std::mem;

use crate::data::osm::{ElementKind, Member, MemberRef};
use crate::etl::parse_overpass::DecodeContext;

/// Attach the pending members of every relation once the whole document has
/// been decoded, so relations can refer to relations declared after them.
///
/// Each member's declared kind selects the id lookup to probe. Members whose
/// target is missing, or whose kind is not node/way/relation, are dropped.
/// Declaration order is preserved. Returns the number of dropped members.
pub fn resolve_members(ctx: &mut DecodeContext) -> usize {
    let mut dropped = 0;

    for (relation_ref, pending) in mem::take(&mut ctx.pending_members) {
        for member in pending {
            let target = match member.kind {
                ElementKind::Node => ctx.nodes_by_id.get(&member.id).copied().map(MemberRef::Node),
                ElementKind::Way => ctx.ways_by_id.get(&member.id).copied().map(MemberRef::Way),
                ElementKind::Relation => ctx.relations_by_id.get(&member.id).copied().map(MemberRef::Relation),
                ElementKind::Unknown => None,
            };

            match target {
                Some(target) => ctx.relations[relation_ref.index()].members.push(Member {
                    role: member.role,
                    target,
                }),
                None => dropped += 1,
            }
        }
    }

    dropped
}
