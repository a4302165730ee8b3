//! Commit phase: attaches freshly created nodes and brings reused nodes up
//! to date with their new props. Runs after stale nodes were flushed.

use crate::backend::Backend;
use crate::dom::{text_payload, Dom};
use crate::error::{RenderError, RenderResult};
use crate::tree::{Effect, NodeId, Tree};
use crate::vnode::NodeKind;
use serde::Serialize;
use tracing::trace;

/// Counters for one commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitStats {
    pub attached: usize,
    pub updated: usize,
}

pub fn commit<B: Backend>(
    tree: &Tree<B::Node>,
    old: Option<&Tree<B::Node>>,
    dom: &mut Dom<B>,
) -> RenderResult<CommitStats> {
    let mut stats = CommitStats::default();

    for id in tree.preorder() {
        let slot = tree.get(id);
        let Some(node) = slot.node.as_ref() else {
            continue;
        };

        match slot.effect {
            Effect::None => {}
            Effect::Create => {
                let Some(parent) = tree.host_parent(id) else {
                    // A bare root is attached by whoever owns the tree
                    if id == tree.root() {
                        continue;
                    }
                    return Err(RenderError::NoHostParent(id));
                };
                let parent = tree.node(parent).ok_or(RenderError::NoHostParent(id))?;
                let anchor = find_anchor(tree, id);
                trace!(node = %id, anchored = anchor.is_some(), "Attaching node");
                dom.insert_before(parent, node, anchor)?;
                stats.attached += 1;
            }
            Effect::Update => {
                debug_assert!(slot.old.is_some(), "reused node {id} has no old link");
                let prev = slot
                    .old
                    .zip(old)
                    .map(|(old_id, old)| old.get(old_id))
                    .ok_or(RenderError::MissingOld(id))?;

                if let NodeKind::Text = slot.kind {
                    let next_text = text_payload(&slot.props);
                    if text_payload(&prev.props) != next_text {
                        dom.set_text(node, &next_text)?;
                        stats.updated += 1;
                    }
                } else if prev.props != slot.props {
                    dom.inner_diff(node, &prev.props, &slot.props)?;
                    stats.updated += 1;
                }
            }
        }
    }

    Ok(stats)
}

/// Real node to insert `id` before: the first following sibling that was
/// reused, looking through component layers on both sides
fn find_anchor<N>(tree: &Tree<N>, id: NodeId) -> Option<&N> {
    let mut cursor = id;
    loop {
        let mut sibling = tree.next_sibling(cursor);
        while let Some(s) = sibling {
            if let Some(host) = tree.host(s) {
                if tree.get(host).effect == Effect::Update {
                    return tree.node(host);
                }
            }
            sibling = tree.next_sibling(s);
        }

        let parent = tree.parent(cursor)?;
        if !tree.kind(parent).is_component() {
            return None;
        }
        cursor = parent;
    }
}
