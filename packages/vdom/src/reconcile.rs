//! Build phase: expands components, creates missing real nodes and links
//! each declared child list against the previous tree by position.
//!
//! Children are matched strictly by index. Inserting at the front of a
//! sibling list shifts every later sibling against the old list, and the
//! mismatches are replaced rather than moved.

use crate::backend::Backend;
use crate::component::ComponentCache;
use crate::dom::Dom;
use crate::error::{RenderError, RenderResult};
use crate::tree::{Effect, NodeId, Tree};
use crate::vnode::NodeKind;
use serde::Serialize;
use tracing::{debug, instrument};

/// Counters for one build pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Real nodes created
    pub created: usize,
    /// Slots linked to a same-type slot of the previous tree
    pub reused: usize,
    /// Component renders performed
    pub rendered: usize,
}

/// Stale slots of the previous tree, in the order they were found
#[must_use = "queued nodes stay attached until the queue is flushed"]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RemovalQueue {
    entries: Vec<NodeId>,
}

impl RemovalQueue {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    fn push(&mut self, id: NodeId) {
        self.entries.push(id);
    }

    /// Detach every queued node from its host parent in `old`; returns the number detached
    ///
    /// Consumes the queue: it is drained as a unit, never partially.
    pub fn flush<B: Backend>(self, dom: &mut Dom<B>, old: &Tree<B::Node>) -> RenderResult<usize> {
        for id in &self.entries {
            let parent = old
                .host_parent(*id)
                .and_then(|p| old.node(p))
                .ok_or(RenderError::NoHostParent(*id))?;
            dom.remove_node(old, *id, parent)?;
            debug!(node = %id, "Removed stale node");
        }
        Ok(self.entries.len())
    }
}

/// Result of [`build`]
#[derive(Debug)]
pub struct BuildOutput {
    pub removals: RemovalQueue,
    pub stats: BuildStats,
}

/// Walk `tree` in pre-order, materializing components and reconciling every
/// child list against `old`
///
/// The walk moves through `first_child`, `next` and `parent` links only. A
/// slot's links are fixed by its parent's child-link step before the walk
/// reaches it.
#[instrument(skip_all)]
pub fn build<B: Backend>(
    tree: &mut Tree<B::Node>,
    old: Option<&Tree<B::Node>>,
    cache: &mut ComponentCache,
    dom: &mut Dom<B>,
) -> RenderResult<BuildOutput> {
    let mut removals = RemovalQueue::default();
    let mut stats = BuildStats::default();

    if let Some(old) = old {
        link_root(tree, old, &mut stats);
    }

    let mut cursor = Some(tree.root());
    while let Some(id) = cursor {
        match tree.kind(id) {
            NodeKind::Component(def) => {
                let def = *def;
                let props = tree.get(id).props.clone();
                let rendered = cache.materialize(&def, props).render();
                tree.get_mut(id).children = vec![rendered];
                stats.rendered += 1;
            }
            NodeKind::Element(_) | NodeKind::Text => {
                if tree.get(id).node.is_none() {
                    let slot = tree.get(id);
                    let node = dom.create_node(&slot.kind, &slot.props)?;
                    let slot = tree.get_mut(id);
                    slot.node = Some(node);
                    slot.effect = Effect::Create;
                    stats.created += 1;
                }
            }
            NodeKind::Container => {}
        }

        link_children(tree, id, old, &mut removals, &mut stats);
        cursor = tree.next_in_preorder(id);
    }

    debug!(
        created = stats.created,
        reused = stats.reused,
        queued = removals.len(),
        "Build pass complete"
    );
    Ok(BuildOutput { removals, stats })
}

fn link_root<N: Clone>(tree: &mut Tree<N>, old: &Tree<N>, stats: &mut BuildStats) {
    let (root, old_root) = (tree.root(), old.root());
    if tree.kind(root) != old.kind(old_root) {
        return;
    }
    let slot = tree.get_mut(root);
    slot.old = Some(old_root);
    if slot.node.is_none() {
        slot.node = old.node(old_root).cloned();
        if slot.node.is_some() {
            slot.effect = Effect::Update;
        }
    }
    stats.reused += 1;
}

/// Move `parent`'s declared children into the arena and pair them with the
/// old child list position by position
fn link_children<N: Clone>(
    tree: &mut Tree<N>,
    parent: NodeId,
    old: Option<&Tree<N>>,
    removals: &mut RemovalQueue,
    stats: &mut BuildStats,
) {
    let declared = std::mem::take(&mut tree.get_mut(parent).children);
    let mut old_cursor = match (old, tree.get(parent).old) {
        (Some(old), Some(old_parent)) => old.first_child(old_parent),
        _ => None,
    };
    let mut prev: Option<NodeId> = None;

    for vnode in declared {
        let id = tree.alloc(vnode, parent);

        if let (Some(old), Some(old_id)) = (old, old_cursor) {
            if old.kind(old_id) == tree.kind(id) {
                let node = old.node(old_id).cloned();
                let slot = tree.get_mut(id);
                slot.old = Some(old_id);
                if node.is_some() {
                    slot.effect = Effect::Update;
                }
                slot.node = node;
                stats.reused += 1;
                debug!(node = %id, old = %old_id, "Reusing node");
            } else {
                debug!(node = %id, old = %old_id, "Type mismatch, queueing old node");
                removals.push(old_id);
            }
            old_cursor = old.next_sibling(old_id);
        }

        match prev {
            None => tree.get_mut(parent).first_child = Some(id),
            Some(prev) => tree.get_mut(prev).next = Some(id),
        }
        prev = Some(id);
    }

    // Old siblings past the end of the new list have no counterpart
    if let Some(old) = old {
        while let Some(old_id) = old_cursor {
            debug!(old = %old_id, "No new counterpart, queueing old node");
            removals.push(old_id);
            old_cursor = old.next_sibling(old_id);
        }
    }
}
