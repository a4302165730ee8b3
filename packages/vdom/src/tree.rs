//! Arena-backed linked tree.
//!
//! Children are threaded through `first_child`/`next`, with `parent` as a
//! back link, so a full pre-order walk needs no recursion and no stack.
//! `parent` and `old` are plain indices and never own anything.

use crate::vnode::{NodeKind, Props, VNode};
use std::fmt;

/// Index of a slot in a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the commit phase has to do with a slot's real node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    None,
    /// Real node created in this pass, not attached yet
    Create,
    /// Real node carried over from the previous pass
    Update,
}

/// One node of a built tree
#[derive(Debug)]
pub struct Slot<N> {
    pub kind: NodeKind,
    pub props: Props,
    /// Declared children not linked yet; drained by the child-link phase
    pub children: Vec<VNode>,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub next: Option<NodeId>,
    /// Matching slot in the previous tree, set only on reuse
    pub old: Option<NodeId>,
    /// Real UI node; always `None` for components
    pub node: Option<N>,
    pub effect: Effect,
}

impl<N> Slot<N> {
    fn from_vnode(vnode: VNode) -> Self {
        Self {
            kind: vnode.kind,
            props: vnode.props,
            children: vnode.children,
            parent: None,
            first_child: None,
            next: None,
            old: None,
            node: None,
            effect: Effect::None,
        }
    }
}

/// Arena of slots for one render pass
#[derive(Debug)]
pub struct Tree<N> {
    slots: Vec<Slot<N>>,
}

impl<N> Tree<N> {
    /// Tree rooted at a container owning `container`, with `root` as its only declared child
    pub fn mount(container: N, root: VNode) -> Self {
        let mut slot = Slot::from_vnode(VNode::new(NodeKind::Container).with_child(root));
        slot.node = Some(container);
        Self { slots: vec![slot] }
    }

    /// Tree whose root is `root` itself; its real node is created by the build pass
    pub fn new(root: VNode) -> Self {
        Self {
            slots: vec![Slot::from_vnode(root)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn alloc(&mut self, vnode: VNode, parent: NodeId) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        let mut slot = Slot::from_vnode(vnode);
        slot.parent = Some(parent);
        self.slots.push(slot);
        id
    }

    pub fn get(&self, id: NodeId) -> &Slot<N> {
        &self.slots[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Slot<N> {
        &mut self.slots[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).next
    }

    pub fn node(&self, id: NodeId) -> Option<&N> {
        self.get(id).node.as_ref()
    }

    /// Linked children of `id`, in order
    pub fn children(&self, id: NodeId) -> Siblings<'_, N> {
        Siblings {
            tree: self,
            cursor: self.first_child(id),
        }
    }

    /// Successor of `id` in pre-order: first child, else the nearest `next` found while ascending
    pub fn next_in_preorder(&self, id: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(id) {
            return Some(child);
        }
        let mut cursor = id;
        loop {
            if let Some(next) = self.next_sibling(cursor) {
                return Some(next);
            }
            cursor = self.parent(cursor)?;
        }
    }

    /// Pre-order walk over every linked slot
    pub fn preorder(&self) -> Preorder<'_, N> {
        Preorder {
            tree: self,
            cursor: Some(self.root()),
        }
    }

    /// Slot owning the real node `id` stands for, looking through component layers
    pub fn host(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = id;
        loop {
            let slot = self.get(cursor);
            if slot.node.is_some() {
                return Some(cursor);
            }
            if !slot.kind.is_component() {
                return None;
            }
            cursor = slot.first_child?;
        }
    }

    /// Nearest ancestor of `id` that owns a real node
    pub fn host_parent(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.parent(id)?;
        loop {
            if self.get(cursor).node.is_some() {
                return Some(cursor);
            }
            cursor = self.parent(cursor)?;
        }
    }
}

/// Iterator over a sibling chain
pub struct Siblings<'a, N> {
    tree: &'a Tree<N>,
    cursor: Option<NodeId>,
}

impl<N> Iterator for Siblings<'_, N> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor?;
        self.cursor = self.tree.next_sibling(id);
        Some(id)
    }
}

/// Stackless pre-order iterator
pub struct Preorder<'a, N> {
    tree: &'a Tree<N>,
    cursor: Option<NodeId>,
}

impl<N> Iterator for Preorder<'_, N> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor?;
        self.cursor = self.tree.next_in_preorder(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Links every declared child by hand, breadth-first, without reconciling
    fn link_all(tree: &mut Tree<u32>) {
        let mut i = 0;
        while i < tree.len() {
            let id = NodeId(i as u32);
            let declared = std::mem::take(&mut tree.get_mut(id).children);
            let mut prev: Option<NodeId> = None;
            for child in declared {
                let child_id = tree.alloc(child, id);
                match prev {
                    None => tree.get_mut(id).first_child = Some(child_id),
                    Some(p) => tree.get_mut(p).next = Some(child_id),
                }
                prev = Some(child_id);
            }
            i += 1;
        }
    }

    fn tag_of(tree: &Tree<u32>, id: NodeId) -> String {
        match tree.kind(id) {
            NodeKind::Element(tag) => tag.clone(),
            NodeKind::Text => "#text".to_string(),
            NodeKind::Container => "#container".to_string(),
            NodeKind::Component(def) => def.name().to_string(),
        }
    }

    #[test]
    fn test_preorder_visits_in_document_order() {
        let root = VNode::element("a")
            .with_child(VNode::element("b").with_child(VNode::element("c")))
            .with_child(VNode::element("d").with_child(VNode::element("e")).with_child(VNode::element("f")))
            .with_child(VNode::element("g"));
        let mut tree: Tree<u32> = Tree::new(root);
        link_all(&mut tree);

        let order: Vec<String> = tree.preorder().map(|id| tag_of(&tree, id)).collect();
        assert_eq!(order, vec!["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn test_preorder_ends_at_deepest_last_leaf() {
        let root = VNode::element("a")
            .with_child(VNode::element("b").with_child(VNode::element("c").with_child(VNode::element("d"))));
        let mut tree: Tree<u32> = Tree::new(root);
        link_all(&mut tree);

        assert_eq!(tree.preorder().count(), 4);
    }

    #[test]
    fn test_children_and_parent_links() {
        let mut tree: Tree<u32> = Tree::new(
            VNode::element("ul").with_children(vec![VNode::element("li"), VNode::element("li")]),
        );
        link_all(&mut tree);

        let kids: Vec<NodeId> = tree.children(tree.root()).collect();
        assert_eq!(kids.len(), 2);
        assert!(kids.iter().all(|k| tree.parent(*k) == Some(tree.root())));
        assert_eq!(tree.next_sibling(kids[0]), Some(kids[1]));
        assert_eq!(tree.next_sibling(kids[1]), None);
    }

    #[test]
    fn test_mount_root_owns_container() {
        let tree: Tree<u32> = Tree::mount(99, VNode::element("div"));
        assert_eq!(tree.node(tree.root()), Some(&99));
        assert_eq!(tree.kind(tree.root()), &NodeKind::Container);
        assert_eq!(tree.get(tree.root()).children.len(), 1);
    }

    #[test]
    fn test_host_parent_skips_nodeless_ancestors() {
        let mut tree: Tree<u32> = Tree::mount(1, VNode::element("div").with_child(VNode::element("span")));
        link_all(&mut tree);
        let div = tree.first_child(tree.root()).unwrap();
        let span = tree.first_child(div).unwrap();

        assert_eq!(tree.host_parent(span), Some(tree.root()));
        tree.get_mut(div).node = Some(2);
        assert_eq!(tree.host_parent(span), Some(div));
        assert_eq!(tree.host(div), Some(div));
        assert_eq!(tree.host(span), None);
    }
}
