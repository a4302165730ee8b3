//! DOM projection layer.
//!
//! Turns node descriptions into backend calls: node creation, prop
//! application, minimal prop diffing and removal of stale subtrees.

use crate::backend::Backend;
use crate::error::{RenderError, RenderResult};
use crate::tree::{NodeId, Tree};
use crate::vnode::{NodeKind, PropValue, Props, TEXT_PROP};
use tracing::warn;
use weft_common::{BackendResult, RenderConfig};

/// Backend plus the rules for mapping props onto it
#[derive(Debug)]
pub struct Dom<B: Backend> {
    backend: B,
    config: RenderConfig,
}

impl<B: Backend> Dom<B> {
    pub fn new(backend: B, config: RenderConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Create the real node for an element or text description
    pub fn create_node(&mut self, kind: &NodeKind, props: &Props) -> RenderResult<B::Node> {
        match kind {
            NodeKind::Text => {
                let text = text_payload(props);
                Ok(self.backend.create_text(&text)?)
            }
            NodeKind::Element(tag) => {
                let node = self.backend.create_element(tag)?;
                self.set_props(&node, props, None)?;
                Ok(node)
            }
            NodeKind::Component(def) => Err(RenderError::NotHostKind(def.name().to_string())),
            NodeKind::Container => Err(RenderError::NotHostKind("container".to_string())),
        }
    }

    /// Apply `props` to `node`; with a condition, only props it accepts are written
    pub fn set_props(
        &mut self,
        node: &B::Node,
        props: &Props,
        condition: Option<&dyn Fn(&str) -> bool>,
    ) -> BackendResult<()> {
        for (name, value) in props {
            if condition.is_some_and(|accept| !accept(name.as_str())) {
                continue;
            }
            if let Some(event) = self.config.event_name(name) {
                match value.as_listener() {
                    Some(listener) => self.backend.add_event_listener(node, &event, listener)?,
                    None => warn!(prop = %name, "Event prop without a listener, ignoring"),
                }
            } else {
                match value.to_attr_value() {
                    Some(attr) => self.backend.set_attribute(node, name, &attr)?,
                    None => warn!(prop = %name, "Prop has no attribute form, ignoring"),
                }
            }
        }
        Ok(())
    }

    /// Move `node` from `prev` props to `next` props, writing only what changed
    pub fn inner_diff(&mut self, node: &B::Node, prev: &Props, next: &Props) -> BackendResult<()> {
        for (name, prev_value) in prev {
            if let Some(event) = self.config.event_name(name) {
                if next.get(name) != Some(prev_value) {
                    if let Some(listener) = prev_value.as_listener() {
                        self.backend.remove_event_listener(node, &event, listener)?;
                    }
                }
            } else if !next.contains_key(name) {
                self.backend.remove_attribute(node, name)?;
            }
        }

        let changed = |name: &str| prev.get(name) != next.get(name);
        self.set_props(node, next, Some(&changed))
    }

    /// Detach the real node `id` stands for from `parent`
    ///
    /// Component layers are looked through, so exactly one detach happens per
    /// stale subtree.
    pub fn remove_node(
        &mut self,
        tree: &Tree<B::Node>,
        id: NodeId,
        parent: &B::Node,
    ) -> RenderResult<()> {
        let node = tree
            .host(id)
            .and_then(|host| tree.node(host))
            .ok_or(RenderError::NoHostNode(id))?;
        self.backend.remove_child(parent, node)?;
        Ok(())
    }

    pub(crate) fn set_text(&mut self, node: &B::Node, text: &str) -> BackendResult<()> {
        self.backend.set_text(node, text)
    }

    pub(crate) fn insert_before(
        &mut self,
        parent: &B::Node,
        child: &B::Node,
        anchor: Option<&B::Node>,
    ) -> BackendResult<()> {
        self.backend.insert_before(parent, child, anchor)
    }
}

pub(crate) fn text_payload(props: &Props) -> String {
    props
        .get(TEXT_PROP)
        .and_then(PropValue::to_attr_value)
        .unwrap_or_default()
}
