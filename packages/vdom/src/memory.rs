//! In-memory backend.
//!
//! Keeps a small node arena and logs every mutating call, which makes it the
//! backend of choice for tests, benches and the CLI.

use crate::backend::Backend;
use crate::vnode::{Event, Listener};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use weft_common::{BackendError, BackendResult};

/// Handle to a node owned by a [`MemoryDom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeHandle(usize);

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// One backend call, as recorded in the operation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DomOp {
    CreateElement { node: NodeHandle, tag: String },
    CreateText { node: NodeHandle, text: String },
    SetText { node: NodeHandle, text: String },
    SetAttribute { node: NodeHandle, name: String, value: String },
    RemoveAttribute { node: NodeHandle, name: String },
    AddListener { node: NodeHandle, event: String },
    RemoveListener { node: NodeHandle, event: String },
    InsertBefore { parent: NodeHandle, child: NodeHandle, anchor: Option<NodeHandle> },
    RemoveChild { parent: NodeHandle, child: NodeHandle },
}

impl DomOp {
    pub fn is_create(&self) -> bool {
        matches!(self, DomOp::CreateElement { .. } | DomOp::CreateText { .. })
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, DomOp::RemoveChild { .. })
    }
}

impl fmt::Display for DomOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomOp::CreateElement { node, tag } => write!(f, "create <{tag}> {node}"),
            DomOp::CreateText { node, text } => write!(f, "create text {text:?} {node}"),
            DomOp::SetText { node, text } => write!(f, "set text {node} = {text:?}"),
            DomOp::SetAttribute { node, name, value } => write!(f, "set {node}.{name} = {value:?}"),
            DomOp::RemoveAttribute { node, name } => write!(f, "remove {node}.{name}"),
            DomOp::AddListener { node, event } => write!(f, "listen {node} {event}"),
            DomOp::RemoveListener { node, event } => write!(f, "unlisten {node} {event}"),
            DomOp::InsertBefore { parent, child, anchor: Some(anchor) } => {
                write!(f, "insert {child} into {parent} before {anchor}")
            }
            DomOp::InsertBefore { parent, child, anchor: None } => {
                write!(f, "append {child} to {parent}")
            }
            DomOp::RemoveChild { parent, child } => write!(f, "remove {child} from {parent}"),
        }
    }
}

#[derive(Debug)]
enum NodeData {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        listeners: Vec<(String, Listener)>,
    },
    Text(String),
}

#[derive(Debug)]
struct MemNode {
    data: NodeData,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

/// Recording in-memory node store
#[derive(Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<MemNode>,
    ops: Vec<DomOp>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element to mount into; not recorded in the operation log
    pub fn create_container(&mut self, tag: &str) -> NodeHandle {
        self.push(NodeData::Element {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            listeners: Vec::new(),
        })
    }

    pub fn ops(&self) -> &[DomOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DomOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(node.0).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    pub fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node.0)?.parent
    }

    pub fn tag(&self, node: NodeHandle) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn text(&self, node: NodeHandle) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    pub fn attribute(&self, node: NodeHandle, name: &str) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    pub fn listener_count(&self, node: NodeHandle, event: &str) -> usize {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element { listeners, .. }) => {
                listeners.iter().filter(|(name, _)| name == event).count()
            }
            _ => 0,
        }
    }

    /// Fire every listener bound for `event.name` on `node`; returns how many ran
    pub fn dispatch(&self, node: NodeHandle, event: &Event) -> usize {
        let listeners: Vec<Listener> = match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element { listeners, .. }) => listeners
                .iter()
                .filter(|(name, _)| *name == event.name)
                .map(|(_, l)| l.clone())
                .collect(),
            _ => Vec::new(),
        };
        for listener in &listeners {
            listener.call(event);
        }
        listeners.len()
    }

    /// Serialized markup of `node` and its subtree
    pub fn to_html(&self, node: NodeHandle) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    /// Serialized markup of `node`'s children only
    pub fn inner_html(&self, node: NodeHandle) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeHandle, out: &mut String) {
        let Some(mem) = self.nodes.get(node.0) else {
            return;
        };
        match &mem.data {
            NodeData::Text(text) => out.push_str(&escape(text)),
            NodeData::Element { tag, attributes, .. } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
                }
                out.push('>');
                for child in &mem.children {
                    self.write_html(*child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }

    fn push(&mut self, data: NodeData) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(MemNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        handle
    }

    fn node_mut(&mut self, node: NodeHandle) -> BackendResult<&mut MemNode> {
        self.nodes
            .get_mut(node.0)
            .ok_or_else(|| BackendError::UnknownNode(node.to_string()))
    }

    fn detach(&mut self, parent: NodeHandle, child: NodeHandle) -> BackendResult<()> {
        let siblings = &mut self.node_mut(parent)?.children;
        let position = siblings
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| not_a_child(parent, child))?;
        siblings.remove(position);
        self.node_mut(child)?.parent = None;
        Ok(())
    }
}

impl Backend for MemoryDom {
    type Node = NodeHandle;

    fn create_element(&mut self, tag: &str) -> BackendResult<NodeHandle> {
        let node = self.create_container(tag);
        self.ops.push(DomOp::CreateElement {
            node,
            tag: tag.to_string(),
        });
        Ok(node)
    }

    fn create_text(&mut self, text: &str) -> BackendResult<NodeHandle> {
        let node = self.push(NodeData::Text(text.to_string()));
        self.ops.push(DomOp::CreateText {
            node,
            text: text.to_string(),
        });
        Ok(node)
    }

    fn set_text(&mut self, node: &NodeHandle, text: &str) -> BackendResult<()> {
        match &mut self.node_mut(*node)?.data {
            NodeData::Text(current) => *current = text.to_string(),
            NodeData::Element { .. } => return Err(BackendError::UnknownNode(node.to_string())),
        }
        self.ops.push(DomOp::SetText {
            node: *node,
            text: text.to_string(),
        });
        Ok(())
    }

    fn set_attribute(&mut self, node: &NodeHandle, name: &str, value: &str) -> BackendResult<()> {
        if let NodeData::Element { attributes, .. } = &mut self.node_mut(*node)?.data {
            attributes.insert(name.to_string(), value.to_string());
        }
        self.ops.push(DomOp::SetAttribute {
            node: *node,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeHandle, name: &str) -> BackendResult<()> {
        if let NodeData::Element { attributes, .. } = &mut self.node_mut(*node)?.data {
            attributes.remove(name);
        }
        self.ops.push(DomOp::RemoveAttribute {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: &NodeHandle,
        event: &str,
        listener: &Listener,
    ) -> BackendResult<()> {
        if let NodeData::Element { listeners, .. } = &mut self.node_mut(*node)?.data {
            // Same (event, listener) pair binds once, as in the DOM
            if !listeners.iter().any(|(e, l)| e == event && l.ptr_eq(listener)) {
                listeners.push((event.to_string(), listener.clone()));
            }
        }
        self.ops.push(DomOp::AddListener {
            node: *node,
            event: event.to_string(),
        });
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        node: &NodeHandle,
        event: &str,
        listener: &Listener,
    ) -> BackendResult<()> {
        if let NodeData::Element { listeners, .. } = &mut self.node_mut(*node)?.data {
            listeners.retain(|(e, l)| !(e == event && l.ptr_eq(listener)));
        }
        self.ops.push(DomOp::RemoveListener {
            node: *node,
            event: event.to_string(),
        });
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: &NodeHandle,
        child: &NodeHandle,
        anchor: Option<&NodeHandle>,
    ) -> BackendResult<()> {
        if let Some(previous) = self.node_mut(*child)?.parent {
            self.detach(previous, *child)?;
        }
        let siblings = &mut self.node_mut(*parent)?.children;
        match anchor {
            Some(anchor) => {
                let position = siblings
                    .iter()
                    .position(|c| c == anchor)
                    .ok_or_else(|| not_a_child(*parent, *anchor))?;
                siblings.insert(position, *child);
            }
            None => siblings.push(*child),
        }
        self.node_mut(*child)?.parent = Some(*parent);
        self.ops.push(DomOp::InsertBefore {
            parent: *parent,
            child: *child,
            anchor: anchor.copied(),
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeHandle, child: &NodeHandle) -> BackendResult<()> {
        self.detach(*parent, *child)?;
        self.ops.push(DomOp::RemoveChild {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }
}

fn not_a_child(parent: NodeHandle, child: NodeHandle) -> BackendError {
    BackendError::NotAChild {
        parent: parent.to_string(),
        child: child.to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
