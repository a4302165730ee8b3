//! Browser DOM backend

use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Node};
use weft_common::{BackendError, BackendResult};
use weft_vdom::{Backend, Event, Listener};

/// A listener bound to a DOM node; dropping the closure invalidates the JS callback
struct Binding {
    node: Node,
    event: String,
    listener: usize,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

pub struct WebDom {
    document: Document,
    bindings: Vec<Binding>,
}

impl WebDom {
    pub fn new() -> BackendResult<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| BackendError::Js("DOM is not available".to_string()))?;
        Ok(Self::with_document(document))
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            bindings: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn element_by_id(&self, id: &str) -> BackendResult<Node> {
        self.document
            .get_element_by_id(id)
            .map(Node::from)
            .ok_or_else(|| BackendError::UnknownNode(format!("#{id}")))
    }

    /// Number of live listener bindings
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Unbind and drop every binding on `root` or one of its descendants
    fn release_subtree(&mut self, root: &Node) {
        let (released, kept) = std::mem::take(&mut self.bindings)
            .into_iter()
            .partition::<Vec<_>, _>(|b| root.contains(Some(&b.node)));
        self.bindings = kept;

        for binding in &released {
            // The node is already detached; a failed unbind only leaves a dead callback
            let _ = binding.node.remove_event_listener_with_callback(
                &binding.event,
                binding.closure.as_ref().unchecked_ref(),
            );
        }
        if !released.is_empty() {
            debug!(count = released.len(), "Released listeners of detached subtree");
        }
    }

    fn position(&self, node: &Node, event: &str, listener: &Listener) -> Option<usize> {
        self.bindings
            .iter()
            .position(|b| &b.node == node && b.event == event && b.listener == listener.id())
    }
}

fn js_error(value: JsValue) -> BackendError {
    value
        .as_string()
        .map_or_else(|| BackendError::Js(format!("{value:?}")), BackendError::Js)
}

fn as_element(node: &Node) -> BackendResult<&Element> {
    node.dyn_ref::<Element>()
        .ok_or_else(|| BackendError::UnknownNode(format!("{:?} is not an element", node.node_name())))
}

impl Backend for WebDom {
    type Node = Node;

    fn create_element(&mut self, tag: &str) -> BackendResult<Node> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(js_error)
    }

    fn create_text(&mut self, text: &str) -> BackendResult<Node> {
        Ok(self.document.create_text_node(text).into())
    }

    fn set_text(&mut self, node: &Node, text: &str) -> BackendResult<()> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) -> BackendResult<()> {
        as_element(node)?.set_attribute(name, value).map_err(js_error)
    }

    fn remove_attribute(&mut self, node: &Node, name: &str) -> BackendResult<()> {
        as_element(node)?.remove_attribute(name).map_err(js_error)
    }

    fn add_event_listener(
        &mut self,
        node: &Node,
        event: &str,
        listener: &Listener,
    ) -> BackendResult<()> {
        if self.position(node, event, listener).is_some() {
            return Ok(());
        }

        let callback = listener.clone();
        let closure = Closure::wrap(Box::new(move |e: web_sys::Event| {
            callback.call(&Event::new(e.type_()));
        }) as Box<dyn FnMut(web_sys::Event)>);

        node.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(js_error)?;

        self.bindings.push(Binding {
            node: node.clone(),
            event: event.to_string(),
            listener: listener.id(),
            closure,
        });
        debug!(event, listener = listener.id(), "Bound listener");
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        node: &Node,
        event: &str,
        listener: &Listener,
    ) -> BackendResult<()> {
        let Some(index) = self.position(node, event, listener) else {
            return Ok(());
        };
        let binding = self.bindings.swap_remove(index);
        debug!(event, listener = listener.id(), "Unbound listener");
        node.remove_event_listener_with_callback(event, binding.closure.as_ref().unchecked_ref())
            .map_err(js_error)
    }

    fn insert_before(&mut self, parent: &Node, child: &Node, anchor: Option<&Node>) -> BackendResult<()> {
        parent.insert_before(child, anchor).map(drop).map_err(js_error)
    }

    fn remove_child(&mut self, parent: &Node, child: &Node) -> BackendResult<()> {
        if child.parent_node().as_ref() != Some(parent) {
            return Err(BackendError::NotAChild {
                parent: parent.node_name(),
                child: child.node_name(),
            });
        }
        parent.remove_child(child).map_err(js_error)?;
        self.release_subtree(child);
        Ok(())
    }
}
