//! Node descriptions.
//!
//! A [`VNode`] is pure data: building one never touches a backend. The
//! reconciler moves descriptions into a [`crate::Tree`] lazily, one child
//! list at a time, as the traversal reaches them.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Reserved prop key holding a text node's payload
pub const TEXT_PROP: &str = "nodeValue";

/// Ordered prop mapping (attribute/event name to value)
pub type Props = BTreeMap<String, PropValue>;

/// Event delivered to a bound listener
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub detail: Option<String>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Event callback. Two listeners are equal only when they share the same allocation.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event)>);

impl Listener {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Address-based identity, stable for the lifetime of the allocation
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Listener) -> bool {
        self.id() == other.id()
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:#x})", self.id())
    }
}

/// Prop value
#[derive(Clone, Debug)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Listener(Listener),
    /// Opaque payload for component props, compared by reference
    Data(Rc<dyn Any>),
}

impl PropValue {
    pub fn data<T: Any>(value: T) -> Self {
        PropValue::Data(Rc::new(value))
    }

    /// String written through `setAttribute`, `None` for non-scalar values
    pub fn to_attr_value(&self) -> Option<String> {
        match self {
            PropValue::Str(s) => Some(s.clone()),
            PropValue::Int(n) => Some(n.to_string()),
            PropValue::Float(n) => Some(n.to_string()),
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Listener(_) | PropValue::Data(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_listener(&self) -> Option<&Listener> {
        match self {
            PropValue::Listener(l) => Some(l),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            PropValue::Data(d) => d.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Listener(a), PropValue::Listener(b)) => a.ptr_eq(b),
            (PropValue::Data(a), PropValue::Data(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        PropValue::Int(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Int(n.into())
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Float(n)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<Listener> for PropValue {
    fn from(l: Listener) -> Self {
        PropValue::Listener(l)
    }
}

/// A component definition's behavior
///
/// Instances live in the [`crate::ComponentCache`] for the whole session and
/// only ever see their props replaced.
pub trait Component {
    /// Produce the single subtree this component stands for
    fn render(&self, props: &Props) -> VNode;

    /// Called once, after the first pass that attached this component
    fn mounted(&mut self, _props: &Props) {}

    /// Called when the owning renderer is destroyed
    fn before_destroy(&mut self) {}
}

/// Component identity plus constructor
#[derive(Clone, Copy)]
pub struct ComponentDef {
    name: &'static str,
    create: fn(&Props) -> Box<dyn Component>,
}

impl ComponentDef {
    pub const fn new(name: &'static str, create: fn(&Props) -> Box<dyn Component>) -> Self {
        Self { name, create }
    }

    /// Identity used as the cache key
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn instantiate(&self, props: &Props) -> Box<dyn Component> {
        (self.create)(props)
    }
}

impl PartialEq for ComponentDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ComponentDef {}

impl fmt::Debug for ComponentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentDef").field(&self.name).finish()
    }
}

/// What a node is. Immutable for the node's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Arena root standing for the externally-owned mount point
    Container,
    Element(String),
    Text,
    Component(ComponentDef),
}

impl NodeKind {
    pub fn is_component(&self) -> bool {
        matches!(self, NodeKind::Component(_))
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }
}

/// Node description
#[derive(Debug, Clone)]
pub struct VNode {
    pub kind: NodeKind,
    pub props: Props,
    pub children: Vec<VNode>,
}

impl VNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn element(tag: impl Into<String>) -> Self {
        Self::new(NodeKind::Element(tag.into()))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_prop(TEXT_PROP, content.into())
    }

    pub fn component(def: ComponentDef) -> Self {
        Self::new(NodeKind::Component(def))
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_attr(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_prop(key, PropValue::Str(value.into()))
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props.extend(props);
        self
    }

    /// Bind `listener` under the prop `name` (e.g. `"onClick"`)
    pub fn on(self, name: impl Into<String>, listener: Listener) -> Self {
        self.with_prop(name, PropValue::Listener(listener))
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text_content(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Text => self.props.get(TEXT_PROP).and_then(PropValue::as_str),
            _ => None,
        }
    }
}
