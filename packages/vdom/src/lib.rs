//! # Weft VDOM
//!
//! Threaded virtual-tree reconciliation engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ VNode: pure description (tag/text/component)│
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ build: stackless pre-order walk             │
//! │  - materialize components (ComponentCache)  │
//! │  - create missing real nodes (Dom)          │
//! │  - link children, positional reuse          │
//! │  - collect stale nodes (RemovalQueue)       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ flush → commit → mounted callbacks          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Trees are arenas of slots threaded through `first_child`/`next`/`parent`
//! indices. Each pass builds a fresh arena; reused slots point at their
//! counterpart in the previous arena through `old`.
//!
//! ## Usage
//!
//! ```rust
//! use weft_vdom::{MemoryDom, Renderer, VNode};
//!
//! let mut dom = MemoryDom::new();
//! let container = dom.create_container("main");
//! let mut renderer = Renderer::new(dom, container);
//!
//! renderer.render(VNode::element("p").with_child(VNode::text("hi"))).unwrap();
//! assert_eq!(renderer.backend().inner_html(container), "<p>hi</p>");
//! ```

pub mod backend;
pub mod commit;
pub mod component;
pub mod dom;
pub mod error;
pub mod memory;
pub mod reconcile;
pub mod renderer;
pub mod scene;
pub mod tree;
pub mod vnode;

#[cfg(test)]
mod tests_components;

#[cfg(test)]
mod tests_commit;

pub use backend::Backend;
pub use commit::{commit, CommitStats};
pub use component::{ComponentCache, ComponentInstance};
pub use dom::Dom;
pub use error::{RenderError, RenderResult};
pub use memory::{DomOp, MemoryDom, NodeHandle};
pub use reconcile::{build, BuildOutput, BuildStats, RemovalQueue};
pub use renderer::{PassStats, Renderer};
pub use scene::{Handlers, Scene, SceneError, SceneNode};
pub use tree::{Effect, NodeId, Slot, Tree};
pub use vnode::{
    Component, ComponentDef, Event, Listener, NodeKind, PropValue, Props, VNode, TEXT_PROP,
};

// Re-export common types for convenience
pub use weft_common::{BackendError, RenderConfig};
