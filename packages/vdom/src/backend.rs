use crate::vnode::Listener;
use std::fmt;
use weft_common::BackendResult;

/// Real UI node capability set the engine drives
///
/// Node handles are cheap to clone and compare by identity, like DOM node
/// references.
pub trait Backend {
    type Node: Clone + PartialEq + fmt::Debug;

    fn create_element(&mut self, tag: &str) -> BackendResult<Self::Node>;

    fn create_text(&mut self, text: &str) -> BackendResult<Self::Node>;

    fn set_text(&mut self, node: &Self::Node, text: &str) -> BackendResult<()>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> BackendResult<()>;

    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> BackendResult<()>;

    fn add_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        listener: &Listener,
    ) -> BackendResult<()>;

    fn remove_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        listener: &Listener,
    ) -> BackendResult<()>;

    /// Attach `child` under `parent` before `anchor`, or last when `anchor` is `None`
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        anchor: Option<&Self::Node>,
    ) -> BackendResult<()>;

    /// Detach `child` from `parent`; fails with `BackendError::NotAChild` when it is not attached there
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> BackendResult<()>;
}
