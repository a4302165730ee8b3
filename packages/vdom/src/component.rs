//! Component cache: one live instance per component identity.

use crate::vnode::{Component, ComponentDef, Props, VNode};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Live component with its current props
pub struct ComponentInstance {
    /// Replaced wholesale on every pass that revisits the instance
    pub props: Props,
    /// True from creation until the first post-attachment callback
    pub mounting: bool,
    component: Box<dyn Component>,
}

impl ComponentInstance {
    fn new(def: &ComponentDef, props: Props) -> Self {
        let component = def.instantiate(&props);
        Self {
            props,
            mounting: true,
            component,
        }
    }

    pub fn render(&self) -> VNode {
        self.component.render(&self.props)
    }

    /// Runs `mounted` once; later calls are no-ops
    pub fn mount(&mut self) -> bool {
        if !self.mounting {
            return false;
        }
        self.mounting = false;
        self.component.mounted(&self.props);
        true
    }

    fn destroy(&mut self) {
        self.component.before_destroy();
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("props", &self.props)
            .field("mounting", &self.mounting)
            .finish_non_exhaustive()
    }
}

/// Registry with create-or-fetch semantics and no eviction
///
/// Keyed strictly by identity: the same component used twice in one tree
/// shares a single instance and a single props value.
#[derive(Debug, Default)]
pub struct ComponentCache {
    instances: HashMap<&'static str, ComponentInstance>,
    /// Identities in first-encounter order
    order: Vec<&'static str>,
}

impl ComponentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the instance for `def`, replacing its props, or create it with `mounting` set
    pub fn materialize(&mut self, def: &ComponentDef, props: Props) -> &mut ComponentInstance {
        let name = def.name();
        match self.instances.entry(name) {
            Entry::Occupied(entry) => {
                let instance = entry.into_mut();
                instance.props = props;
                instance
            }
            Entry::Vacant(entry) => {
                debug!(component = name, "Creating component instance");
                self.order.push(name);
                entry.insert(ComponentInstance::new(def, props))
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ComponentInstance> {
        self.instances.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ComponentInstance> {
        self.instances.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Identities whose instance still waits for its `mounted` callback
    pub fn mounting(&self) -> Vec<&'static str> {
        self.order
            .iter()
            .copied()
            .filter(|name| self.instances.get(name).is_some_and(|i| i.mounting))
            .collect()
    }

    /// Run `mounted` on every instance still flagged as mounting; returns how many ran
    pub fn mount_pending(&mut self) -> usize {
        let mut mounted = 0;
        for name in self.mounting() {
            if let Some(instance) = self.instances.get_mut(name) {
                if instance.mount() {
                    debug!(component = name, "Component mounted");
                    mounted += 1;
                }
            }
        }
        mounted
    }

    /// Session teardown: run every `before_destroy` and forget all instances
    pub fn destroy_all(&mut self) {
        for name in self.order.drain(..) {
            if let Some(mut instance) = self.instances.remove(name) {
                instance.destroy();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::PropValue;
    use std::cell::RefCell;
    use std::rc::Rc;

    thread_local! {
        static CREATED: RefCell<u32> = const { RefCell::new(0) };
        static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    struct Label;

    impl Component for Label {
        fn render(&self, props: &Props) -> VNode {
            let text = props.get("text").and_then(PropValue::as_str).unwrap_or_default();
            VNode::element("span").with_child(VNode::text(text))
        }

        fn mounted(&mut self, _props: &Props) {
            EVENTS.with(|e| e.borrow_mut().push("mounted".into()));
        }

        fn before_destroy(&mut self) {
            EVENTS.with(|e| e.borrow_mut().push("destroyed".into()));
        }
    }

    fn label(_: &Props) -> Box<dyn Component> {
        CREATED.with(|c| *c.borrow_mut() += 1);
        Box::new(Label)
    }

    const LABEL: ComponentDef = ComponentDef::new("Label", label);

    fn props(text: &str) -> Props {
        let mut props = Props::new();
        props.insert("text".into(), text.into());
        props
    }

    #[test]
    fn test_materialize_creates_once_and_replaces_props() {
        CREATED.with(|c| *c.borrow_mut() = 0);
        let mut cache = ComponentCache::new();

        let first = cache.materialize(&LABEL, props("a"));
        assert!(first.mounting);
        first.mounting = false;

        let second = cache.materialize(&LABEL, props("b"));
        assert!(!second.mounting, "reuse must not reset lifecycle");
        assert_eq!(second.props.get("text").and_then(PropValue::as_str), Some("b"));

        assert_eq!(cache.len(), 1);
        assert_eq!(CREATED.with(|c| *c.borrow()), 1);
    }

    #[test]
    fn test_props_are_replaced_not_merged() {
        let mut cache = ComponentCache::new();
        let mut first = props("a");
        first.insert("extra".into(), true.into());
        cache.materialize(&LABEL, first);

        let instance = cache.materialize(&LABEL, props("b"));
        assert!(instance.props.get("extra").is_none());
    }

    #[test]
    fn test_render_uses_current_props() {
        let mut cache = ComponentCache::new();
        cache.materialize(&LABEL, props("a"));
        let rendered = cache.materialize(&LABEL, props("hello")).render();

        assert_eq!(rendered.children[0].text_content(), Some("hello"));
    }

    #[test]
    fn test_mount_pending_runs_once() {
        EVENTS.with(|e| e.borrow_mut().clear());
        let mut cache = ComponentCache::new();
        cache.materialize(&LABEL, props("a"));

        assert_eq!(cache.mounting(), vec!["Label"]);
        assert_eq!(cache.mount_pending(), 1);
        assert_eq!(cache.mount_pending(), 0);
        assert!(cache.mounting().is_empty());
        assert_eq!(EVENTS.with(|e| e.borrow().clone()), vec!["mounted"]);
    }

    #[test]
    fn test_destroy_all_runs_callbacks_and_empties() {
        EVENTS.with(|e| e.borrow_mut().clear());
        let mut cache = ComponentCache::new();
        cache.materialize(&LABEL, props("a"));
        cache.destroy_all();

        assert!(cache.is_empty());
        assert_eq!(EVENTS.with(|e| e.borrow().clone()), vec!["destroyed"]);
    }

    #[test]
    fn test_shared_data_props_survive_reuse() {
        let mut cache = ComponentCache::new();
        let shared = Rc::new(5u32);
        let mut p = Props::new();
        p.insert("data".into(), PropValue::Data(shared.clone()));
        let instance = cache.materialize(&LABEL, p);

        assert_eq!(instance.props.get("data").and_then(|v| v.downcast_ref::<u32>()), Some(&5));
    }
}
