//! JSON scene files: a sequence of frames, each one root description.
//!
//! Event attributes (`onClick` under the default config) carry a handler
//! name instead of a value. [`Handlers`] turns each name into one listener
//! that stays the same across frames, so replaying an unchanged frame
//! produces no listener churn.

use crate::vnode::{Listener, PropValue, VNode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use weft_common::RenderConfig;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Cannot read scene {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub frames: Vec<SceneNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneNode {
    // Tried first: an object with an `element` key is always an element
    Element {
        element: String,
        #[serde(default)]
        attrs: BTreeMap<String, serde_json::Value>,
        #[serde(default)]
        children: Vec<SceneNode>,
    },
    Text {
        text: String,
    },
}

impl Scene {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> SceneResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn node_count(&self) -> usize {
        self.frames.iter().map(SceneNode::node_count).sum()
    }
}

impl SceneNode {
    pub fn node_count(&self) -> usize {
        match self {
            SceneNode::Text { .. } => 1,
            SceneNode::Element { children, .. } => {
                1 + children.iter().map(SceneNode::node_count).sum::<usize>()
            }
        }
    }

    /// Description for this node; event attrs name a handler looked up in `handlers`
    pub fn to_vnode(&self, config: &RenderConfig, handlers: &mut Handlers) -> VNode {
        match self {
            SceneNode::Text { text } => VNode::text(text.as_str()),
            SceneNode::Element {
                element,
                attrs,
                children,
            } => {
                let mut vnode = VNode::element(element.as_str());
                for (name, value) in attrs {
                    let prop = if config.is_event_prop(name) {
                        let handler = value.as_str().unwrap_or(name.as_str());
                        PropValue::Listener(handlers.get(handler))
                    } else {
                        json_to_prop(value)
                    };
                    vnode = vnode.with_prop(name.as_str(), prop);
                }
                vnode.with_children(children.iter().map(|c| c.to_vnode(config, handlers)))
            }
        }
    }
}

fn json_to_prop(value: &serde_json::Value) -> PropValue {
    match value {
        serde_json::Value::Bool(b) => PropValue::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => PropValue::Int(i),
            None => PropValue::Float(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => PropValue::Str(s.clone()),
        other => PropValue::Str(other.to_string()),
    }
}

/// Named listeners; the same name yields the same listener across frames
#[derive(Debug, Default)]
pub struct Handlers {
    listeners: HashMap<String, Listener>,
}

impl Handlers {
    pub fn get(&mut self, name: &str) -> Listener {
        self.listeners
            .entry(name.to_string())
            .or_insert_with(|| {
                let handler = name.to_string();
                Listener::new(move |event| info!(handler = %handler, event = %event.name, "Handler fired"))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::NodeKind;

    const SCENE: &str = r#"{
        "frames": [
            { "element": "div", "attrs": { "class": "a", "tabindex": 1, "onClick": "select" },
              "children": [ { "text": "hello" } ] },
            { "element": "div" }
        ]
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_json(SCENE).unwrap();
        assert_eq!(scene.frames.len(), 2);
        assert_eq!(scene.node_count(), 3);
        assert!(matches!(&scene.frames[1], SceneNode::Element { children, .. } if children.is_empty()));
    }

    #[test]
    fn test_to_vnode_maps_attrs_and_events() {
        let scene = Scene::from_json(SCENE).unwrap();
        let mut handlers = Handlers::default();
        let vnode = scene.frames[0].to_vnode(&RenderConfig::default(), &mut handlers);

        assert_eq!(vnode.kind, NodeKind::Element("div".into()));
        assert_eq!(vnode.props.get("class"), Some(&PropValue::Str("a".into())));
        assert_eq!(vnode.props.get("tabindex"), Some(&PropValue::Int(1)));
        assert!(vnode.props.get("onClick").and_then(PropValue::as_listener).is_some());
        assert_eq!(vnode.children[0].text_content(), Some("hello"));
    }

    #[test]
    fn test_handlers_are_stable_by_name() {
        let mut handlers = Handlers::default();
        let a = handlers.get("select");
        let b = handlers.get("select");
        let c = handlers.get("close");

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(handlers.len(), 2);
    }

    #[test]
    fn test_rejects_malformed_scene() {
        let err = Scene::from_json(r#"{ "frames": [ { "tag": "div" } ] }"#).unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
    }

    #[test]
    fn test_element_key_wins_over_text() {
        let node: SceneNode = serde_json::from_str(
            r#"{ "element": "p", "text": "x", "children": [ { "text": "y" } ] }"#,
        )
        .unwrap();

        match node {
            SceneNode::Element { element, children, .. } => {
                assert_eq!(element, "p");
                assert_eq!(children, vec![SceneNode::Text { text: "y".into() }]);
            }
            other => panic!("expected an element, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = Scene::load(Path::new("/nonexistent/scene.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/scene.json"));
    }
}
