//! # Weft WASM
//!
//! Browser entry points. [`WebRenderer`] drives a [`dom::WebDom`] from scene
//! frames passed in as JSON, the same format `weft replay` reads.

pub mod dom;

use dom::WebDom;
use wasm_bindgen::prelude::*;
use weft_common::RenderConfig;
use weft_vdom::{Handlers, Renderer, SceneNode};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct WebRenderer {
    renderer: Renderer<WebDom>,
    handlers: Handlers,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Mount into the element with id `container_id`; `config` is an optional weft.config.json body
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, config: Option<String>) -> Result<WebRenderer, JsValue> {
        let config = match config {
            Some(json) => RenderConfig::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("Config error: {}", e)))?,
            None => RenderConfig::default(),
        };

        let dom = WebDom::new().map_err(to_js)?;
        let container = dom.element_by_id(container_id).map_err(to_js)?;

        Ok(WebRenderer {
            renderer: Renderer::with_config(dom, container, config),
            handlers: Handlers::default(),
        })
    }

    /// Render one scene frame; returns the pass stats as JSON
    pub fn render(&mut self, frame: &str) -> Result<String, JsValue> {
        let node: SceneNode = serde_json::from_str(frame)
            .map_err(|e| JsValue::from_str(&format!("Scene error: {}", e)))?;
        let vnode = node.to_vnode(self.renderer.config(), &mut self.handlers);

        let stats = self.renderer.render(vnode).map_err(to_js)?;

        serde_json::to_string(&stats)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn unmount(&mut self) -> Result<(), JsValue> {
        self.renderer.unmount().map_err(to_js)
    }

    /// Unmount and run every cached component's teardown hook
    pub fn destroy(&mut self) -> Result<(), JsValue> {
        self.renderer.destroy().map_err(to_js)
    }

    #[wasm_bindgen(getter, js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.renderer.backend().binding_count()
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
