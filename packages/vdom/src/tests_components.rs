//! Component expansion, caching and lifecycle through full render passes
use crate::memory::{DomOp, MemoryDom, NodeHandle};
use crate::renderer::Renderer;
use crate::vnode::{Component, ComponentDef, PropValue, Props, VNode};
use std::cell::RefCell;

thread_local! {
    static LOG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn log(entry: impl Into<String>) {
    LOG.with(|l| l.borrow_mut().push(entry.into()));
}

fn take_log() -> Vec<String> {
    LOG.with(|l| std::mem::take(&mut *l.borrow_mut()))
}

struct Toolbar;

impl Component for Toolbar {
    fn render(&self, props: &Props) -> VNode {
        let count = props.get("count").and_then(PropValue::as_int).unwrap_or(0);
        VNode::element("div")
            .with_attr("class", "toolbar")
            .with_children((0..count).map(|i| VNode::element("button").with_prop("data-index", i)))
    }

    fn mounted(&mut self, _props: &Props) {
        log("toolbar mounted");
    }

    fn before_destroy(&mut self) {
        log("toolbar destroyed");
    }
}

fn create_toolbar(_: &Props) -> Box<dyn Component> {
    log("toolbar created");
    Box::new(Toolbar)
}

const TOOLBAR: ComponentDef = ComponentDef::new("Toolbar", create_toolbar);

struct Inner;

impl Component for Inner {
    fn render(&self, _props: &Props) -> VNode {
        VNode::element("section").with_child(VNode::text("inner"))
    }
}

struct Outer;

impl Component for Outer {
    fn render(&self, _props: &Props) -> VNode {
        VNode::component(INNER)
    }
}

fn create_inner(_: &Props) -> Box<dyn Component> {
    Box::new(Inner)
}

fn create_outer(_: &Props) -> Box<dyn Component> {
    Box::new(Outer)
}

const INNER: ComponentDef = ComponentDef::new("Inner", create_inner);
const OUTER: ComponentDef = ComponentDef::new("Outer", create_outer);

fn toolbar(count: i64) -> VNode {
    VNode::component(TOOLBAR).with_prop("count", count)
}

fn renderer() -> (Renderer<MemoryDom>, NodeHandle) {
    let mut dom = MemoryDom::new();
    let container = dom.create_container("main");
    (Renderer::new(dom, container), container)
}

#[test]
fn test_component_renders_its_single_child() {
    take_log();
    let (mut renderer, container) = renderer();
    let stats = renderer.render(toolbar(2)).unwrap();

    assert_eq!(stats.rendered, 1);
    assert_eq!(stats.mounted, 1);
    assert_eq!(
        renderer.backend().inner_html(container),
        r#"<div class="toolbar"><button data-index="0"></button><button data-index="1"></button></div>"#
    );
    let root = renderer.root_node().copied().unwrap();
    assert_eq!(renderer.backend().tag(root), Some("div"));
}

#[test]
fn test_component_instance_is_reused_across_passes() {
    take_log();
    let (mut renderer, container) = renderer();
    renderer.render(toolbar(1)).unwrap();
    let first_root = renderer.root_node().copied();

    let stats = renderer.render(toolbar(3)).unwrap();

    assert_eq!(renderer.root_node().copied(), first_root);
    assert_eq!(stats.mounted, 0);
    assert_eq!(renderer.cache().len(), 1);
    assert_eq!(
        renderer
            .cache()
            .get("Toolbar")
            .and_then(|i| i.props.get("count"))
            .and_then(PropValue::as_int),
        Some(3)
    );
    assert_eq!(renderer.backend().children(first_root.unwrap()).len(), 3);
    assert_eq!(renderer.backend().children(container).len(), 1);
    assert_eq!(take_log(), vec!["toolbar created", "toolbar mounted"]);
}

#[test]
fn test_shrinking_component_output_removes_trailing_buttons() {
    let (mut renderer, _) = renderer();
    renderer.render(toolbar(3)).unwrap();
    let root = renderer.root_node().copied().unwrap();
    renderer.backend_mut().clear_ops();

    let stats = renderer.render(toolbar(1)).unwrap();

    assert_eq!(stats.removed, 2);
    assert_eq!(renderer.backend().children(root).len(), 1);
    assert!(renderer.backend().ops().iter().all(DomOp::is_remove));
}

#[test]
fn test_replacing_component_detaches_its_host_once() {
    let (mut renderer, container) = renderer();
    renderer.render(toolbar(2)).unwrap();
    let toolbar_div = renderer.root_node().copied().unwrap();
    renderer.backend_mut().clear_ops();

    renderer.render(VNode::element("p")).unwrap();

    let removals: Vec<&DomOp> = renderer.backend().ops().iter().filter(|op| op.is_remove()).collect();
    assert_eq!(
        removals,
        vec![&DomOp::RemoveChild {
            parent: container,
            child: toolbar_div
        }]
    );
    assert_eq!(renderer.backend().inner_html(container), "<p></p>");
}

#[test]
fn test_nested_component_layers_are_transparent() {
    let (mut renderer, container) = renderer();
    renderer
        .render(VNode::element("div").with_child(VNode::component(OUTER)))
        .unwrap();
    assert_eq!(
        renderer.backend().inner_html(container),
        "<div><section>inner</section></div>"
    );
    let div = renderer.root_node().copied().unwrap();
    let section = renderer.backend().children(div)[0];
    renderer.backend_mut().clear_ops();

    let stats = renderer
        .render(VNode::element("div").with_child(VNode::element("span")))
        .unwrap();

    assert_eq!(stats.removed, 1);
    assert_eq!(
        renderer.backend().ops().iter().filter(|op| op.is_remove()).count(),
        1
    );
    assert!(renderer
        .backend()
        .ops()
        .contains(&DomOp::RemoveChild { parent: div, child: section }));
    assert_eq!(renderer.backend().inner_html(container), "<div><span></span></div>");
}

#[test]
fn test_same_component_twice_shares_one_instance() {
    let (mut renderer, _) = renderer();
    renderer
        .render(VNode::element("div").with_child(toolbar(1)).with_child(toolbar(2)))
        .unwrap();

    assert_eq!(renderer.cache().len(), 1);
    let count = renderer
        .cache()
        .get("Toolbar")
        .and_then(|i| i.props.get("count"))
        .and_then(PropValue::as_int);
    assert_eq!(count, Some(2), "last materialize wins");
}

#[test]
fn test_destroy_detaches_and_runs_callbacks() {
    take_log();
    let (mut renderer, container) = renderer();
    renderer.render(toolbar(1)).unwrap();
    renderer.destroy().unwrap();

    assert!(renderer.backend().children(container).is_empty());
    assert!(renderer.cache().is_empty());
    assert!(renderer.tree().is_none());
    assert_eq!(
        take_log(),
        vec!["toolbar created", "toolbar mounted", "toolbar destroyed"]
    );
}
