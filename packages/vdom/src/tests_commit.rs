//! Placement of fresh nodes and updates of reused ones
use crate::memory::{DomOp, MemoryDom, NodeHandle};
use crate::renderer::Renderer;
use crate::vnode::{Component, ComponentDef, Event, Listener, Props, VNode};
use std::cell::Cell;
use std::rc::Rc;

fn renderer() -> (Renderer<MemoryDom>, NodeHandle) {
    let mut dom = MemoryDom::new();
    let container = dom.create_container("main");
    (Renderer::new(dom, container), container)
}

fn row(tags: &[&str]) -> VNode {
    VNode::element("div").with_children(tags.iter().map(|t| VNode::element(*t)))
}

struct Badge;

impl Component for Badge {
    fn render(&self, _props: &Props) -> VNode {
        VNode::element("em")
    }
}

fn create_badge(_: &Props) -> Box<dyn Component> {
    Box::new(Badge)
}

const BADGE: ComponentDef = ComponentDef::new("Badge", create_badge);

#[test]
fn test_replacement_is_inserted_before_reused_sibling() {
    let (mut renderer, container) = renderer();
    renderer.render(row(&["p", "p"])).unwrap();
    renderer.render(row(&["span", "p"])).unwrap();

    assert_eq!(renderer.backend().inner_html(container), "<div><span></span><p></p></div>");
}

#[test]
fn test_several_replacements_keep_declared_order() {
    let (mut renderer, container) = renderer();
    renderer.render(row(&["i", "i", "p"])).unwrap();
    renderer.render(row(&["a", "b", "p"])).unwrap();

    assert_eq!(
        renderer.backend().inner_html(container),
        "<div><a></a><b></b><p></p></div>"
    );
}

#[test]
fn test_anchor_is_found_through_component_sibling() {
    let (mut renderer, container) = renderer();
    let with_badge =
        |first: &str| VNode::element("div").with_child(VNode::element(first)).with_child(VNode::component(BADGE));

    renderer.render(with_badge("p")).unwrap();
    let div = renderer.root_node().copied().unwrap();
    let em = renderer.backend().children(div)[1];
    renderer.backend_mut().clear_ops();

    renderer.render(with_badge("h1")).unwrap();

    assert_eq!(renderer.backend().inner_html(container), "<div><h1></h1><em></em></div>");
    let inserted = renderer
        .backend()
        .ops()
        .iter()
        .find_map(|op| match op {
            DomOp::InsertBefore { anchor, .. } => Some(*anchor),
            _ => None,
        })
        .flatten();
    assert_eq!(inserted, Some(em));
}

#[test]
fn test_appending_siblings_has_no_anchor() {
    let (mut renderer, container) = renderer();
    renderer.render(row(&["p"])).unwrap();
    renderer.render(row(&["p", "a", "b"])).unwrap();

    assert_eq!(
        renderer.backend().inner_html(container),
        "<div><p></p><a></a><b></b></div>"
    );
}

#[test]
fn test_text_change_updates_node_in_place() {
    let (mut renderer, container) = renderer();
    renderer
        .render(VNode::element("p").with_child(VNode::text("before")))
        .unwrap();
    let p = renderer.root_node().copied().unwrap();
    let text = renderer.backend().children(p)[0];
    renderer.backend_mut().clear_ops();

    let stats = renderer
        .render(VNode::element("p").with_child(VNode::text("after")))
        .unwrap();

    assert_eq!(stats.updated, 1);
    assert_eq!(
        renderer.backend().ops(),
        &[DomOp::SetText {
            node: text,
            text: "after".into()
        }]
    );
    assert_eq!(renderer.backend().inner_html(container), "<p>after</p>");
}

#[test]
fn test_swapped_listener_fires_new_callback_only() {
    let (mut renderer, _) = renderer();
    let first_hits = Rc::new(Cell::new(0));
    let second_hits = Rc::new(Cell::new(0));
    let first = {
        let hits = first_hits.clone();
        Listener::new(move |_| hits.set(hits.get() + 1))
    };
    let second = {
        let hits = second_hits.clone();
        Listener::new(move |_| hits.set(hits.get() + 1))
    };

    renderer.render(VNode::element("button").on("onClick", first)).unwrap();
    let button = renderer.root_node().copied().unwrap();
    renderer.render(VNode::element("button").on("onClick", second)).unwrap();

    assert_eq!(renderer.backend().dispatch(button, &Event::new("click")), 1);
    assert_eq!(first_hits.get(), 0);
    assert_eq!(second_hits.get(), 1);
}

#[test]
fn test_removed_attribute_is_cleared() {
    let (mut renderer, container) = renderer();
    renderer
        .render(VNode::element("input").with_attr("disabled", "true").with_attr("name", "q"))
        .unwrap();
    renderer
        .render(VNode::element("input").with_attr("name", "q"))
        .unwrap();

    assert_eq!(renderer.backend().inner_html(container), r#"<input name="q"></input>"#);
}

#[test]
fn test_unmount_then_render_starts_fresh() {
    let (mut renderer, container) = renderer();
    renderer.render(row(&["p"])).unwrap();
    renderer.unmount().unwrap();
    assert_eq!(renderer.backend().inner_html(container), "");

    let stats = renderer.render(row(&["p"])).unwrap();
    assert_eq!(stats.created, 2);
    assert_eq!(stats.reused, 0);
    assert_eq!(renderer.backend().inner_html(container), "<div><p></p></div>");
}
