//! # Render driver
//!
//! Runs whole reconciliation passes against one mount container:
//! build → flush removals → commit → mounted callbacks.
//!
//! Owns the component cache and the previously rendered tree, so nothing
//! engine-wide lives in globals. Passes are strictly sequential (`&mut self`).

use crate::backend::Backend;
use crate::commit::commit;
use crate::component::ComponentCache;
use crate::dom::Dom;
use crate::error::{RenderError, RenderResult};
use crate::reconcile::build;
use crate::tree::Tree;
use crate::vnode::VNode;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use weft_common::{BackendError, RenderConfig};

/// Counters for one full pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub created: usize,
    pub reused: usize,
    pub removed: usize,
    pub attached: usize,
    pub updated: usize,
    pub rendered: usize,
    pub mounted: usize,
}

/// Renders successive root descriptions into a container node
pub struct Renderer<B: Backend> {
    dom: Dom<B>,
    cache: ComponentCache,
    container: B::Node,
    current: Option<Tree<B::Node>>,
    passes: u64,
}

impl<B: Backend> Renderer<B> {
    pub fn new(backend: B, container: B::Node) -> Self {
        Self::with_config(backend, container, RenderConfig::default())
    }

    pub fn with_config(backend: B, container: B::Node, config: RenderConfig) -> Self {
        Self {
            dom: Dom::new(backend, config),
            cache: ComponentCache::new(),
            container,
            current: None,
            passes: 0,
        }
    }

    /// Run one reconciliation pass for `root`
    ///
    /// A pass that fails while building leaves the real nodes untouched and
    /// the previous tree stays current. Once removals or attachments have
    /// started the previous tree no longer describes the container, so both
    /// trees are detached and the next pass renders from scratch.
    #[instrument(skip_all, fields(pass = self.passes))]
    pub fn render(&mut self, root: VNode) -> RenderResult<PassStats> {
        let mut tree = Tree::mount(self.container.clone(), root);
        let previous = self.current.take();
        let mut applying = false;

        match self.run_pass(&mut tree, previous.as_ref(), &mut applying) {
            Ok(stats) => {
                self.passes += 1;
                self.current = Some(tree);
                info!(
                    created = stats.created,
                    reused = stats.reused,
                    removed = stats.removed,
                    updated = stats.updated,
                    "Render pass complete"
                );
                Ok(stats)
            }
            Err(err) if !applying => {
                self.current = previous;
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "Pass failed while applying changes, clearing container");
                self.discard(&tree, previous.as_ref());
                Err(err)
            }
        }
    }

    fn run_pass(
        &mut self,
        tree: &mut Tree<B::Node>,
        previous: Option<&Tree<B::Node>>,
        applying: &mut bool,
    ) -> RenderResult<PassStats> {
        let built = build(tree, previous, &mut self.cache, &mut self.dom)?;
        *applying = true;

        let removed = match previous {
            Some(old) => built.removals.flush(&mut self.dom, old)?,
            None => {
                debug_assert!(built.removals.is_empty());
                0
            }
        };

        let committed = commit(tree, previous, &mut self.dom)?;
        let mounted = self.cache.mount_pending();

        Ok(PassStats {
            created: built.stats.created,
            reused: built.stats.reused,
            removed,
            attached: committed.attached,
            updated: committed.updated,
            rendered: built.stats.rendered,
            mounted,
        })
    }

    /// Detach the top-level nodes of a half-applied pass and of the tree it
    /// replaced. Either may already be detached.
    fn discard(&mut self, tree: &Tree<B::Node>, previous: Option<&Tree<B::Node>>) {
        for t in std::iter::once(tree).chain(previous) {
            for child in t.children(t.root()) {
                match self.dom.remove_node(t, child, &self.container) {
                    Ok(()) | Err(RenderError::Backend(BackendError::NotAChild { .. })) => {}
                    Err(err) => warn!(node = %child, error = %err, "Cannot detach node"),
                }
            }
        }
    }

    /// Detach everything rendered so far; the next pass starts from scratch
    pub fn unmount(&mut self) -> RenderResult<()> {
        if let Some(tree) = self.current.take() {
            for child in tree.children(tree.root()) {
                self.dom.remove_node(&tree, child, &self.container)?;
            }
            debug!("Unmounted render tree");
        }
        Ok(())
    }

    /// Unmount and run every component's `before_destroy`
    pub fn destroy(&mut self) -> RenderResult<()> {
        self.unmount()?;
        self.cache.destroy_all();
        Ok(())
    }

    pub fn backend(&self) -> &B {
        self.dom.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.dom.backend_mut()
    }

    pub fn into_backend(self) -> B {
        self.dom.into_backend()
    }

    pub fn config(&self) -> &RenderConfig {
        self.dom.config()
    }

    pub fn cache(&self) -> &ComponentCache {
        &self.cache
    }

    pub fn container(&self) -> &B::Node {
        &self.container
    }

    /// Tree of the last successful pass
    pub fn tree(&self) -> Option<&Tree<B::Node>> {
        self.current.as_ref()
    }

    /// Real node the rendered root resolves to
    pub fn root_node(&self) -> Option<&B::Node> {
        let tree = self.current.as_ref()?;
        let root = tree.first_child(tree.root())?;
        tree.host(root).and_then(|host| tree.node(host))
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }
}
