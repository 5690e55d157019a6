//! The logical view tree.
//!
//! A `ViewNode` is the higher-level node exposed to the attribute pipeline
//! and the scheduler: it owns exactly one `Layer`, an optional scroll state,
//! an optional platform view handle, and accessibility metadata. Child
//! `ViewNode`s mirror the child `Layer`s one-for-one (spec.md §3, §4.9.4).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::layer::LayerHandle;

new_key_type! {
    /// Stable identity for a `ViewNode`, independent of tree position.
    /// Used as the key into attribute bindings and accessibility lookups.
    pub struct ViewNodeId;
}

/// Accessibility role, kept intentionally small — Mica derives a tree, it
/// does not implement a platform accessibility bridge (spec.md non-goals).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessibilityRole {
    None,
    Button,
    Text,
    Image,
    Container,
}

/// Accessibility metadata carried by a `ViewNode`.
#[derive(Clone, Debug, Default)]
pub struct AccessibilityState {
    pub label: Option<String>,
    pub role: Option<AccessibilityRole>,
    pub hidden: bool,
}

/// A handle to an opaque platform view. Mica never constructs or destroys
/// these itself — they are created and owned by `mica_platform`'s
/// `ViewTransaction` implementation and only referenced here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlatformViewId(pub u64);

/// The logical node owning a `Layer` plus pipeline-facing state.
///
/// Invariant: every `ViewNode` has exactly one `Layer`, and at most one
/// `PlatformViewId` (a node is either a pure presentation container or a
/// single platform-native view; never both, per spec.md §3).
pub struct ViewNode {
    pub id: ViewNodeId,
    pub layer: LayerHandle,
    pub platform_view: Option<PlatformViewId>,
    pub accessibility: AccessibilityState,
    pub scrollable: bool,
    children: Vec<ViewNodeHandle>,
    parent: Option<Weak<RefCell<ViewNode>>>,
}

impl ViewNode {
    pub fn new(id: ViewNodeId, layer: LayerHandle) -> Self {
        Self {
            id,
            layer,
            platform_view: None,
            accessibility: AccessibilityState::default(),
            scrollable: false,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// Shared handle to a `ViewNode`, mirroring `LayerHandle`'s interior
/// mutability pattern.
#[derive(Clone)]
pub struct ViewNodeHandle(Rc<RefCell<ViewNode>>);

impl ViewNodeHandle {
    pub fn new(node: ViewNode) -> Self {
        Self(Rc::new(RefCell::new(node)))
    }

    pub fn borrow(&self) -> std::cell::Ref<'_, ViewNode> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, ViewNode> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &ViewNodeHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn downgrade(&self) -> Weak<RefCell<ViewNode>> {
        Rc::downgrade(&self.0)
    }

    pub fn parent(&self) -> Option<ViewNodeHandle> {
        self.borrow().parent.as_ref().and_then(|w| w.upgrade()).map(ViewNodeHandle)
    }

    /// Insert `child` at `index` in both the logical tree and the backing
    /// layer tree (the two trees are always isomorphic, spec.md §3).
    pub fn insert_child(&self, index: usize, child: ViewNodeHandle) {
        self.layer().insert_child(index, child.layer());
        child.borrow_mut().parent = Some(self.downgrade());
        let mut me = self.borrow_mut();
        let index = index.min(me.children.len());
        me.children.insert(index, child);
    }

    pub fn remove_child(&self, child: &ViewNodeHandle) -> Option<ViewNodeHandle> {
        self.layer().remove_child(&child.layer());
        let mut me = self.borrow_mut();
        let pos = me.children.iter().position(|c| c.ptr_eq(child))?;
        let removed = me.children.remove(pos);
        drop(me);
        removed.borrow_mut().parent = None;
        Some(removed)
    }

    pub fn children(&self) -> Vec<ViewNodeHandle> {
        self.borrow().children.clone()
    }

    pub fn layer(&self) -> LayerHandle {
        self.borrow().layer.clone()
    }

    pub fn id(&self) -> ViewNodeId {
        self.borrow().id
    }
}

/// Owns the slotmap of all live `ViewNode`s in one tree, so ids stay stable
/// across moves (used by the attribute pipeline to address nodes by id
/// rather than by handle, per spec.md §4.9's `ViewNodeAttribute`).
#[derive(Default)]
pub struct ViewTree {
    nodes: SlotMap<ViewNodeId, ViewNodeHandle>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new node with a freshly minted id, wrapping `layer`.
    pub fn create_node(&mut self, layer: LayerHandle) -> ViewNodeHandle {
        let key = self
            .nodes
            .insert_with_key(|id| ViewNodeHandle::new(ViewNode::new(id, layer)));
        self.nodes[key].clone()
    }

    pub fn get(&self, id: ViewNodeId) -> Option<ViewNodeHandle> {
        self.nodes.get(id).cloned()
    }

    pub fn remove(&mut self, id: ViewNodeId) -> Option<ViewNodeHandle> {
        self.nodes.remove(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All live node ids, in slotmap iteration order (not tree order) — the
    /// scheduler uses this to sweep every node for dirty layout/animation
    /// work once per frame rather than maintaining a second dirty-node set.
    pub fn node_ids(&self) -> Vec<ViewNodeId> {
        self.nodes.keys().collect()
    }
}
