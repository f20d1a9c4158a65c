//! The live component hierarchy.
//!
//! The tree is owned by the UI thread (see [`Ui`](crate::Ui)); every read and
//! write goes through a `RefCell` borrow there. Caller threads only ever see
//! [`ComponentId`]s and reach the tree through the action dispatcher.

use crate::component::{Component, ComponentId, ComponentKind};
use crate::geometry::{Point, Rect};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

type Children = SmallVec<[ComponentId; 4]>;

#[derive(Debug)]
pub enum TreeError {
    Missing { id: ComponentId },
    NotAWindow { kind: ComponentKind },
    Cycle { id: ComponentId, parent: ComponentId },
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::Missing { id } => write!(f, "component {id} missing"),
            TreeError::NotAWindow { kind } => {
                write!(f, "{kind} is not a window kind and cannot be a root")
            }
            TreeError::Cycle { id, parent } => {
                write!(f, "cannot move component {id} under its own descendant {parent}")
            }
        }
    }
}

impl std::error::Error for TreeError {}

struct Node {
    component: Component,
    parent: Option<ComponentId>,
    children: Children,
}

/// Arena of components with ordered roots and ordered children.
#[derive(Default)]
pub struct ComponentTree {
    nodes: FxHashMap<ComponentId, Node>,
    roots: Vec<ComponentId>,
    next_id: u64,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, component: Component, parent: Option<ComponentId>) -> ComponentId {
        self.next_id += 1;
        let id = ComponentId(self.next_id);
        self.nodes.insert(
            id,
            Node {
                component,
                parent,
                children: Children::new(),
            },
        );
        id
    }

    /// Registers a new top-level window. Later roots stack above earlier ones.
    pub fn add_root(&mut self, component: Component) -> Result<ComponentId, TreeError> {
        if !component.kind.is_window() {
            return Err(TreeError::NotAWindow {
                kind: component.kind,
            });
        }
        let id = self.allocate(component, None);
        self.roots.push(id);
        Ok(id)
    }

    /// Appends `component` as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: ComponentId,
        component: Component,
    ) -> Result<ComponentId, TreeError> {
        if !self.nodes.contains_key(&parent) {
            return Err(TreeError::Missing { id: parent });
        }
        let id = self.allocate(component, Some(parent));
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        Ok(id)
    }

    /// Removes a component and its whole subtree.
    pub fn remove(&mut self, id: ComponentId) -> Result<Component, TreeError> {
        let parent = self
            .nodes
            .get(&id)
            .map(|node| node.parent)
            .ok_or(TreeError::Missing { id })?;
        self.detach(id, parent);

        let mut stack = vec![id];
        let mut removed = None;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().copied());
                if current == id {
                    removed = Some(node.component);
                }
            }
        }
        removed.ok_or(TreeError::Missing { id })
    }

    /// Moves `id` (with its subtree) to the end of `new_parent`'s children.
    pub fn reparent(&mut self, id: ComponentId, new_parent: ComponentId) -> Result<(), TreeError> {
        if !self.nodes.contains_key(&new_parent) {
            return Err(TreeError::Missing { id: new_parent });
        }
        let old_parent = self
            .nodes
            .get(&id)
            .map(|node| node.parent)
            .ok_or(TreeError::Missing { id })?;
        if id == new_parent || self.is_ancestor(id, new_parent) {
            return Err(TreeError::Cycle {
                id,
                parent: new_parent,
            });
        }
        self.detach(id, old_parent);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }
        if let Some(node) = self.nodes.get_mut(&new_parent) {
            node.children.push(id);
        }
        Ok(())
    }

    fn detach(&mut self, id: ComponentId, parent: Option<ComponentId>) {
        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }

    /// Returns true when `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[ComponentId] {
        &self.roots
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.nodes.get(&id).map(|node| &node.component)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.nodes.get_mut(&id).map(|node| &mut node.component)
    }

    /// Applies `f` to the component, failing if it is no longer in the tree.
    pub fn update<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut Component) -> R,
    ) -> Result<R, TreeError> {
        self.get_mut(id).map(f).ok_or(TreeError::Missing { id })
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// The root window that contains `id`.
    pub fn window_of(&self, id: ComponentId) -> Option<ComponentId> {
        if !self.contains(id) {
            return None;
        }
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    /// Depth-first, pre-order walk of the subtree rooted at `id`.
    pub fn descendants(&self, id: ComponentId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// A component is showing when it and all of its ancestors are visible
    /// and the chain ends at a registered root.
    pub fn is_showing(&self, id: ComponentId) -> bool {
        let mut current = Some(id);
        let mut last = id;
        while let Some(node_id) = current {
            match self.nodes.get(&node_id) {
                Some(node) if node.component.visible => {
                    last = node_id;
                    current = node.parent;
                }
                _ => return false,
            }
        }
        self.roots.contains(&last)
    }

    /// Bounds of `id` translated into screen coordinates.
    pub fn screen_bounds(&self, id: ComponentId) -> Option<Rect> {
        let mut bounds = self.get(id)?.bounds;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            let origin = self.get(parent)?.bounds.origin();
            bounds = bounds.translate(origin.x, origin.y);
            current = self.parent(parent);
        }
        Some(bounds)
    }

    /// Finds the deepest showing component under `point`, searching roots and
    /// children from the top of the stacking order down.
    pub fn hit_test(&self, point: Point) -> Option<ComponentId> {
        self.roots
            .iter()
            .rev()
            .find_map(|root| self.hit_test_node(*root, point, Point::ZERO))
    }

    fn hit_test_node(&self, id: ComponentId, point: Point, offset: Point) -> Option<ComponentId> {
        let node = self.nodes.get(&id)?;
        if !node.component.visible {
            return None;
        }
        let bounds = node.component.bounds.translate(offset.x, offset.y);
        if !bounds.contains_point(point) {
            return None;
        }
        let child_offset = bounds.origin();
        node.children
            .iter()
            .rev()
            .find_map(|child| self.hit_test_node(*child, point, child_offset))
            .or(Some(id))
    }
}

pub struct Descendants<'a> {
    tree: &'a ComponentTree,
    stack: Vec<ComponentId>,
}

impl Iterator for Descendants<'_> {
    type Item = ComponentId;

    fn next(&mut self) -> Option<ComponentId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
