//! Point-in-time copies of the component hierarchy, and their printed form.

use marionette_core::{ActionDispatcher, RobotResult};
use marionette_toolkit::{ComponentId, ComponentTree};
use std::fmt::Write as _;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: ComponentId,
    pub depth: usize,
    pub description: String,
    pub showing: bool,
}

/// The components under a set of roots, depth-first, parents before
/// children. Captured on the UI thread; safe to send anywhere afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchySnapshot {
    entries: Vec<SnapshotEntry>,
}

impl HierarchySnapshot {
    /// Copies the subtrees under `roots`, or the whole hierarchy when
    /// `roots` is empty. Ids no longer in the tree are skipped.
    pub fn capture(tree: &ComponentTree, roots: &[ComponentId]) -> Self {
        let roots = if roots.is_empty() { tree.roots() } else { roots };
        let mut entries = Vec::new();
        for root in roots {
            let base = depth_of(tree, *root);
            for id in tree.descendants(*root) {
                let Some(component) = tree.get(id) else {
                    continue;
                };
                entries.push(SnapshotEntry {
                    id,
                    depth: depth_of(tree, id) - base,
                    description: component.to_string(),
                    showing: tree.is_showing(id),
                });
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn depth_of(tree: &ComponentTree, id: ComponentId) -> usize {
    let mut depth = 0;
    let mut current = tree.parent(id);
    while let Some(parent) = current {
        depth += 1;
        current = tree.parent(parent);
    }
    depth
}

/// Renders a snapshot as an indented tree, one component per line.
#[derive(Clone, Copy, Debug)]
pub struct HierarchyPrinter {
    indent: usize,
}

impl Default for HierarchyPrinter {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl HierarchyPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn print(&self, snapshot: &HierarchySnapshot) -> String {
        if snapshot.is_empty() {
            return "<empty hierarchy>\n".to_string();
        }
        let mut out = String::new();
        for entry in snapshot.entries() {
            let _ = writeln!(
                out,
                "{:width$}{} {}{}",
                "",
                entry.description,
                entry.id,
                if entry.showing { "" } else { " (not showing)" },
                width = entry.depth * self.indent
            );
        }
        out
    }

    /// Captures and prints the live hierarchy under `roots`.
    pub fn print_live(
        &self,
        dispatcher: &ActionDispatcher,
        roots: &[ComponentId],
    ) -> RobotResult<String> {
        let roots = roots.to_vec();
        let printer = *self;
        dispatcher.query(move |ui| {
            printer.print(&HierarchySnapshot::capture(&ui.tree(), &roots))
        })
    }
}
