//! Component lookup.
//!
//! Every lookup walks the live tree inside one dispatcher query, so the
//! hierarchy cannot change halfway through a search. Nothing is cached
//! between lookups.

use crate::hierarchy::{HierarchyPrinter, HierarchySnapshot};
use crate::matcher::{ComponentMatcher, MatchCriteria};
use marionette_core::pause::{self, DEFAULT_POLL_INTERVAL};
use marionette_core::{
    try_condition, ActionDispatcher, ComponentLookupScope, LookupError, RobotError, RobotResult,
    Settings,
};
use marionette_toolkit::{ComponentId, ComponentKind, ComponentTree};
use rustc_hash::FxHashSet;
use std::fmt::Write as _;
use std::sync::Arc;

/// Every component under `roots` (the whole hierarchy when empty) that the
/// matcher accepts, parents before children, roots in the given order.
fn collect<M>(
    tree: &ComponentTree,
    roots: &[ComponentId],
    matcher: &M,
    require_showing: bool,
) -> Vec<ComponentId>
where
    M: ComponentMatcher + ?Sized,
{
    let roots = if roots.is_empty() { tree.roots() } else { roots };
    let mut seen = FxHashSet::default();
    let mut found = Vec::new();
    for root in roots {
        for id in tree.descendants(*root) {
            // Overlapping roots would visit a subtree twice.
            if !seen.insert(id) {
                continue;
            }
            let Some(component) = tree.get(id) else {
                continue;
            };
            if require_showing && !tree.is_showing(id) {
                continue;
            }
            if matcher.matches(tree, id, component) {
                found.push(id);
            }
        }
    }
    found
}

fn list_matches(tree: &ComponentTree, found: &[ComponentId]) -> String {
    let mut out = String::new();
    for id in found {
        if let Some(component) = tree.get(*id) {
            let _ = writeln!(out, "{component} {id}");
        }
    }
    out
}

fn require_showing(
    scope: ComponentLookupScope,
    matcher: &(impl ComponentMatcher + ?Sized),
) -> bool {
    match scope {
        ComponentLookupScope::Default => matcher.requires_showing(),
        ComponentLookupScope::All => false,
        ComponentLookupScope::ShowingOnly => true,
    }
}

/// Finds components in the hierarchy owned by one UI thread.
#[derive(Clone, Debug)]
pub struct ComponentFinder {
    dispatcher: ActionDispatcher,
    settings: Arc<Settings>,
    printer: HierarchyPrinter,
}

impl ComponentFinder {
    pub fn new(dispatcher: ActionDispatcher, settings: Arc<Settings>) -> Self {
        Self {
            dispatcher,
            settings,
            printer: HierarchyPrinter::default(),
        }
    }

    pub fn with_printer(mut self, printer: HierarchyPrinter) -> Self {
        self.printer = printer;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The single component under `roots` accepted by `matcher`.
    ///
    /// With the `Default` lookup scope a search of explicit roots that finds
    /// nothing is repeated once over the whole hierarchy. Zero matches after
    /// that, or two or more at any point, fail with
    /// [`RobotError::ComponentLookup`].
    pub fn find<M>(&self, roots: &[ComponentId], matcher: &M) -> RobotResult<ComponentId>
    where
        M: ComponentMatcher + Clone + 'static,
    {
        let scope = self.settings.component_lookup_scope();
        let roots = roots.to_vec();
        let matcher = matcher.clone();
        let printer = self.printer;

        self.dispatcher.run_query(move |ui| {
            let tree = ui.tree();
            let showing = require_showing(scope, &matcher);
            let mut searched = roots;
            let mut found = collect(&tree, &searched, &matcher, showing);

            if found.is_empty() && scope == ComponentLookupScope::Default && !searched.is_empty() {
                log::debug!(
                    "no match for {} under {:?}, retrying over the whole hierarchy",
                    matcher.description(),
                    searched
                );
                searched = Vec::new();
                found = collect(&tree, &searched, &matcher, showing);
            }

            match found.len() {
                0 => Err(LookupError::NotFound {
                    criteria: matcher.description(),
                    hierarchy: printer.print(&HierarchySnapshot::capture(&tree, &searched)),
                }
                .into()),
                1 => Ok(found[0]),
                count => Err(LookupError::Ambiguous {
                    criteria: matcher.description(),
                    count,
                    matches: list_matches(&tree, &found),
                }
                .into()),
            }
        })
    }

    /// Every component under `roots` accepted by `matcher`, in hierarchy
    /// order. No retry and no cardinality check.
    pub fn find_all<M>(&self, roots: &[ComponentId], matcher: &M) -> RobotResult<Vec<ComponentId>>
    where
        M: ComponentMatcher + Clone + 'static,
    {
        let scope = self.settings.component_lookup_scope();
        let roots = roots.to_vec();
        let matcher = matcher.clone();
        self.dispatcher.query(move |ui| {
            let showing = require_showing(scope, &matcher);
            collect(&ui.tree(), &roots, &matcher, showing)
        })
    }

    pub fn find_by_name(&self, roots: &[ComponentId], name: &str) -> RobotResult<ComponentId> {
        self.find(roots, &MatchCriteria::new().named(name))
    }

    pub fn find_by_kind(
        &self,
        roots: &[ComponentId],
        kind: ComponentKind,
    ) -> RobotResult<ComponentId> {
        self.find(roots, &MatchCriteria::new().of_kind(kind))
    }

    /// Polls [`find`](Self::find) until the component shows up.
    ///
    /// Only not-found outcomes are retried. Gives up with
    /// [`RobotError::WaitTimedOut`] after `Settings::timeout_to_be_visible`.
    pub fn wait_for<M>(&self, roots: &[ComponentId], matcher: &M) -> RobotResult<ComponentId>
    where
        M: ComponentMatcher + Clone + 'static,
    {
        let mut found = None;
        pause::wait_until(
            try_condition(
                format!("{} to appear", matcher.description()),
                || match self.find(roots, matcher) {
                    Ok(id) => {
                        found = Some(id);
                        Ok(true)
                    }
                    Err(RobotError::ComponentLookup(LookupError::NotFound { .. })) => Ok(false),
                    Err(err) => Err(err),
                },
            ),
            self.settings.timeout_to_be_visible(),
            DEFAULT_POLL_INTERVAL,
        )?;
        found.ok_or_else(|| RobotError::unexpected("component found but not recorded"))
    }

    /// The hierarchy under `roots` as printed in lookup errors.
    pub fn print_hierarchy(&self, roots: &[ComponentId]) -> RobotResult<String> {
        self.printer.print_live(&self.dispatcher, roots)
    }
}

#[cfg(test)]
#[path = "tests/finder_tests.rs"]
mod tests;
